//! Ring orientation by frame transport.
//!
//! Each path point gets the rotation that carries the profile's local +Z
//! axis onto the path tangent. Rotations are chained: every frame is the
//! previous frame composed with the minimal rotation between consecutive
//! tangents, which keeps rings from twisting about the path.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Reference used to orient the first ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpReference {
    /// Fixed axis: the profile normal is first turned onto this axis, then
    /// onto the first tangent.
    Fixed(Vector3<f64>),
    /// Tangent of the preceding point: the last point on closed paths, the
    /// first point itself on open paths.
    Adaptive,
}

impl Default for UpReference {
    fn default() -> Self {
        Self::Fixed(Vector3::z())
    }
}

/// Compute one rotation per path point.
///
/// Tangents come from the secant `p[i+1] - p[i-1]`. Closed paths wrap
/// around; open paths extrapolate virtual neighbours `2 p[0] - p[1]` and
/// `2 p[n-1] - p[n-2]`.
///
/// # Example
///
/// ```
/// use mesh_sweep::{UpReference, transport_frames};
/// use nalgebra::{Point3, Vector3};
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
/// ];
///
/// let frames = transport_frames(&points, UpReference::default(), false);
/// assert_eq!(frames.len(), 3);
/// assert!((frames[1] * Vector3::z() - Vector3::x()).norm() < 1e-12);
/// ```
#[must_use]
pub fn transport_frames(
    points: &[Point3<f64>],
    up: UpReference,
    closed: bool,
) -> Vec<UnitQuaternion<f64>> {
    let tangents = secant_tangents(points, closed);
    let Some(&first) = tangents.first() else {
        return Vec::new();
    };

    let mut frames = Vec::with_capacity(tangents.len());
    let initial = match up {
        UpReference::Fixed(axis) => {
            let axis = axis.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
            minimal_rotation(&axis, &first) * minimal_rotation(&Vector3::z(), &axis)
        }
        UpReference::Adaptive => {
            let before = if closed {
                tangents[tangents.len() - 1]
            } else {
                first
            };
            minimal_rotation(&before, &first) * minimal_rotation(&Vector3::z(), &before)
        }
    };
    frames.push(initial);

    for i in 1..tangents.len() {
        let step = minimal_rotation(&tangents[i - 1], &tangents[i]);
        frames.push(step * frames[i - 1]);
    }
    frames
}

/// Unit tangents from secants; degenerate secants reuse the previous tangent.
#[must_use]
pub fn secant_tangents(points: &[Point3<f64>], closed: bool) -> Vec<Vector3<f64>> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut tangents: Vec<Vector3<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = if i > 0 {
            points[i - 1]
        } else if closed {
            points[n - 1]
        } else {
            Point3::from(points[0].coords * 2.0 - points[1].coords)
        };
        let next = if i + 1 < n {
            points[i + 1]
        } else if closed {
            points[0]
        } else {
            Point3::from(points[n - 1].coords * 2.0 - points[n - 2].coords)
        };

        let fallback = tangents.last().copied().unwrap_or_else(Vector3::z);
        tangents.push((next - prev).try_normalize(f64::EPSILON).unwrap_or(fallback));
    }
    tangents
}

/// Shortest-arc rotation taking `from` onto `to`.
///
/// Opposite vectors turn by pi about an axis perpendicular to `from`.
#[must_use]
pub fn minimal_rotation(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    let (Some(a), Some(b)) = (
        from.try_normalize(f64::EPSILON),
        to.try_normalize(f64::EPSILON),
    ) else {
        return UnitQuaternion::identity();
    };

    UnitQuaternion::rotation_between(&a, &b).unwrap_or_else(|| {
        UnitQuaternion::from_axis_angle(
            &Unit::new_unchecked(find_perpendicular(a)),
            std::f64::consts::PI,
        )
    })
}

/// Find a unit vector perpendicular to the given vector.
fn find_perpendicular(v: Vector3<f64>) -> Vector3<f64> {
    // Choose the axis most perpendicular to v
    let abs_x = v.x.abs();
    let abs_y = v.y.abs();
    let abs_z = v.z.abs();

    let perp = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&perp)
        .try_normalize(f64::EPSILON)
        .unwrap_or(Vector3::y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_loop() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ]
    }

    #[test]
    fn straight_line_along_z_is_identity() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        for frame in transport_frames(&points, UpReference::default(), false) {
            assert_relative_eq!(frame.angle(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn frames_align_z_with_tangent() {
        let points = square_loop();
        let tangents = secant_tangents(&points, true);
        let frames = transport_frames(&points, UpReference::default(), true);
        assert_eq!(frames.len(), 4);
        for (frame, tangent) in frames.iter().zip(&tangents) {
            assert_relative_eq!(frame * Vector3::z(), *tangent, epsilon = 1e-10);
        }
    }

    #[test]
    fn open_path_uses_extrapolated_ends() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let tangents = secant_tangents(&points, false);
        assert_relative_eq!(tangents[0], Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(tangents[2], Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn closed_secant_wraps() {
        let tangents = secant_tangents(&square_loop(), true);
        // p1 - p3 at index 0
        assert_relative_eq!(tangents[0], Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn adaptive_up_matches_fixed_on_open_paths() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let fixed = transport_frames(&points, UpReference::default(), false);
        let adaptive = transport_frames(&points, UpReference::Adaptive, false);
        for (a, b) in fixed.iter().zip(&adaptive) {
            assert_relative_eq!(a * Vector3::z(), b * Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn fixed_up_changes_roll_not_direction() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let z_up = transport_frames(&points, UpReference::Fixed(Vector3::z()), false);
        let y_up = transport_frames(&points, UpReference::Fixed(Vector3::y()), false);
        assert_relative_eq!(z_up[0] * Vector3::z(), y_up[0] * Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn antiparallel_rotation_is_half_turn() {
        let rot = minimal_rotation(&Vector3::z(), &(-Vector3::z()));
        assert_relative_eq!(rot * Vector3::z(), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(rot.angle(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(transport_frames(&[], UpReference::default(), false).is_empty());
        assert!(transport_frames(&[Point3::origin()], UpReference::default(), false).is_empty());
        let rot = minimal_rotation(&Vector3::zeros(), &Vector3::x());
        assert_relative_eq!(rot.angle(), 0.0);
    }

    #[test]
    fn find_perpendicular_is_perpendicular() {
        for v in [Vector3::x(), Vector3::y(), Vector3::z(), Vector3::new(1.0, 2.0, 3.0)] {
            assert_relative_eq!(v.dot(&find_perpendicular(v)), 0.0, epsilon = 1e-10);
        }
    }
}
