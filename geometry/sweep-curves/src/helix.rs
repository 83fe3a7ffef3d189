//! Helical and spherical spirals.
//!
//! A helix spirals around the Z axis while advancing along it. The radius
//! may taper from start to end, and the height can be redistributed with an
//! easing curve, which varies the pitch along the spiral. The spherical
//! spiral winds from the south pole to the north pole of a sphere.

use nalgebra::Point3;
use std::f64::consts::{PI, TAU};
use tracing::warn;

use crate::line::unit_param;
use crate::{CurveError, Easing, Result};

/// Sample `n` points of a helix.
///
/// # Parameters
///
/// - `diameter`: diameter at the start
/// - `height`: total rise along Z
/// - `turns`: number of revolutions
/// - `end_scale`: end radius relative to the start radius
/// - `easing`, `exponent`: height distribution; linear gives constant pitch
/// - `uniform_length`: space the samples evenly along the spiral instead of
///   evenly in its parameter
#[allow(clippy::too_many_arguments)]
pub(crate) fn sample_helix(
    n: usize,
    diameter: f64,
    height: f64,
    turns: f64,
    end_scale: f64,
    easing: Easing,
    exponent: f64,
    uniform_length: bool,
) -> Result<Vec<Point3<f64>>> {
    if diameter <= 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "helix diameter must be positive, got {diameter}"
        )));
    }
    if !turns.is_finite() || !end_scale.is_finite() || end_scale < 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "helix needs finite turns and a non-negative end scale, got {turns} / {end_scale}"
        )));
    }

    let radius = diameter * 0.5;
    let at = |t: f64| {
        let r = radius * (1.0 + (end_scale - 1.0) * t);
        let angle = TAU * turns * t;
        let z = height * easing.progress(t, exponent);
        Point3::new(r * angle.cos(), r * angle.sin(), z)
    };
    if uniform_length && n > 2 {
        Ok(resample_by_length(n, at))
    } else {
        Ok((0..n).map(|i| at(unit_param(i, n))).collect())
    }
}

/// Dense samples per output point when measuring length.
const LENGTH_OVERSAMPLING: usize = 16;

/// Sample `n` points of the curve `at` evenly spaced along its length.
///
/// Length is measured over a dense polyline; each output parameter is
/// interpolated within the dense segment that contains its target length,
/// so every point stays on the curve and both ends are exact.
fn resample_by_length(n: usize, at: impl Fn(f64) -> Point3<f64>) -> Vec<Point3<f64>> {
    let dense = n.saturating_mul(LENGTH_OVERSAMPLING).max(2);
    let params: Vec<f64> = (0..dense).map(|i| unit_param(i, dense)).collect();

    let mut lengths = Vec::with_capacity(dense);
    let mut total = 0.0;
    let mut prev = at(0.0);
    for &t in &params {
        let p = at(t);
        total += (p - prev).norm();
        lengths.push(total);
        prev = p;
    }
    if total <= f64::EPSILON {
        return (0..n).map(|i| at(unit_param(i, n))).collect();
    }

    let mut seg = 1;
    (0..n)
        .map(|i| {
            let target = total * unit_param(i, n);
            while seg < dense - 1 && lengths[seg] < target {
                seg += 1;
            }
            let (l0, l1) = (lengths[seg - 1], lengths[seg]);
            let f = if l1 > l0 { ((target - l0) / (l1 - l0)).clamp(0.0, 1.0) } else { 0.0 };
            at(params[seg - 1] + (params[seg] - params[seg - 1]) * f)
        })
        .collect()
}

/// Sample `n` points of a spiral over a sphere of `diameter`.
///
/// Revolutions are bounded so every revolution keeps at least four samples.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_spherical_spiral(
    n: usize,
    diameter: f64,
    revolutions: f64,
) -> Result<Vec<Point3<f64>>> {
    if diameter <= 0.0 {
        return Err(CurveError::invalid_geometry(format!(
            "spiral diameter must be positive, got {diameter}"
        )));
    }
    if !revolutions.is_finite() {
        return Err(CurveError::invalid_geometry(format!(
            "spiral revolutions must be finite, got {revolutions}"
        )));
    }

    let limit = n as f64 / 4.0;
    let bounded = revolutions.clamp(-limit, limit);
    if (bounded - revolutions).abs() > f64::EPSILON {
        warn!(
            "Spiral revolutions {} bounded to {} for {} points",
            revolutions, bounded, n
        );
    }

    let radius = diameter * 0.5;
    Ok((0..n)
        .map(|i| {
            let t = unit_param(i, n);
            let theta = PI * t;
            let phi = TAU * bounded * t;
            Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                -radius * theta.cos(),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn helix_height_and_radius() {
        let points = sample_helix(9, 2.0, 4.0, 2.0, 1.0, Easing::Linear, 1.0, false).unwrap_or_default();
        assert_eq!(points.len(), 9);
        assert_relative_eq!(points[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[8].z, 4.0, epsilon = 1e-12);
        // Two turns over eight steps: every fourth sample is back at angle 0.
        assert_relative_eq!(points[4].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[4].y, 0.0, epsilon = 1e-12);
        for p in &points {
            assert_relative_eq!(p.x.hypot(p.y), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn conical_helix_tapers() {
        let points = sample_helix(5, 2.0, 1.0, 1.0, 0.5, Easing::Linear, 1.0, false).unwrap_or_default();
        assert_relative_eq!(points[0].x.hypot(points[0].y), 1.0, epsilon = 1e-12);
        assert_relative_eq!(points[4].x.hypot(points[4].y), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn eased_helix_varies_pitch() {
        let points = sample_helix(5, 2.0, 1.0, 1.0, 1.0, Easing::In, 2.0, false).unwrap_or_default();
        let first_rise = points[1].z - points[0].z;
        let last_rise = points[4].z - points[3].z;
        assert!(first_rise < last_rise);
        assert_relative_eq!(points[4].z, 1.0, epsilon = 1e-12);
    }

    fn chord_spread(points: &[Point3<f64>]) -> f64 {
        let chords: Vec<f64> = points.windows(2).map(|w| (w[1] - w[0]).norm()).collect();
        let max = chords.iter().copied().fold(0.0, f64::max);
        let min = chords.iter().copied().fold(f64::INFINITY, f64::min);
        max / min
    }

    #[test]
    fn uniform_length_evens_out_eased_pitch() {
        let Ok(param) = sample_helix(33, 2.0, 4.0, 1.0, 1.0, Easing::In, 3.0, false) else {
            panic!("helix should sample");
        };
        let Ok(even) = sample_helix(33, 2.0, 4.0, 1.0, 1.0, Easing::In, 3.0, true) else {
            panic!("helix should sample");
        };
        assert!(chord_spread(&param) > 1.5);
        assert!(chord_spread(&even) < 1.03);

        assert_eq!(even.len(), 33);
        assert_relative_eq!(even[0], param[0], epsilon = 1e-12);
        assert_relative_eq!(even[32], param[32], epsilon = 1e-12);
        for p in &even {
            assert_relative_eq!(p.x.hypot(p.y), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn spiral_runs_pole_to_pole() {
        let points = sample_spherical_spiral(16, 2.0, 3.0).unwrap_or_default();
        assert_relative_eq!(points[0].z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(points[15].z, 1.0, epsilon = 1e-12);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_helix_rejected() {
        assert!(sample_helix(5, 0.0, 1.0, 1.0, 1.0, Easing::Linear, 1.0, false).is_err());
        assert!(sample_helix(5, 1.0, 1.0, f64::INFINITY, 1.0, Easing::Linear, 1.0, true).is_err());
        assert!(sample_spherical_spiral(5, 1.0, f64::NAN).is_err());
    }
}
