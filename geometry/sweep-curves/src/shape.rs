//! Shape configuration and the [`CurveProvider`] contract.

use nalgebra::{Point2, Point3, Vector3};
use tracing::debug;

use crate::custom::{CustomSource, sample_custom};
use crate::helix::{sample_helix, sample_spherical_spiral};
use crate::line::{sample_line, sample_wave};
use crate::polygon::sample_polygon;
use crate::{CurveError, Easing, Result, arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default upper bound on the number of sampled points.
pub const DEFAULT_MAX_POINTS: usize = 4096;

/// Minimum number of points any shape must produce.
pub const MIN_POINTS: usize = 3;

/// Produces an ordered point sequence for a path or a profile.
pub trait CurveProvider {
    /// Sample the shape as 3-D points.
    fn build(&self) -> Result<Vec<Point3<f64>>>;

    /// Sample the shape in its local XY plane.
    ///
    /// The default implementation drops the Z coordinate of [`Self::build`].
    fn build_planar(&self) -> Result<Vec<Point2<f64>>> {
        Ok(self
            .build()?
            .iter()
            .map(|p| Point2::new(p.x, p.y))
            .collect())
    }

    /// Whether the sampled sequence forms a closed loop.
    fn is_closed(&self) -> bool;
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    #[default]
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }

    /// Component index (0, 1 or 2).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Shape family with its family-specific parameters.
///
/// Bounding dimensions come from [`ShapeConfig::size`]; each variant
/// documents which components it reads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum ShapeKind {
    /// Straight segment of length `size[axis]`, centred on the origin.
    Line {
        /// Direction of the segment.
        axis: Axis,
        /// Point spacing curve.
        easing: Easing,
        /// Exponent of the spacing curve.
        exponent: f64,
    },
    /// Sinusoid along X of length `size.x` and peak-to-peak height `size.y`.
    Wave {
        /// Number of periods over the length.
        frequency: f64,
        /// Phase in radians.
        phase: f64,
    },
    /// Circular arc over a chord of `size.x`.
    Arc {
        /// Sagitta as a fraction of half the chord, in `(0, 1]`.
        factor: f64,
    },
    /// Ellipse of `size.x` by `size.y`, optionally bumped.
    Ellipse {
        /// Number of bumps around the ellipse.
        bump_steps: usize,
        /// Relative radius added at each bump peak.
        bump_amount: f64,
        /// Sharpness of the bumps.
        bump_exponent: f64,
    },
    /// Regular polygon fitted to `size.x` by `size.y`.
    Polygon {
        /// Number of corners.
        sides: usize,
        /// Bevel offset as a fraction of each edge, in `[0, 0.5]`.
        bevel: f64,
        /// Segments per bevelled corner.
        bevel_segments: usize,
    },
    /// Spiral of diameter `size.x` and height `size.z`.
    Helix {
        /// Number of revolutions.
        turns: f64,
        /// Radius at the end relative to the start radius.
        end_scale: f64,
        /// Height distribution along the spiral.
        easing: Easing,
        /// Exponent of the height distribution.
        exponent: f64,
        /// Space points evenly along the spiral's length.
        #[cfg_attr(feature = "serde", serde(default))]
        uniform_length: bool,
    },
    /// Spiral wound over a sphere of diameter `size.x`.
    SphericalSpiral {
        /// Number of revolutions from pole to pole.
        revolutions: f64,
    },
    /// Edge loop imported from an external mesh, scaled into `size`.
    Custom {
        /// Vertex data; `None` until the host provides it.
        source: Option<CustomSource>,
    },
}

impl ShapeKind {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Wave { .. } => "wave",
            Self::Arc { .. } => "arc",
            Self::Ellipse { .. } => "ellipse",
            Self::Polygon { .. } => "polygon",
            Self::Helix { .. } => "helix",
            Self::SphericalSpiral { .. } => "spherical_spiral",
            Self::Custom { .. } => "custom",
        }
    }

    /// The family's main animatable factor, if it has one.
    ///
    /// Wave frequency, arc factor, ellipse bump amount, polygon bevel, helix
    /// turns and spiral revolutions.
    pub fn factor_mut(&mut self) -> Option<&mut f64> {
        match self {
            Self::Wave { frequency, .. } => Some(frequency),
            Self::Arc { factor } => Some(factor),
            Self::Ellipse { bump_amount, .. } => Some(bump_amount),
            Self::Polygon { bevel, .. } => Some(bevel),
            Self::Helix { turns, .. } => Some(turns),
            Self::SphericalSpiral { revolutions } => Some(revolutions),
            Self::Line { .. } | Self::Custom { .. } => None,
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Line {
            axis: Axis::Z,
            easing: Easing::Linear,
            exponent: 1.0,
        }
    }
}

/// Parameters for one path or profile shape.
///
/// # Invariants
///
/// `offset` is kept in `[0, points)` by [`Self::set_offset`] and
/// [`Self::set_points`]; sampling wraps it with `rem_euclid` either way.
///
/// # Example
///
/// ```
/// use sweep_curves::{CurveProvider, ShapeConfig};
///
/// let square = ShapeConfig::polygon(4, 2.0, 2.0);
/// let points = square.build_planar()?;
/// assert_eq!(points.len(), 4);
/// # Ok::<(), sweep_curves::CurveError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ShapeConfig {
    /// Shape family.
    pub kind: ShapeKind,
    /// Point count (a budget for bevelled polygons).
    pub points: usize,
    /// Bounding dimensions.
    pub size: Vector3<f64>,
    /// Cyclic rotation of the starting point.
    pub offset: i64,
    /// Whether the sequence closes on itself.
    pub closed: bool,
    /// Reverse the point order before applying `offset`.
    pub reverse: bool,
    /// Largest accepted point count.
    pub max_points: usize,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            kind: ShapeKind::default(),
            points: 8,
            size: Vector3::new(1.0, 1.0, 1.0),
            offset: 0,
            closed: false,
            reverse: false,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl ShapeConfig {
    /// Straight line of `length` along `axis` with `points` nodes.
    #[must_use]
    pub fn line(axis: Axis, length: f64, points: usize) -> Self {
        let mut size = Vector3::zeros();
        size[axis.index()] = length;
        Self {
            kind: ShapeKind::Line {
                axis,
                easing: Easing::Linear,
                exponent: 1.0,
            },
            points,
            size,
            ..Self::default()
        }
    }

    /// Sine wave of `length` and peak-to-peak `height`.
    #[must_use]
    pub fn wave(length: f64, height: f64, frequency: f64, points: usize) -> Self {
        Self {
            kind: ShapeKind::Wave {
                frequency,
                phase: 0.0,
            },
            points,
            size: Vector3::new(length, height, 0.0),
            ..Self::default()
        }
    }

    /// Circular arc over `chord` with the given sagitta factor.
    #[must_use]
    pub fn arc(chord: f64, factor: f64, points: usize) -> Self {
        Self {
            kind: ShapeKind::Arc { factor },
            points,
            size: Vector3::new(chord, chord, 0.0),
            ..Self::default()
        }
    }

    /// Closed ellipse of `width` by `height`.
    #[must_use]
    pub fn ellipse(width: f64, height: f64, points: usize) -> Self {
        Self {
            kind: ShapeKind::Ellipse {
                bump_steps: 0,
                bump_amount: 0.0,
                bump_exponent: 1.0,
            },
            points,
            size: Vector3::new(width, height, 0.0),
            closed: true,
            ..Self::default()
        }
    }

    /// Regular polygon fitted to `width` by `height`, without bevel.
    ///
    /// The polygon is left open; set [`Self::closed`] to wrap it.
    #[must_use]
    pub fn polygon(sides: usize, width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::Polygon {
                sides,
                bevel: 0.0,
                bevel_segments: 0,
            },
            points: sides,
            size: Vector3::new(width, height, 0.0),
            ..Self::default()
        }
    }

    /// Helix of `diameter` and `height`.
    #[must_use]
    pub fn helix(diameter: f64, height: f64, turns: f64, points: usize) -> Self {
        Self {
            kind: ShapeKind::Helix {
                turns,
                end_scale: 1.0,
                easing: Easing::Linear,
                exponent: 1.0,
                uniform_length: false,
            },
            points,
            size: Vector3::new(diameter, diameter, height),
            ..Self::default()
        }
    }

    /// Spiral over a sphere of `diameter`.
    #[must_use]
    pub fn spherical_spiral(diameter: f64, revolutions: f64, points: usize) -> Self {
        Self {
            kind: ShapeKind::SphericalSpiral { revolutions },
            points,
            size: Vector3::new(diameter, diameter, diameter),
            ..Self::default()
        }
    }

    /// Shape imported from an external edge loop.
    ///
    /// `points` is set to the source's vertex count and `size` to
    /// `dimensions`.
    #[must_use]
    pub fn custom(source: CustomSource, dimensions: Vector3<f64>) -> Self {
        Self {
            points: source.positions.len(),
            kind: ShapeKind::Custom {
                source: Some(source),
            },
            size: dimensions,
            ..Self::default()
        }
    }

    /// Set the point count and re-clamp `offset` into `[0, points)`.
    pub fn set_points(&mut self, points: usize) {
        self.points = points;
        self.set_offset(self.offset);
    }

    /// Set the index offset, wrapped into `[0, points)`.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = wrap_offset(offset, self.points);
    }

    /// Builder form of [`Self::set_offset`].
    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.set_offset(offset);
        self
    }

    /// Builder form of the `closed` flag.
    #[must_use]
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Builder form of the `reverse` flag.
    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.points < MIN_POINTS {
            return Err(CurveError::invalid_geometry(format!(
                "{} needs at least {MIN_POINTS} points, got {}",
                self.kind.name(),
                self.points
            )));
        }
        if self.points > self.max_points {
            return Err(CurveError::invalid_geometry(format!(
                "{} resolution {} exceeds maximum {}",
                self.kind.name(),
                self.points,
                self.max_points
            )));
        }
        if self.size.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(CurveError::invalid_geometry(format!(
                "{} dimensions must be finite and non-negative, got {:?}",
                self.kind.name(),
                self.size.as_slice()
            )));
        }
        Ok(())
    }

    fn sample(&self) -> Result<Vec<Point3<f64>>> {
        let n = self.points;
        let size = &self.size;
        match &self.kind {
            ShapeKind::Line {
                axis,
                easing,
                exponent,
            } => Ok(sample_line(n, size[axis.index()], *axis, *easing, *exponent)),
            ShapeKind::Wave { frequency, phase } => {
                Ok(sample_wave(n, size.x, size.y, *frequency, *phase))
            }
            ShapeKind::Arc { factor } => arc::sample_arc(n, size.x, *factor),
            ShapeKind::Ellipse {
                bump_steps,
                bump_amount,
                bump_exponent,
            } => arc::sample_ellipse(n, size.x, size.y, *bump_steps, *bump_amount, *bump_exponent),
            ShapeKind::Polygon {
                sides,
                bevel,
                bevel_segments,
            } => sample_polygon(n, size.x, size.y, *sides, *bevel, *bevel_segments),
            ShapeKind::Helix {
                turns,
                end_scale,
                easing,
                exponent,
                uniform_length,
            } => sample_helix(
                n,
                size.x,
                size.z,
                *turns,
                *end_scale,
                *easing,
                *exponent,
                *uniform_length,
            ),
            ShapeKind::SphericalSpiral { revolutions } => {
                sample_spherical_spiral(n, size.x, *revolutions)
            }
            ShapeKind::Custom { source } => {
                let source = source
                    .as_ref()
                    .ok_or_else(|| CurveError::incomplete("custom shape has no source mesh"))?;
                let points = sample_custom(source, size)?;
                if points.len() != n {
                    return Err(CurveError::count_mismatch(n, points.len()));
                }
                Ok(points)
            }
        }
    }
}

impl CurveProvider for ShapeConfig {
    fn build(&self) -> Result<Vec<Point3<f64>>> {
        self.validate()?;
        let mut points = self.sample()?;
        if points.len() > self.max_points {
            return Err(CurveError::invalid_geometry(format!(
                "{} produced {} points, maximum is {}",
                self.kind.name(),
                points.len(),
                self.max_points
            )));
        }
        if self.reverse {
            points.reverse();
        }
        let shift = wrap_offset(self.offset, points.len());
        points.rotate_left(usize::try_from(shift).unwrap_or(0));

        debug!(
            "Sampled {} shape: {} points, offset {}, closed {}",
            self.kind.name(),
            points.len(),
            shift,
            self.closed
        );
        Ok(points)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Wrap an index offset into `[0, len)`; zero when `len` is zero.
#[must_use]
pub fn wrap_offset(offset: i64, len: usize) -> i64 {
    match i64::try_from(len) {
        Ok(len) if len > 0 => offset.rem_euclid(len),
        _ => 0,
    }
}
