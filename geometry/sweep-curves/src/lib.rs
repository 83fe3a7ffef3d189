//! Parametric path and profile shapes for swept meshes.
//!
//! A swept mesh is built by carrying a 2-D profile along a 3-D path. This
//! crate produces both point sequences from a small set of closed-form shape
//! families:
//!
//! - **Line** - straight segment with eased spacing
//! - **Wave** - sinusoid over a straight base
//! - **Arc** - circular arc from a chord and a sagitta factor
//! - **Ellipse** - ellipse with optional radial bumps
//! - **Polygon** - regular polygon with optional bevelled corners
//! - **Helix** - tapering, variable-pitch spiral
//! - **Spherical spiral** - pole-to-pole spiral over a sphere
//! - **Custom** - edge loop imported from an external mesh
//!
//! Every family is configured through [`ShapeConfig`] and sampled through
//! the [`CurveProvider`] trait. All families honour the shared
//! `offset` (cyclic rotation), `reverse` and `closed` settings.
//!
//! # Example
//!
//! ```
//! use sweep_curves::{Axis, CurveProvider, ShapeConfig};
//!
//! let path = ShapeConfig::line(Axis::Z, 10.0, 4);
//! let points = path.build()?;
//! assert_eq!(points.len(), 4);
//! assert!((points[3].z - 5.0).abs() < 1e-12);
//!
//! let profile = ShapeConfig::ellipse(2.0, 1.0, 16);
//! assert_eq!(profile.build_planar()?.len(), 16);
//! assert!(profile.is_closed());
//! # Ok::<(), sweep_curves::CurveError>(())
//! ```
//!
//! # Coordinate System
//!
//! Right-handed. Profiles live in the local XY plane and are swept along
//! their local +Z axis.
//!
//! # Feature Flags
//!
//! - `serde`: Serialization for every configuration type

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::too_many_arguments,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

mod arc;
mod custom;
mod ease;
mod error;
mod helix;
mod line;
mod polygon;
mod shape;

pub use custom::CustomSource;
pub use ease::{Easing, MIN_EXPONENT};
pub use error::CurveError;
pub use shape::{
    Axis, CurveProvider, DEFAULT_MAX_POINTS, MIN_POINTS, ShapeConfig, ShapeKind, wrap_offset,
};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

/// Result type for shape sampling.
pub type Result<T> = std::result::Result<T, CurveError>;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn all_families() -> Vec<ShapeConfig> {
        vec![
            ShapeConfig::line(Axis::X, 4.0, 6),
            ShapeConfig::wave(4.0, 1.0, 2.0, 12),
            ShapeConfig::arc(2.0, 0.5, 7),
            ShapeConfig::ellipse(2.0, 1.0, 10),
            ShapeConfig::polygon(6, 2.0, 2.0),
            ShapeConfig::helix(2.0, 3.0, 1.5, 20),
            ShapeConfig::spherical_spiral(2.0, 2.0, 24),
            ShapeConfig::custom(
                CustomSource::ordered(vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                ]),
                Vector3::new(2.0, 2.0, 0.0),
            ),
        ]
    }

    #[test]
    fn every_family_builds_its_point_count() {
        for config in all_families() {
            let points = config.build();
            assert!(points.is_ok(), "{} failed: {:?}", config.kind.name(), points);
            let points = points.unwrap_or_default();
            assert_eq!(points.len(), config.points, "{}", config.kind.name());
            assert!(points.iter().all(|p| p.coords.iter().all(|c| c.is_finite())));
        }
    }

    #[test]
    fn every_family_rejects_two_points() {
        for mut config in all_families() {
            config.points = 2;
            assert!(config.build().is_err(), "{}", config.kind.name());
        }
    }
}
