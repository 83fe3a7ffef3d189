//! Swept quad meshes.
//!
//! A [`Sweep`] carries a profile curve along a path curve, one ring per path
//! point, and connects neighbouring rings with quads. A stack of parametric
//! edits perturbs the grid on every recompute.
//!
//! # Features
//!
//! - **Falloff**: weighted, wrapped index selections drive every edit
//! - **Frame transport**: rings are oriented by chained minimal rotations,
//!   so they do not twist about the path
//! - **Deformation stack**: rigid rotations, roll/twist/spin, path and profile
//!   location edits, profile blends and seeded noise
//! - **Topology**: quads, optional ngon caps, and a seam that follows the net
//!   spin of closed tubes
//! - **Batch edits**: any number of stack edits with a single recompute
//!
//! # Quick Start
//!
//! ```
//! use mesh_sweep::{FalloffSpec, LocationEdit, Sweep, SweepConfig};
//! use nalgebra::Vector3;
//! use sweep_curves::{Axis, ShapeConfig};
//!
//! let config = SweepConfig::new(
//!     ShapeConfig::line(Axis::Z, 10.0, 4),
//!     ShapeConfig::polygon(4, 2.0, 2.0),
//! );
//! let mut sweep = Sweep::new(&config)?;
//!
//! sweep.batch(|stack| {
//!     stack.path_edits.push(LocationEdit::absolute(
//!         1.0,
//!         Vector3::z(),
//!         FalloffSpec::run(0, 1),
//!     ));
//!     Ok(())
//! })?;
//!
//! assert_eq!(sweep.locs().len(), 16);
//! assert_eq!(sweep.faces().len(), 9);
//! # Ok::<(), mesh_sweep::SweepError>(())
//! ```
//!
//! # Errors
//!
//! A recompute that fails leaves its [`Sweep`] invalidated; build a new one.
//! Falloff, frame transport, topology and noise never fail.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::suboptimal_flops,
    clippy::module_name_repetitions,
    clippy::float_cmp,
    clippy::uninlined_format_args
)]

mod config;
pub mod deform;
mod error;
pub mod falloff;
pub mod frame;
mod sweep;
pub mod topology;

pub use config::SweepConfig;
pub use deform::{
    BlendProfile, DeformStack, EditMode, LocationEdit, Noise, PathRotation, ProfileEdit,
    RigidRotation, RotationState, SpinEdit,
};
pub use error::{SweepError, SweepResult};
pub use falloff::{Falloff, FalloffSpec, Reflect};
pub use frame::{UpReference, transport_frames};
pub use sweep::Sweep;
pub use topology::{Face, SeamPolicy, TopologySpec};
