//! Keyframe sampling for swept quad meshes.
//!
//! An [`AnimationPlan`] drives parameters of a [`mesh_sweep::SweepConfig`]
//! across keyframes. [`sample`] rebuilds the sweep once per keyframe and
//! bakes the vertices that move into a [`BakedClip`], which a host keys into
//! its own animation system.
//!
//! # Schedules
//!
//! - [`ValueSchedule`]: eased ramps, optionally mirrored in cycles
//! - [`IndexSchedule`]: offsets stepped at regular keyframes, sequential or
//!   seeded random
//! - [`NoiseEnvelope`]: noise amplitude ramped in, held and ramped out
//!
//! # Quick Start
//!
//! ```
//! use mesh_sweep::SweepConfig;
//! use mesh_sweep_anim::{AnimationPlan, IndexSchedule, ParamTarget, Schedule, sample};
//!
//! let plan = AnimationPlan::new(6).with_track(
//!     ParamTarget::ProfileOffset,
//!     Schedule::Index(IndexSchedule::sequential(0, 1, 2, 3)),
//! );
//! let clip = sample(&SweepConfig::default(), &plan)?;
//!
//! assert_eq!(clip.frames.len(), 6);
//! assert_eq!(clip.rest.len(), 8 * 12);
//! # Ok::<(), mesh_sweep_anim::AnimError>(())
//! ```
//!
//! # Errors
//!
//! Plans are checked against the configuration before any keyframe is
//! built. A keyframe whose vertex count differs from the first aborts the
//! bake.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::float_cmp,
    clippy::uninlined_format_args
)]

mod error;
mod sampler;
mod schedule;
mod target;

pub use error::{AnimError, AnimResult};
pub use sampler::{
    AnimationPlan, BakedClip, BlendMode, ClipSettings, Extrapolation, Interpolation,
    VertexChannel, sample,
};
pub use schedule::{IndexSchedule, NoiseEnvelope, ValueSchedule};
pub use target::{ParamTarget, Schedule, Track, ValueKind};
