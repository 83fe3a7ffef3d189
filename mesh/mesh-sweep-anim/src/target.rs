//! Animatable parameters and how a keyframe value reaches them.

use mesh_sweep::SweepConfig;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use sweep_curves::Axis;

use crate::error::{AnimError, AnimResult};
use crate::schedule::{IndexSchedule, NoiseEnvelope, ValueSchedule};

/// A parameter of [`SweepConfig`] driven per keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamTarget {
    /// Path bounding dimension along an axis.
    PathSize(Axis),
    /// Profile bounding dimension along an axis.
    ProfileSize(Axis),
    /// Main factor of the path shape family.
    PathFactor,
    /// Main factor of the profile shape family.
    ProfileFactor,
    /// Cyclic index offset of the path.
    PathOffset,
    /// Cyclic index offset of the profile.
    ProfileOffset,
    /// Mesh rotation angle; accumulated across keyframes.
    MeshRotation,
    /// Path rotation angle; accumulated across keyframes.
    PathRotation,
    /// Constant ring roll.
    Roll,
    /// Twist across the path.
    Twist,
    /// Angle of a spin edit.
    Spin(usize),
    /// Amount of a path location edit.
    PathEditAmount(usize),
    /// Amount of a profile location edit.
    ProfileEditAmount(usize),
    /// First ring of a path location edit.
    PathEditStart(usize),
    /// First point of a profile location edit.
    ProfileEditStart(usize),
    /// Factor of a profile blend.
    BlendFactor(usize),
    /// Coordinate noise amplitude.
    NoiseAmplitude,
}

/// The kind of value a [`ParamTarget`] takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A real number.
    Scalar,
    /// An index, wrapped by the target.
    Index,
    /// A per-axis amplitude.
    Amplitude,
}

impl ParamTarget {
    /// The kind of schedule this target accepts.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::PathOffset
            | Self::ProfileOffset
            | Self::PathEditStart(_)
            | Self::ProfileEditStart(_) => ValueKind::Index,
            Self::NoiseAmplitude => ValueKind::Amplitude,
            _ => ValueKind::Scalar,
        }
    }

    /// Whether the target accumulates rotations across keyframes.
    #[must_use]
    pub const fn is_rotation(self) -> bool {
        matches!(self, Self::MeshRotation | Self::PathRotation)
    }

    /// Check that the target exists in `config`.
    pub fn check(self, config: &SweepConfig) -> AnimResult<()> {
        let stack = &config.deform;
        let (len, what, i) = match self {
            Self::Spin(i) => (stack.spins.len(), "spin edit", i),
            Self::PathEditAmount(i) | Self::PathEditStart(i) => {
                (stack.path_edits.len(), "path edit", i)
            }
            Self::ProfileEditAmount(i) | Self::ProfileEditStart(i) => {
                (stack.profile_edits.len(), "profile edit", i)
            }
            Self::BlendFactor(i) => (stack.blends.len(), "blend", i),
            Self::PathFactor => {
                return has_factor(&config.path, "path");
            }
            Self::ProfileFactor => {
                return has_factor(&config.profile, "profile");
            }
            _ => return Ok(()),
        };
        if i < len {
            Ok(())
        } else {
            Err(AnimError::invalid_plan(format!(
                "{what} {i} does not exist, configuration has {len}"
            )))
        }
    }

    /// Write a scalar value into `config`.
    ///
    /// Rotation targets are accumulated by the sampler and ignored here.
    pub(crate) fn set_scalar(self, config: &mut SweepConfig, value: f64) -> AnimResult<()> {
        let stack = &mut config.deform;
        match self {
            Self::PathSize(axis) => config.path.size[axis.index()] = value,
            Self::ProfileSize(axis) => config.profile.size[axis.index()] = value,
            Self::PathFactor => *factor(&mut config.path.kind, "path")? = value,
            Self::ProfileFactor => *factor(&mut config.profile.kind, "profile")? = value,
            Self::Roll => stack.roll = value,
            Self::Twist => stack.twist = value,
            Self::Spin(i) => slot(&mut stack.spins, i, "spin edit")?.angle = value,
            Self::PathEditAmount(i) => slot(&mut stack.path_edits, i, "path edit")?.amount = value,
            Self::ProfileEditAmount(i) => {
                slot(&mut stack.profile_edits, i, "profile edit")?.amount = value;
            }
            Self::BlendFactor(i) => slot(&mut stack.blends, i, "blend")?.factor = value,
            Self::MeshRotation | Self::PathRotation => {}
            Self::PathOffset
            | Self::ProfileOffset
            | Self::PathEditStart(_)
            | Self::ProfileEditStart(_)
            | Self::NoiseAmplitude => {
                return Err(AnimError::invalid_plan(format!(
                    "{self:?} does not take a scalar value"
                )));
            }
        }
        Ok(())
    }

    /// Write an index into `config`, wrapped to the relevant point count.
    pub(crate) fn set_index(self, config: &mut SweepConfig, index: i64) -> AnimResult<()> {
        let rings = config.path.points;
        let points = config.profile.points;
        match self {
            Self::PathOffset => config.path.set_offset(index),
            Self::ProfileOffset => config.profile.set_offset(index),
            Self::PathEditStart(i) => {
                slot(&mut config.deform.path_edits, i, "path edit")?
                    .falloff
                    .set_start(index, rings);
            }
            Self::ProfileEditStart(i) => {
                slot(&mut config.deform.profile_edits, i, "profile edit")?
                    .points
                    .set_start(index, points);
            }
            _ => {
                return Err(AnimError::invalid_plan(format!(
                    "{self:?} does not take an index"
                )));
            }
        }
        Ok(())
    }

    /// Write a noise amplitude into `config`.
    pub(crate) fn set_amplitude(
        self,
        config: &mut SweepConfig,
        amplitude: Vector3<f64>,
    ) -> AnimResult<()> {
        if self != Self::NoiseAmplitude {
            return Err(AnimError::invalid_plan(format!(
                "{self:?} does not take an amplitude"
            )));
        }
        config.deform.noise.amplitude = amplitude;
        Ok(())
    }
}

/// How a track's values are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Eased or mirrored ramp, for scalar targets.
    Value(ValueSchedule),
    /// Stepped indices, for offset and start targets.
    Index(IndexSchedule),
    /// Amplitude envelope, for noise.
    Noise(NoiseEnvelope),
}

impl Schedule {
    /// The kind of value this schedule produces.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Value(_) => ValueKind::Scalar,
            Self::Index(_) => ValueKind::Index,
            Self::Noise(_) => ValueKind::Amplitude,
        }
    }
}

/// One animated parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Parameter being driven.
    pub target: ParamTarget,
    /// Source of its per-keyframe values.
    pub schedule: Schedule,
}

impl Track {
    /// Track driving `target` with `schedule`.
    #[must_use]
    pub fn new(target: ParamTarget, schedule: Schedule) -> Self {
        Self { target, schedule }
    }

    /// Check the schedule kind against the target and the target against
    /// `config`.
    pub fn check(&self, config: &SweepConfig) -> AnimResult<()> {
        if self.target.kind() != self.schedule.kind() {
            return Err(AnimError::invalid_plan(format!(
                "{:?} expects a {:?} schedule, got {:?}",
                self.target,
                self.target.kind(),
                self.schedule.kind()
            )));
        }
        self.target.check(config)
    }
}

fn has_factor(shape: &sweep_curves::ShapeConfig, what: &str) -> AnimResult<()> {
    let mut kind = shape.kind.clone();
    factor(&mut kind, what).map(|_| ())
}

fn factor<'a>(kind: &'a mut sweep_curves::ShapeKind, what: &str) -> AnimResult<&'a mut f64> {
    let name = kind.name();
    kind.factor_mut()
        .ok_or_else(|| AnimError::invalid_plan(format!("{what} {name} shape has no factor")))
}

fn slot<'a, T>(items: &'a mut [T], index: usize, what: &str) -> AnimResult<&'a mut T> {
    let len = items.len();
    items.get_mut(index).ok_or_else(|| {
        AnimError::invalid_plan(format!("{what} {index} does not exist, configuration has {len}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_sweep::{FalloffSpec, LocationEdit};
    use sweep_curves::ShapeConfig;

    #[test]
    fn kinds_must_match() {
        let config = SweepConfig::default();
        let track = Track::new(ParamTarget::Roll, Schedule::Index(IndexSchedule::default()));
        assert!(track.check(&config).err().is_some_and(|e| e.is_invalid_plan()));

        let track = Track::new(ParamTarget::Roll, Schedule::Value(ValueSchedule::default()));
        assert!(track.check(&config).is_ok());
    }

    #[test]
    fn missing_edit_is_rejected() {
        let config = SweepConfig::default();
        assert!(ParamTarget::Spin(0).check(&config).is_err());
        assert!(ParamTarget::PathEditStart(3).check(&config).is_err());
    }

    #[test]
    fn factor_needs_a_factor_family() {
        let config = SweepConfig::default();
        assert!(ParamTarget::PathFactor.check(&config).is_err());
        assert!(ParamTarget::ProfileFactor.check(&config).is_ok());
    }

    #[test]
    fn values_reach_config() {
        let mut config = SweepConfig::new(
            ShapeConfig::arc(4.0, 0.5, 6),
            ShapeConfig::ellipse(1.0, 1.0, 8),
        );
        config
            .deform
            .path_edits
            .push(LocationEdit::absolute(1.0, Vector3::x(), FalloffSpec::run(0, 1)));

        assert!(ParamTarget::PathFactor.set_scalar(&mut config, 0.75).is_ok());
        assert_eq!(config.path.kind, sweep_curves::ShapeKind::Arc { factor: 0.75 });

        assert!(ParamTarget::ProfileSize(Axis::Y).set_scalar(&mut config, 3.0).is_ok());
        assert_eq!(config.profile.size.y, 3.0);

        assert!(ParamTarget::PathEditStart(0).set_index(&mut config, 8).is_ok());
        assert_eq!(config.deform.path_edits[0].falloff.start, 2);

        assert!(ParamTarget::ProfileOffset.set_index(&mut config, -1).is_ok());
        assert_eq!(config.profile.offset, 7);

        let amp = Vector3::new(0.1, 0.2, 0.3);
        assert!(ParamTarget::NoiseAmplitude.set_amplitude(&mut config, amp).is_ok());
        assert_eq!(config.deform.noise.amplitude, amp);
        assert!(ParamTarget::Roll.set_amplitude(&mut config, amp).is_err());
    }
}
