//! Keyframe sampling and baked vertex clips.
//!
//! Keyframes are sampled strictly in order. Each keyframe gets a fresh
//! [`Sweep`] built from the base configuration with that keyframe's track
//! values applied. Rotation targets are the only carried state: their
//! quaternions advance by the per-keyframe angle increment.

use mesh_sweep::{Face, RigidRotation, RotationState, Sweep, SweepConfig};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnimError, AnimResult};
use crate::target::{ParamTarget, Schedule, Track};

/// Keyframe interpolation requested from the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold each value until the next keyframe.
    Constant,
    /// Straight lines between keyframes.
    #[default]
    Linear,
    /// Smooth curves between keyframes.
    Bezier,
}

/// How the baked clip combines with clips below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Override lower clips.
    #[default]
    Replace,
    /// Combine with lower clips.
    Combine,
    /// Add to lower clips.
    Add,
}

/// Behaviour before the first and after the last keyframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Hold the end values.
    #[default]
    Constant,
    /// Continue the end slopes.
    Linear,
    /// No values outside the keyed range.
    None,
}

/// Naming and blending of the clip handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    /// Clip name.
    pub name: String,
    /// Blend mode.
    pub blend: BlendMode,
    /// Extrapolation mode.
    pub extrapolation: Extrapolation,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            name: "sweep".to_string(),
            blend: BlendMode::default(),
            extrapolation: Extrapolation::default(),
        }
    }
}

/// What to animate, over how many keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationPlan {
    /// Number of keyframes.
    pub keyframes: usize,
    /// Frame number of the first keyframe.
    pub start_frame: f64,
    /// Frames between keyframes.
    pub frame_step: f64,
    /// Interpolation requested from the host.
    pub interpolation: Interpolation,
    /// Clip naming and blending.
    pub clip: ClipSettings,
    /// Animated parameters; later tracks win on the same target.
    pub tracks: Vec<Track>,
}

impl Default for AnimationPlan {
    fn default() -> Self {
        Self {
            keyframes: 10,
            start_frame: 1.0,
            frame_step: 1.0,
            interpolation: Interpolation::default(),
            clip: ClipSettings::default(),
            tracks: Vec::new(),
        }
    }
}

impl AnimationPlan {
    /// Plan over `keyframes` keyframes starting at frame 1, one frame apart.
    #[must_use]
    pub fn new(keyframes: usize) -> Self {
        Self {
            keyframes,
            ..Self::default()
        }
    }

    /// Builder form of adding a track.
    #[must_use]
    pub fn with_track(mut self, target: ParamTarget, schedule: Schedule) -> Self {
        self.tracks.push(Track::new(target, schedule));
        self
    }

    /// Frame number of keyframe `k`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame(&self, k: usize) -> f64 {
        self.start_frame + self.frame_step * k as f64
    }

    /// Check the plan against the configuration it animates.
    pub fn validate(&self, config: &SweepConfig) -> AnimResult<()> {
        if self.keyframes == 0 {
            return Err(AnimError::invalid_plan("plan has no keyframes"));
        }
        if !self.frame_step.is_finite() || self.frame_step <= 0.0 {
            return Err(AnimError::invalid_plan(format!(
                "frame step must be positive, got {}",
                self.frame_step
            )));
        }
        if !self.start_frame.is_finite() {
            return Err(AnimError::invalid_plan("start frame must be finite"));
        }
        self.tracks.iter().try_for_each(|t| t.check(config))
    }

    /// Parse a plan from JSON text.
    pub fn from_json(json: &str) -> AnimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON text.
    pub fn to_json(&self) -> AnimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Keyed positions of one moving vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexChannel {
    /// Vertex index into the mesh.
    pub vertex: u32,
    /// `(frame, value)` pairs per axis, one per keyframe.
    pub axes: [Vec<(f64, f64)>; 3],
}

/// Sampled animation, ready for the host to key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedClip {
    /// Naming and blending.
    pub clip: ClipSettings,
    /// Interpolation between keys.
    pub interpolation: Interpolation,
    /// Frame number of every keyframe.
    pub frames: Vec<f64>,
    /// Vertex positions at the first keyframe.
    pub rest: Vec<Point3<f64>>,
    /// Faces, shared by every keyframe.
    pub faces: Vec<Face>,
    /// Channels of the vertices that move, by ascending vertex index.
    pub channels: Vec<VertexChannel>,
}

impl BakedClip {
    /// Number of vertices that move.
    #[must_use]
    pub fn animated_vertices(&self) -> usize {
        self.channels.len()
    }

    /// Channel of `vertex`, if it moves.
    #[must_use]
    pub fn channel(&self, vertex: u32) -> Option<&VertexChannel> {
        self.channels
            .binary_search_by_key(&vertex, |c| c.vertex)
            .ok()
            .map(|i| &self.channels[i])
    }
}

/// Accumulates rigid rotations across keyframes.
#[derive(Debug, Clone, Copy)]
struct RotationAccumulator {
    state: RotationState,
    mesh_axis: Option<Unit<Vector3<f64>>>,
    path_axis: Option<Unit<Vector3<f64>>>,
    mesh_angle: f64,
    path_angle: f64,
}

impl RotationAccumulator {
    fn new(config: &SweepConfig) -> Self {
        let stack = &config.deform;
        Self {
            state: RotationState::from_stack(stack),
            mesh_axis: Unit::try_new(stack.mesh_rotation.axis, f64::EPSILON),
            path_axis: Unit::try_new(stack.path_rotation.rotation.axis, f64::EPSILON),
            mesh_angle: configured_angle(&stack.mesh_rotation),
            path_angle: configured_angle(&stack.path_rotation.rotation),
        }
    }

    /// Advance a rotation target to `angle`.
    fn advance(&mut self, target: ParamTarget, angle: f64) {
        let (axis, last, rotation) = match target {
            ParamTarget::MeshRotation => {
                (self.mesh_axis, &mut self.mesh_angle, &mut self.state.mesh)
            }
            ParamTarget::PathRotation => {
                (self.path_axis, &mut self.path_angle, &mut self.state.path)
            }
            _ => return,
        };
        let Some(axis) = axis else {
            return;
        };
        let step = UnitQuaternion::from_axis_angle(&axis, angle - *last);
        *rotation = step * *rotation;
        *last = angle;
    }
}

/// Angle already contained in the configured rotation's quaternion.
fn configured_angle(rotation: &RigidRotation) -> f64 {
    let usable = rotation.enabled
        && rotation.angle.is_finite()
        && Unit::try_new(rotation.axis, f64::EPSILON).is_some();
    if usable { rotation.angle } else { 0.0 }
}

/// Per-keyframe values of one track.
enum TrackValues {
    Scalar(Vec<f64>),
    Index(Vec<i64>),
    Amplitude(Vec<Vector3<f64>>),
}

impl TrackValues {
    fn new(schedule: &Schedule, len: usize) -> Self {
        match schedule {
            Schedule::Value(s) => Self::Scalar(s.values(len)),
            Schedule::Index(s) => Self::Index(s.indices(len)),
            Schedule::Noise(s) => Self::Amplitude(s.amplitudes(len)),
        }
    }
}

/// Sample `plan` over `config` and bake the moving vertices.
///
/// # Errors
///
/// Fails when the plan does not fit the configuration, when any keyframe's
/// sweep fails to build, or when the vertex count changes between
/// keyframes.
///
/// # Example
///
/// ```
/// use mesh_sweep::SweepConfig;
/// use mesh_sweep_anim::{AnimationPlan, ParamTarget, Schedule, ValueSchedule, sample};
///
/// let plan = AnimationPlan::new(4)
///     .with_track(ParamTarget::Twist, Schedule::Value(ValueSchedule::ramp(0.0, 1.0)));
/// let clip = sample(&SweepConfig::default(), &plan)?;
/// assert_eq!(clip.frames, vec![1.0, 2.0, 3.0, 4.0]);
/// assert!(clip.animated_vertices() > 0);
/// # Ok::<(), mesh_sweep_anim::AnimError>(())
/// ```
pub fn sample(config: &SweepConfig, plan: &AnimationPlan) -> AnimResult<BakedClip> {
    plan.validate(config)?;
    let len = plan.keyframes;

    let values: Vec<(ParamTarget, TrackValues)> = plan
        .tracks
        .iter()
        .map(|t| (t.target, TrackValues::new(&t.schedule, len)))
        .collect();

    let mut rotations = RotationAccumulator::new(config);
    let mut snapshots: Vec<Vec<Point3<f64>>> = Vec::with_capacity(len);
    let mut faces = Vec::new();

    for k in 0..len {
        let mut frame_config = config.clone();
        for (target, track) in &values {
            match track {
                TrackValues::Scalar(v) if target.is_rotation() => {
                    rotations.advance(*target, v[k]);
                }
                TrackValues::Scalar(v) => target.set_scalar(&mut frame_config, v[k])?,
                TrackValues::Index(v) => target.set_index(&mut frame_config, v[k])?,
                TrackValues::Amplitude(v) => target.set_amplitude(&mut frame_config, v[k])?,
            }
        }

        let sweep = Sweep::with_rotations(&frame_config, rotations.state)?;
        if let Some(first) = snapshots.first() {
            if first.len() != sweep.locs().len() {
                return Err(AnimError::VertexCountChanged {
                    keyframe: k,
                    expected: first.len(),
                    actual: sweep.locs().len(),
                });
            }
        } else {
            faces = sweep.faces().to_vec();
        }
        debug!("Sampled keyframe {} at frame {}", k, plan.frame(k));
        snapshots.push(sweep.locs().to_vec());
    }

    let frames: Vec<f64> = (0..len).map(|k| plan.frame(k)).collect();
    let rest = snapshots.first().cloned().unwrap_or_default();
    let channels = bake_channels(&snapshots, &frames);

    info!(
        "Baked clip '{}': {} keyframes, {} of {} vertices animated",
        plan.clip.name,
        len,
        channels.len(),
        rest.len()
    );

    Ok(BakedClip {
        clip: plan.clip.clone(),
        interpolation: plan.interpolation,
        frames,
        rest,
        faces,
        channels,
    })
}

/// Channels for every vertex whose position differs between keyframes.
#[allow(clippy::cast_possible_truncation)]
fn bake_channels(snapshots: &[Vec<Point3<f64>>], frames: &[f64]) -> Vec<VertexChannel> {
    let Some(first) = snapshots.first() else {
        return Vec::new();
    };

    let mut channels = Vec::new();
    for (v, rest) in first.iter().enumerate() {
        let moves = snapshots.iter().any(|s| s[v] != *rest);
        if !moves {
            continue;
        }
        let axes: [Vec<(f64, f64)>; 3] = [0usize, 1, 2].map(|axis| {
            frames
                .iter()
                .zip(snapshots)
                .map(|(&frame, s)| (frame, s[v][axis]))
                .collect()
        });
        channels.push(VertexChannel {
            vertex: v as u32,
            axes,
        });
    }
    channels
}
