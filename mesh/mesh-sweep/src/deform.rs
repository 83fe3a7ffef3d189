//! The deformation stack.
//!
//! Every recompute replays the whole stack from the raw path and profile
//! arrays. Edits of the same kind add their deltas, so their order within a
//! kind does not matter. The pipeline order across kinds is fixed:
//!
//! 1. mesh rotation: turns the whole sweep, up reference included
//! 2. path rotation, when applied before frames
//! 3. roll + twist + spin of every ring about its local axis
//! 4. path location edits, along world axes
//! 5. profile blends, on the rolled rings
//! 6. profile location edits, along ring-local axes of the rolled rings
//! 7. coordinate noise
//!
//! Frames are transported over the edited path before rings are placed.
//! A path rotation flagged to run after frames turns the placed rings
//! between steps 6 and 7.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sweep_curves::{CurveProvider, ShapeConfig};
use tracing::debug;

use crate::error::{SweepError, SweepResult};
use crate::falloff::{self, FalloffSpec};
use crate::frame::{UpReference, transport_frames};

/// How a location edit picks its direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Move along the edit axis.
    #[default]
    Absolute,
    /// Move along each point's radial direction, masked by the edit axis.
    Relative,
}

/// Moves selected path points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationEdit {
    /// Distance scale.
    pub amount: f64,
    /// Direction (absolute) or component mask (relative).
    pub axis: Vector3<f64>,
    /// Direction mode.
    pub mode: EditMode,
    /// Selected rings.
    pub falloff: FalloffSpec,
}

impl Default for LocationEdit {
    fn default() -> Self {
        Self {
            amount: 0.0,
            axis: Vector3::z(),
            mode: EditMode::Absolute,
            falloff: FalloffSpec::default(),
        }
    }
}

impl LocationEdit {
    /// Absolute edit moving `falloff`'s selection by `axis * amount`.
    #[must_use]
    pub fn absolute(amount: f64, axis: Vector3<f64>, falloff: FalloffSpec) -> Self {
        Self {
            amount,
            axis,
            mode: EditMode::Absolute,
            falloff,
        }
    }

    /// Relative edit pushing the selection away from the centroid.
    #[must_use]
    pub fn relative(amount: f64, axis: Vector3<f64>, falloff: FalloffSpec) -> Self {
        Self {
            mode: EditMode::Relative,
            ..Self::absolute(amount, axis, falloff)
        }
    }

    /// Whether the edit cannot move anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        is_noop(self.amount, &self.axis)
    }
}

/// Moves selected points on selected rings, in the ring's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEdit {
    /// Distance scale.
    pub amount: f64,
    /// Direction (absolute) or component mask (relative).
    pub axis: Vector3<f64>,
    /// Direction mode.
    pub mode: EditMode,
    /// Selected rings.
    pub rings: FalloffSpec,
    /// Selected points within each ring.
    pub points: FalloffSpec,
}

impl Default for ProfileEdit {
    fn default() -> Self {
        Self {
            amount: 0.0,
            axis: Vector3::x(),
            mode: EditMode::Relative,
            rings: FalloffSpec::all(),
            points: FalloffSpec::default(),
        }
    }
}

impl ProfileEdit {
    /// Whether the edit cannot move anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        is_noop(self.amount, &self.axis)
    }
}

/// Pulls selected rings toward a second profile shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendProfile {
    /// Target shape; sampled at the profile's point count.
    pub shape: ShapeConfig,
    /// Rotation of the target about the local Z axis, in radians.
    pub rotation: f64,
    /// Selected rings.
    pub rings: FalloffSpec,
    /// Selected points within each ring.
    pub points: FalloffSpec,
    /// Blend strength; 1 reaches the target at full weight.
    pub factor: f64,
}

impl Default for BlendProfile {
    fn default() -> Self {
        Self {
            shape: ShapeConfig::ellipse(1.0, 1.0, 8),
            rotation: 0.0,
            rings: FalloffSpec::all(),
            points: FalloffSpec::all(),
            factor: 0.0,
        }
    }
}

/// Rotates selected rings about their local axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinEdit {
    /// Angle at full weight, in radians.
    pub angle: f64,
    /// Selected rings.
    pub rings: FalloffSpec,
}

impl Default for SpinEdit {
    fn default() -> Self {
        Self {
            angle: 0.0,
            rings: FalloffSpec::all(),
        }
    }
}

/// Rotation of a point set about a pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidRotation {
    /// Whether the rotation is applied.
    pub enabled: bool,
    /// Rotation axis.
    pub axis: Vector3<f64>,
    /// Angle in radians.
    pub angle: f64,
    /// Pivot; the caller's default applies when unset.
    pub pivot: Option<Point3<f64>>,
}

impl Default for RigidRotation {
    fn default() -> Self {
        Self {
            enabled: false,
            axis: Vector3::z(),
            angle: 0.0,
            pivot: None,
        }
    }
}

impl RigidRotation {
    /// Enabled rotation by `angle` about `axis`.
    #[must_use]
    pub fn about(axis: Vector3<f64>, angle: f64) -> Self {
        Self {
            enabled: true,
            axis,
            angle,
            pivot: None,
        }
    }

    /// The rotation as a quaternion; identity when disabled or degenerate.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        if !self.enabled || self.angle == 0.0 || !self.angle.is_finite() {
            return UnitQuaternion::identity();
        }
        Unit::try_new(self.axis, f64::EPSILON).map_or_else(UnitQuaternion::identity, |axis| {
            UnitQuaternion::from_axis_angle(&axis, self.angle)
        })
    }
}

/// Rigid rotation of the path, before or after ring orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathRotation {
    /// Rotation; the pivot defaults to the centroid of the mesh-rotated path.
    pub rotation: RigidRotation,
    /// Rotate the finished rings instead of the bare path.
    pub after_frames: bool,
}

/// Uniform random displacement of every vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Noise {
    /// Maximum displacement per axis.
    pub amplitude: Vector3<f64>,
    /// Random seed.
    pub seed: u64,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            amplitude: Vector3::zeros(),
            seed: 0,
        }
    }
}

/// Accumulated rigid rotations.
///
/// Built from the stack by default; animation passes its own accumulated
/// state to advance rotations by increments instead of absolute angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Mesh rotation.
    pub mesh: UnitQuaternion<f64>,
    /// Path rotation.
    pub path: UnitQuaternion<f64>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            mesh: UnitQuaternion::identity(),
            path: UnitQuaternion::identity(),
        }
    }
}

impl RotationState {
    /// Rotations as configured in `stack`.
    #[must_use]
    pub fn from_stack(stack: &DeformStack) -> Self {
        Self {
            mesh: stack.mesh_rotation.quaternion(),
            path: stack.path_rotation.rotation.quaternion(),
        }
    }
}

/// Every edit applied on top of the raw path and profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformStack {
    /// Rotation of the whole sweep, applied first; pivot defaults to the origin.
    pub mesh_rotation: RigidRotation,
    /// Rotation of the path.
    pub path_rotation: PathRotation,
    /// Constant ring rotation about the local axis, in radians.
    pub roll: f64,
    /// Ring rotation ramped from zero at the first ring, in radians.
    pub twist: f64,
    /// Weighted ring rotations.
    pub spins: Vec<SpinEdit>,
    /// Path location edits.
    pub path_edits: Vec<LocationEdit>,
    /// Profile blends.
    pub blends: Vec<BlendProfile>,
    /// Profile location edits.
    pub profile_edits: Vec<ProfileEdit>,
    /// Coordinate noise.
    pub noise: Noise,
}

impl DeformStack {
    /// Number of list edits in the stack.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.spins.len() + self.path_edits.len() + self.blends.len() + self.profile_edits.len()
    }

    /// Twist ramp angle of ring `ring` out of `rings`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn twist_at(&self, ring: usize, rings: usize, path_closed: bool) -> f64 {
        let span = if path_closed {
            rings
        } else {
            rings.saturating_sub(1)
        };
        if span == 0 {
            return 0.0;
        }
        self.twist * ring as f64 / span as f64
    }

    /// Ring-to-ring spin accumulated across the closing seam.
    #[must_use]
    pub fn net_spin(&self, rings: usize) -> f64 {
        if rings == 0 {
            return 0.0;
        }
        let spins = self.spin_angles(rings);
        self.twist + spins[rings - 1] - spins[0]
    }

    /// Summed spin edit angle per ring.
    fn spin_angles(&self, rings: usize) -> Vec<f64> {
        let mut angles = vec![0.0; rings];
        for spin in self.spins.iter().filter(|s| s.angle != 0.0) {
            for (ring, w) in falloff::compute(rings, &spin.rings).iter() {
                angles[ring] += spin.angle * w;
            }
        }
        angles
    }
}

/// Raw inputs of one recompute.
#[derive(Debug, Clone, Copy)]
pub struct RawCurves<'a> {
    /// Path points, one per ring.
    pub path: &'a [Point3<f64>],
    /// Profile points in the local XY plane.
    pub profile: &'a [Point3<f64>],
    /// Whether the path is closed.
    pub path_closed: bool,
    /// Orientation reference of the first ring.
    pub up: UpReference,
}

/// Replay `stack` over `raw` and return the `rings * points` vertex grid.
///
/// # Errors
///
/// Fails when a blend shape cannot be sampled at the profile's point count.
pub fn apply(
    stack: &DeformStack,
    raw: &RawCurves<'_>,
    rotations: &RotationState,
) -> SweepResult<Vec<Point3<f64>>> {
    let rings = raw.path.len();
    let points = raw.profile.len();

    let mut path = raw.path.to_vec();
    let mesh_pivot = stack.mesh_rotation.pivot.unwrap_or_else(Point3::origin);
    rotate_about(&mut path, &rotations.mesh, &mesh_pivot);

    let path_pivot = stack
        .path_rotation
        .rotation
        .pivot
        .unwrap_or_else(|| centroid(&path));
    let after_frames = stack.path_rotation.after_frames;
    if !after_frames {
        rotate_about(&mut path, &rotations.path, &path_pivot);
    }

    let rings_layer = RingLayer::new(stack, raw, rings)?;

    let base = path.clone();
    apply_path_edits(&stack.path_edits, &base, &mut path);

    // Transport in the mesh's own space so the up reference turns with it.
    let unturned: Vec<Point3<f64>> = path
        .iter()
        .map(|p| rotations.mesh.inverse_transform_point(p))
        .collect();
    let frames = transport_frames(&unturned, raw.up, raw.path_closed);

    let mut locs = Vec::with_capacity(rings * points);
    let mut rolled = vec![Point3::origin(); points];
    let mut local = vec![Point3::origin(); points];
    for (r, (anchor, frame)) in path.iter().zip(&frames).enumerate() {
        rings_layer.shape_ring(r, raw.profile, &mut rolled, &mut local);
        let orient = rotations.mesh * frame;
        locs.extend(local.iter().map(|p| anchor + orient * p.coords));
    }

    if after_frames {
        rotate_about(&mut locs, &rotations.path, &path_pivot);
    }
    apply_noise(&stack.noise, &mut locs);

    debug!(
        "Deformed {}x{} grid: {} path edits, {} blends, {} profile edits, {} spins",
        rings,
        points,
        stack.path_edits.len(),
        rings_layer.blends.len(),
        stack.profile_edits.len(),
        stack.spins.len()
    );
    Ok(locs)
}

/// Sum path edit deltas against `base` and add them to `path`.
fn apply_path_edits(edits: &[LocationEdit], base: &[Point3<f64>], path: &mut [Point3<f64>]) {
    let rings = base.len();
    let center = centroid(base);
    for edit in edits.iter().filter(|e| !e.is_noop()) {
        for (i, w) in falloff::compute(rings, &edit.falloff).iter() {
            let dir = match edit.mode {
                EditMode::Absolute => edit.axis,
                EditMode::Relative => {
                    radial(&base[i].coords, &center.coords).component_mul(&edit.axis)
                }
            };
            path[i] += dir * edit.amount * w;
        }
    }
}

/// Per-ring profile shaping, precomputed once per recompute.
struct RingLayer<'s> {
    blends: Vec<BlendLayer>,
    profile_edits: Vec<(&'s ProfileEdit, Vec<f64>, Vec<f64>)>,
    angles: Vec<f64>,
}

struct BlendLayer {
    target: Vec<Point3<f64>>,
    ring_weights: Vec<f64>,
    point_weights: Vec<f64>,
    factor: f64,
}

impl<'s> RingLayer<'s> {
    fn new(stack: &'s DeformStack, raw: &RawCurves<'_>, rings: usize) -> SweepResult<Self> {
        let points = raw.profile.len();

        let mut blends = Vec::new();
        for (i, blend) in stack.blends.iter().enumerate() {
            if blend.factor == 0.0 {
                continue;
            }
            blends.push(BlendLayer {
                target: sample_blend(blend, points, i)?,
                ring_weights: falloff::compute(rings, &blend.rings).dense(rings),
                point_weights: falloff::compute(points, &blend.points).dense(points),
                factor: blend.factor,
            });
        }

        let profile_edits = stack
            .profile_edits
            .iter()
            .filter(|e| !e.is_noop())
            .map(|e| {
                (
                    e,
                    falloff::compute(rings, &e.rings).dense(rings),
                    falloff::compute(points, &e.points).dense(points),
                )
            })
            .collect();

        let spins = stack.spin_angles(rings);
        let angles = (0..rings)
            .map(|r| stack.roll + stack.twist_at(r, rings, raw.path_closed) + spins[r])
            .collect();

        Ok(Self {
            blends,
            profile_edits,
            angles,
        })
    }

    fn angle(&self, ring: usize) -> f64 {
        self.angles.get(ring).copied().unwrap_or(0.0)
    }

    /// Write ring `r`'s local profile into `out`, using `rolled` as scratch.
    ///
    /// The ring is turned by its roll, twist and spin first; blends and
    /// profile edits then add their deltas against the turned ring.
    fn shape_ring(
        &self,
        r: usize,
        profile: &[Point3<f64>],
        rolled: &mut [Point3<f64>],
        out: &mut [Point3<f64>],
    ) {
        let turn = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.angle(r));
        for (dst, p) in rolled.iter_mut().zip(profile) {
            *dst = turn * p;
        }
        out.copy_from_slice(rolled);

        for blend in &self.blends {
            let wr = blend.ring_weights[r] * blend.factor;
            if wr == 0.0 {
                continue;
            }
            for (p, &wp) in blend.point_weights.iter().enumerate() {
                out[p] += (blend.target[p] - rolled[p]) * wr * wp;
            }
        }

        for (edit, ring_weights, point_weights) in &self.profile_edits {
            let wr = ring_weights[r] * edit.amount;
            if wr == 0.0 {
                continue;
            }
            for (p, &wp) in point_weights.iter().enumerate() {
                let dir = match edit.mode {
                    EditMode::Absolute => edit.axis,
                    EditMode::Relative => {
                        radial(&rolled[p].coords, &Vector3::zeros()).component_mul(&edit.axis)
                    }
                };
                out[p] += dir * wr * wp;
            }
        }
    }
}

/// Sample a blend target at `points` and rotate it about the local Z axis.
fn sample_blend(
    blend: &BlendProfile,
    points: usize,
    index: usize,
) -> SweepResult<Vec<Point3<f64>>> {
    let what = format!("blend profile {index}");
    let mut shape = blend.shape.clone();
    shape.set_points(points);
    let planar = shape
        .build_planar()
        .map_err(|e| SweepError::from_curve(&what, e))?;
    if planar.len() != points {
        return Err(SweepError::count_mismatch(what, points, planar.len()));
    }
    let turn = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), blend.rotation);
    Ok(planar
        .iter()
        .map(|p| turn * Point3::new(p.x, p.y, 0.0))
        .collect())
}

fn apply_noise(noise: &Noise, locs: &mut [Point3<f64>]) {
    if noise.amplitude.iter().all(|a| *a == 0.0) {
        return;
    }
    let mut rng = StdRng::seed_from_u64(noise.seed);
    for p in locs.iter_mut() {
        for axis in 0..3 {
            p[axis] += rng.gen_range(-1.0_f64..1.0) * noise.amplitude[axis];
        }
    }
}

fn rotate_about(points: &mut [Point3<f64>], rotation: &UnitQuaternion<f64>, pivot: &Point3<f64>) {
    if *rotation == UnitQuaternion::identity() {
        return;
    }
    for p in points.iter_mut() {
        *p = pivot + rotation * (*p - pivot);
    }
}

fn is_noop(amount: f64, axis: &Vector3<f64>) -> bool {
    amount == 0.0 || axis.iter().all(|c| *c == 0.0)
}

/// Unit direction from `center` to `p`; zero when they coincide.
fn radial(p: &Vector3<f64>, center: &Vector3<f64>) -> Vector3<f64> {
    (p - center)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Mean of `points`; the origin for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}
