//! Face connectivity for the ring grid.
//!
//! Vertices are laid out row-major by ring: vertex `j` of ring `r` has index
//! `r * points + j`. Faces are quads between neighbouring rings, plus optional
//! ngon caps on open paths.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

/// Tolerance on the seam search angle, in radians.
pub const SEAM_EPSILON: f64 = 1e-4;

/// A polygon of the swept mesh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// Four vertices between two rings.
    Quad([u32; 4]),
    /// End cap with one vertex per profile point.
    Ngon(Vec<u32>),
}

impl Face {
    /// Vertex indices in winding order.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        match self {
            Self::Quad(v) => v,
            Self::Ngon(v) => v,
        }
    }

    /// Number of corners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices().len()
    }

    /// Whether the face has no corners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }

    /// Whether the face is a quad.
    #[must_use]
    pub fn is_quad(&self) -> bool {
        matches!(self, Self::Quad(_))
    }
}

/// How the closing row of a spun, closed tube is joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamPolicy {
    /// Shift the seam to the first profile index past the net spin.
    #[default]
    FollowLimit,
    /// Keep the seam; flip the closing faces between a quarter and three
    /// quarters of a turn.
    Fixed,
}

/// Inputs of [`build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologySpec {
    /// Number of rings (path points).
    pub rings: usize,
    /// Points per ring (profile points).
    pub points: usize,
    /// Whether the last ring connects back to the first.
    pub path_closed: bool,
    /// Whether each ring wraps around.
    pub profile_closed: bool,
    /// Add ngon caps on open paths.
    pub endcaps: bool,
    /// Seam handling for closed tubes.
    pub seam: SeamPolicy,
    /// Net spin of the last ring relative to the first, in radians.
    pub spin: f64,
}

impl TopologySpec {
    /// Grid without caps or spin.
    #[must_use]
    pub fn grid(rings: usize, points: usize, path_closed: bool, profile_closed: bool) -> Self {
        Self {
            rings,
            points,
            path_closed,
            profile_closed,
            endcaps: false,
            seam: SeamPolicy::default(),
            spin: 0.0,
        }
    }

    /// Number of faces [`build`] produces for this spec.
    #[must_use]
    pub fn face_count(&self) -> usize {
        if self.rings < 2 || self.points < 2 {
            return 0;
        }
        let columns = if self.profile_closed {
            self.points
        } else {
            self.points - 1
        };
        let rows = if self.path_closed {
            self.rings
        } else {
            self.rings - 1
        };
        rows * columns + if self.has_caps() { 2 } else { 0 }
    }

    fn has_caps(&self) -> bool {
        self.endcaps && !self.path_closed && self.points >= 3
    }
}

/// Build the faces of a swept grid.
///
/// Grids with fewer than two rings or two points have no faces.
///
/// # Example
///
/// ```
/// use mesh_sweep::{TopologySpec, topology};
///
/// let faces = topology::build(&TopologySpec::grid(4, 4, false, false));
/// assert_eq!(faces.len(), 9);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn build(spec: &TopologySpec) -> Vec<Face> {
    let (rings, points) = (spec.rings, spec.points);
    let mut faces = Vec::with_capacity(spec.face_count());
    if rings < 2 || points < 2 {
        return faces;
    }

    let columns = if spec.profile_closed {
        points
    } else {
        points - 1
    };
    let idx = |ring: usize, point: usize| (ring * points + point % points) as u32;

    for r in 0..rings - 1 {
        for j in 0..columns {
            faces.push(Face::Quad([
                idx(r, j),
                idx(r, j + 1),
                idx(r + 1, j + 1),
                idx(r + 1, j),
            ]));
        }
    }

    if spec.path_closed {
        let last = rings - 1;
        let seam = Seam::resolve(spec);
        for j in 0..columns {
            let quad = [
                idx(last, j),
                idx(last, j + 1),
                idx(0, j + 1 + seam.shift),
                idx(0, j + seam.shift),
            ];
            faces.push(if seam.flip {
                Face::Quad([quad[0], quad[3], quad[2], quad[1]])
            } else {
                Face::Quad(quad)
            });
        }
    } else if spec.has_caps() {
        faces.push(Face::Ngon((0..points).rev().map(|j| idx(0, j)).collect()));
        faces.push(Face::Ngon((0..points).map(|j| idx(rings - 1, j)).collect()));
    }

    faces
}

/// Index shift and winding of the closing row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Seam {
    shift: usize,
    flip: bool,
}

impl Seam {
    fn resolve(spec: &TopologySpec) -> Self {
        if !(spec.path_closed && spec.profile_closed) || !spec.spin.is_finite() {
            return Self::default();
        }
        let spin = spec.spin.rem_euclid(TAU);
        if spin == 0.0 {
            return Self::default();
        }

        match spec.seam {
            SeamPolicy::FollowLimit => Self {
                shift: follow_limit(spin, spec.points),
                flip: false,
            },
            SeamPolicy::Fixed => Self {
                shift: 0,
                flip: spin > FRAC_PI_2 && spin < 3.0 * FRAC_PI_2,
            },
        }
    }
}

/// First profile index whose nominal angle reaches `spin`, within
/// [`SEAM_EPSILON`]. Wraps to zero past the last index.
#[allow(clippy::cast_precision_loss)]
fn follow_limit(spin: f64, points: usize) -> usize {
    let step = TAU / points as f64;
    (0..points)
        .find(|&k| step * k as f64 >= spin - SEAM_EPSILON)
        .unwrap_or(0)
}
