//! The sweep kernel.
//!
//! Samples the path and profile once, then replays the deformation stack
//! and rebuilds the faces on every recompute.

use hashbrown::HashSet;
use nalgebra::Point3;
use sweep_curves::CurveProvider;
use tracing::{debug, warn};

use crate::config::SweepConfig;
use crate::deform::{self, DeformStack, RawCurves, RotationState};
use crate::error::{SweepError, SweepResult};
use crate::topology::{self, Face, TopologySpec};

/// A swept quad mesh.
///
/// # Example
///
/// ```
/// use mesh_sweep::{Sweep, SweepConfig};
/// use sweep_curves::{Axis, ShapeConfig};
///
/// let config = SweepConfig::new(
///     ShapeConfig::line(Axis::Z, 10.0, 4),
///     ShapeConfig::polygon(4, 2.0, 2.0),
/// );
/// let sweep = Sweep::new(&config)?;
/// assert_eq!(sweep.locs().len(), 16);
/// assert_eq!(sweep.faces().len(), 9);
/// # Ok::<(), mesh_sweep::SweepError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Sweep {
    config: SweepConfig,
    rotations: Option<RotationState>,
    path: Vec<Point3<f64>>,
    profile: Vec<Point3<f64>>,
    locs: Vec<Point3<f64>>,
    faces: Vec<Face>,
    selected: HashSet<u32>,
    recomputes: usize,
    invalidated: bool,
}

impl Sweep {
    /// Sample `config`'s curves and compute the mesh.
    ///
    /// # Errors
    ///
    /// Fails when either curve cannot be sampled or a blend shape does not
    /// match the profile's point count.
    pub fn new(config: &SweepConfig) -> SweepResult<Self> {
        Self::build(config, None)
    }

    /// Like [`Self::new`], with rigid rotations taken from `rotations`
    /// instead of the configuration.
    pub fn with_rotations(config: &SweepConfig, rotations: RotationState) -> SweepResult<Self> {
        Self::build(config, Some(rotations))
    }

    fn build(config: &SweepConfig, rotations: Option<RotationState>) -> SweepResult<Self> {
        let path = config
            .path
            .build()
            .map_err(|e| SweepError::from_curve("path", e))?;
        let profile = config
            .profile
            .build_planar()
            .map_err(|e| SweepError::from_curve("profile", e))?
            .into_iter()
            .map(|p| Point3::new(p.x, p.y, 0.0))
            .collect();

        let mut sweep = Self {
            config: config.clone(),
            rotations,
            path,
            profile,
            locs: Vec::new(),
            faces: Vec::new(),
            selected: HashSet::new(),
            recomputes: 0,
            invalidated: false,
        };
        sweep.recompute()?;
        Ok(sweep)
    }

    /// Working vertices, `rings * points` long, row-major by ring.
    #[must_use]
    pub fn locs(&self) -> &[Point3<f64>] {
        &self.locs
    }

    /// Faces indexing into [`Self::locs`].
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Raw path points as sampled.
    #[must_use]
    pub fn path(&self) -> &[Point3<f64>] {
        &self.path
    }

    /// Raw profile points, lifted to `z = 0`.
    #[must_use]
    pub fn profile(&self) -> &[Point3<f64>] {
        &self.profile
    }

    /// Number of rings.
    #[must_use]
    pub fn rings(&self) -> usize {
        self.path.len()
    }

    /// Points per ring.
    #[must_use]
    pub fn points(&self) -> usize {
        self.profile.len()
    }

    /// The configuration this sweep was built from, with batch edits applied.
    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Number of recomputes run so far, including the initial one.
    #[must_use]
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Whether a failed recompute has invalidated this instance.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Replay the deformation stack and rebuild the faces.
    ///
    /// # Errors
    ///
    /// On failure the instance is invalidated and every later call returns
    /// [`SweepError::Invalidated`].
    pub fn recompute(&mut self) -> SweepResult<()> {
        if self.invalidated {
            warn!("Recompute requested on an invalidated sweep");
            return Err(SweepError::Invalidated);
        }
        self.recomputes += 1;

        let result = self.compute();
        match result {
            Ok((locs, faces)) => {
                self.locs = locs;
                self.faces = faces;
                let face_count = self.faces.len();
                self.selected
                    .retain(|&f| usize::try_from(f).is_ok_and(|f| f < face_count));
                debug!(
                    "Recomputed sweep: {} rings x {} points, {} faces, {} edits",
                    self.rings(),
                    self.points(),
                    face_count,
                    self.config.deform.edit_count()
                );
                Ok(())
            }
            Err(err) => {
                self.invalidated = true;
                self.locs.clear();
                self.faces.clear();
                self.selected.clear();
                Err(err)
            }
        }
    }

    fn compute(&self) -> SweepResult<(Vec<Point3<f64>>, Vec<Face>)> {
        let stack = &self.config.deform;
        let raw = RawCurves {
            path: &self.path,
            profile: &self.profile,
            path_closed: self.config.path.closed,
            up: self.config.up,
        };
        let rotations = self
            .rotations
            .unwrap_or_else(|| RotationState::from_stack(stack));
        let locs = deform::apply(stack, &raw, &rotations)?;

        let faces = topology::build(&TopologySpec {
            rings: self.rings(),
            points: self.points(),
            path_closed: self.config.path.closed,
            profile_closed: self.config.profile.closed,
            endcaps: self.config.endcaps,
            seam: self.config.seam,
            spin: stack.net_spin(self.rings()),
        });
        Ok((locs, faces))
    }

    /// Apply any number of stack edits with a single recompute.
    ///
    /// The recompute runs when `edit` returns, whether it succeeded or not.
    /// An error from `edit` takes precedence over one from the recompute.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sweep::{Sweep, SweepConfig};
    ///
    /// let mut sweep = Sweep::new(&SweepConfig::default())?;
    /// sweep.batch(|stack| {
    ///     stack.roll = 0.5;
    ///     stack.twist = 1.0;
    ///     Ok(())
    /// })?;
    /// assert_eq!(sweep.recompute_count(), 2);
    /// # Ok::<(), mesh_sweep::SweepError>(())
    /// ```
    pub fn batch<T, F>(&mut self, edit: F) -> SweepResult<T>
    where
        F: FnOnce(&mut DeformStack) -> SweepResult<T>,
    {
        if self.invalidated {
            warn!("Batch edit requested on an invalidated sweep");
            return Err(SweepError::Invalidated);
        }
        let outcome = edit(&mut self.config.deform);
        let recomputed = self.recompute();
        let value = outcome?;
        recomputed?;
        Ok(value)
    }

    /// Replace the rotation override; `None` returns to the configured
    /// rotations. Takes effect on the next recompute.
    pub fn set_rotations(&mut self, rotations: Option<RotationState>) {
        self.rotations = rotations;
    }

    /// Mark a face as selected. Returns `false` for out-of-range faces.
    pub fn select_face(&mut self, face: u32) -> bool {
        if usize::try_from(face).is_ok_and(|f| f < self.faces.len()) {
            self.selected.insert(face);
            true
        } else {
            false
        }
    }

    /// Unmark a face. Returns whether it was selected.
    pub fn deselect_face(&mut self, face: u32) -> bool {
        self.selected.remove(&face)
    }

    /// Unmark every face.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Indices of the selected faces.
    #[must_use]
    pub fn selected_faces(&self) -> &HashSet<u32> {
        &self.selected
    }
}
