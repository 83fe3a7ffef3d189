//! Per-keyframe value lists.
//!
//! A schedule turns a handful of parameters into one value per keyframe.
//! Schedules are pure: the same parameters always give the same list.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sweep_curves::Easing;

/// Eased ramp from `start` to `target`, optionally mirrored in cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueSchedule {
    /// Value at the first keyframe.
    pub start: f64,
    /// Value at the last keyframe, or at the peak of each mirrored cycle.
    pub target: f64,
    /// Ramp curve; `off` ramps linearly.
    pub easing: Easing,
    /// Exponent of the ramp curve.
    pub exponent: f64,
    /// Ramp up and back down within each cycle. A two-keyframe cycle
    /// alternates between `start` and `target`.
    pub mirror: bool,
    /// Number of mirrored cycles.
    pub cycles: usize,
}

impl Default for ValueSchedule {
    fn default() -> Self {
        Self {
            start: 0.0,
            target: 1.0,
            easing: Easing::Linear,
            exponent: 1.0,
            mirror: false,
            cycles: 1,
        }
    }
}

impl ValueSchedule {
    /// Linear ramp from `start` to `target`.
    #[must_use]
    pub fn ramp(start: f64, target: f64) -> Self {
        Self {
            start,
            target,
            ..Self::default()
        }
    }

    /// Builder form of the mirror settings.
    #[must_use]
    pub fn mirrored(mut self, cycles: usize) -> Self {
        self.mirror = true;
        self.cycles = cycles;
        self
    }

    /// Builder form of the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing, exponent: f64) -> Self {
        self.easing = easing;
        self.exponent = exponent;
        self
    }

    /// One value per keyframe.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sweep_anim::ValueSchedule;
    ///
    /// let values = ValueSchedule::ramp(0.0, 4.0).mirrored(1).values(5);
    /// assert_eq!(values, vec![0.0, 2.0, 4.0, 4.0, 2.0]);
    /// ```
    #[must_use]
    pub fn values(&self, len: usize) -> Vec<f64> {
        self.progress(len)
            .into_iter()
            .map(|t| {
                let t = self.easing.progress(t, self.exponent);
                self.start + (self.target - self.start) * t
            })
            .collect()
    }

    /// Un-eased ramp parameter per keyframe, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    fn progress(&self, len: usize) -> Vec<f64> {
        if !self.mirror {
            let span = len.saturating_sub(1).max(1) as f64;
            return (0..len).map(|k| k as f64 / span).collect();
        }

        let group = (len / self.cycles.max(1)).max(1);
        let ramp: Vec<f64> = if group == 2 {
            vec![0.0, 1.0]
        } else if group % 2 == 0 {
            let half = (group / 2).saturating_sub(1).max(1) as f64;
            (0..group)
                .map(|i| i.min(group - 1 - i) as f64 / half)
                .collect()
        } else {
            let half = (group / 2).max(1) as f64;
            (0..group).map(|i| i.min(group - i) as f64 / half).collect()
        };
        (0..len).map(|k| ramp[k % group].min(1.0)).collect()
    }
}

/// Index offsets stepped at regular keyframes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSchedule {
    /// Index held before `begin`.
    pub base: i64,
    /// First keyframe that may step.
    pub begin: usize,
    /// Keyframes between steps.
    pub step: usize,
    /// Increment per step, or the random range half-width.
    pub offset: i64,
    /// Draw each step from `[base - offset, base + offset]`.
    pub random: bool,
    /// Seed of the random mode.
    pub seed: u64,
}

impl Default for IndexSchedule {
    fn default() -> Self {
        Self {
            base: 0,
            begin: 0,
            step: 1,
            offset: 1,
            random: false,
            seed: 0,
        }
    }
}

impl IndexSchedule {
    /// Sequential schedule adding `offset` every `step` keyframes from `begin`.
    #[must_use]
    pub fn sequential(base: i64, begin: usize, step: usize, offset: i64) -> Self {
        Self {
            base,
            begin,
            step,
            offset,
            ..Self::default()
        }
    }

    /// Random schedule redrawn every `step` keyframes from `begin`.
    #[must_use]
    pub fn random(base: i64, begin: usize, step: usize, offset: i64, seed: u64) -> Self {
        Self {
            random: true,
            seed,
            ..Self::sequential(base, begin, step, offset)
        }
    }

    /// One index per keyframe, unwrapped; targets wrap it to their point count.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_sweep_anim::IndexSchedule;
    ///
    /// let ids = IndexSchedule::sequential(0, 1, 2, 3).indices(6);
    /// assert_eq!(ids, vec![0, 0, 3, 3, 6, 6]);
    /// ```
    #[must_use]
    pub fn indices(&self, len: usize) -> Vec<i64> {
        let step = self.step.max(1);
        let spread = self.offset.saturating_abs();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut current = self.base;
        let mut out = Vec::with_capacity(len);
        for k in 0..len {
            if k >= self.begin && (k - self.begin + 1) % step == 0 {
                current = if self.random {
                    rng.gen_range(self.base.saturating_sub(spread)..=self.base.saturating_add(spread))
                } else {
                    current.saturating_add(self.offset)
                };
            }
            out.push(current);
        }

        if self.random {
            if let Some(last) = out.last_mut() {
                *last = self.base;
            }
        }
        out
    }
}

/// Noise amplitude ramped in, held, and ramped out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseEnvelope {
    /// Peak amplitude per axis.
    pub amplitude: Vector3<f64>,
    /// Keyframes ramping from zero to the peak.
    pub blend_in: usize,
    /// Keyframes held at the peak.
    pub hold: usize,
    /// Keyframes ramping from the peak back to zero.
    pub blend_out: usize,
}

impl Default for NoiseEnvelope {
    fn default() -> Self {
        Self {
            amplitude: Vector3::zeros(),
            blend_in: 0,
            hold: 0,
            blend_out: 0,
        }
    }
}

impl NoiseEnvelope {
    /// Envelope gain per keyframe, in `[0, 1]`.
    ///
    /// With every length zero the gain is constant at one. Keyframes past
    /// the envelope get zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn gains(&self, len: usize) -> Vec<f64> {
        let (bin, hold, bout) = (self.blend_in, self.hold, self.blend_out);
        if bin == 0 && hold == 0 && bout == 0 {
            return vec![1.0; len];
        }
        (0..len)
            .map(|k| {
                if k < bin {
                    k as f64 / bin as f64
                } else if k < bin + hold {
                    1.0
                } else if k < bin + hold + bout {
                    let j = k - bin - hold;
                    1.0 - (j + 1) as f64 / bout as f64
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Amplitude per keyframe.
    #[must_use]
    pub fn amplitudes(&self, len: usize) -> Vec<Vector3<f64>> {
        self.gains(len)
            .into_iter()
            .map(|g| self.amplitude * g)
            .collect()
    }
}
