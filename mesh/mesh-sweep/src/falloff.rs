//! Indexed, weighted selections over rings or profile points.
//!
//! Every numeric edit in the deformation stack decides *where* it applies
//! and *how strongly* through a [`FalloffSpec`]. The engine never fails:
//! indices are wrapped and counts are clamped, because the inputs come
//! straight from user-typed fields.

use serde::{Deserialize, Serialize};
use sweep_curves::Easing;

/// How weights are folded around one half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reflect {
    /// Weights are used as computed.
    #[default]
    None,
    /// `1 - |2w - 1|`: peaks where the curve crosses one half.
    All,
    /// Weights above one half are mirrored below it.
    Highs,
    /// Weights below one half are mirrored above it.
    Lows,
}

impl Reflect {
    /// Fold a single weight.
    #[must_use]
    pub fn apply(self, w: f64) -> f64 {
        match self {
            Self::None => w,
            Self::All => 1.0 - (2.0 * w - 1.0).abs(),
            Self::Highs => {
                if w > 0.5 {
                    1.0 - w
                } else {
                    w
                }
            }
            Self::Lows => {
                if w < 0.5 {
                    1.0 - w
                } else {
                    w
                }
            }
        }
    }
}

/// Selection parameters.
///
/// # Invariants
///
/// Against a point count `total`, `items` is used as `clamp(items, 1, total)`
/// and `start` as `start.rem_euclid(total)`. [`Self::clamp_to`] stores the
/// clamped values; [`compute`] applies the same formulas on the fly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalloffSpec {
    /// First selected index.
    pub start: i64,
    /// Number of consecutive indices per run.
    pub items: usize,
    /// Indices skipped between repeated runs.
    pub gap: usize,
    /// Number of runs.
    pub repeats: usize,
    /// Weight curve across a run.
    pub easing: Easing,
    /// Exponent of the weight curve.
    pub exponent: f64,
    /// Make each run palindromic (ramp up, then down). A two-item run has
    /// no room to ramp and sits at the peak.
    pub mirror: bool,
    /// Fold applied after easing.
    pub reflect: Reflect,
    /// Walk indices downwards from `start`.
    pub reverse: bool,
    /// Amplitude multiplier applied every `falloff_step` repeats, in `[0, 1]`.
    pub falloff_factor: f64,
    /// Repeats per amplitude step.
    pub falloff_step: usize,
}

impl Default for FalloffSpec {
    fn default() -> Self {
        Self {
            start: 0,
            items: 1,
            gap: 0,
            repeats: 1,
            easing: Easing::Off,
            exponent: 1.0,
            mirror: false,
            reflect: Reflect::None,
            reverse: false,
            falloff_factor: 1.0,
            falloff_step: 1,
        }
    }
}

impl FalloffSpec {
    /// Select `items` consecutive indices from `start` at full weight.
    #[must_use]
    pub fn run(start: i64, items: usize) -> Self {
        Self {
            start,
            items,
            ..Self::default()
        }
    }

    /// Select every index at full weight.
    #[must_use]
    pub fn all() -> Self {
        Self::run(0, usize::MAX)
    }

    /// Builder form of the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing, exponent: f64) -> Self {
        self.easing = easing;
        self.exponent = exponent;
        self
    }

    /// Builder form of the mirror flag.
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }

    /// Builder form of the repeat settings.
    #[must_use]
    pub fn with_repeats(mut self, repeats: usize, gap: usize) -> Self {
        self.repeats = repeats;
        self.gap = gap;
        self
    }

    /// Set `start`, wrapped into `[0, total)`.
    pub fn set_start(&mut self, start: i64, total: usize) {
        self.start = sweep_curves::wrap_offset(start, total);
    }

    /// Set `items`, clamped into `[1, total]`.
    pub fn set_items(&mut self, items: usize, total: usize) {
        self.items = items.min(total).max(1);
    }

    /// Re-clamp the dependent fields against a new point count.
    pub fn clamp_to(&mut self, total: usize) {
        self.set_start(self.start, total);
        self.set_items(self.items, total);
    }
}

/// Parallel index and weight lists produced by [`compute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Falloff {
    /// Selected indices, each in `[0, total)`, without duplicates.
    pub indices: Vec<usize>,
    /// Weight of each selected index, in `[0, 1]`.
    pub weights: Vec<f64>,
}

impl Falloff {
    /// Number of selected indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.weights.iter().copied())
    }

    /// Expand into a dense per-index weight table of length `total`.
    #[must_use]
    pub fn dense(&self, total: usize) -> Vec<f64> {
        let mut table = vec![0.0; total];
        for (i, w) in self.iter() {
            if let Some(slot) = table.get_mut(i) {
                *slot = w;
            }
        }
        table
    }
}

/// Compute the selection for `total` points.
///
/// # Example
///
/// ```
/// use mesh_sweep::{FalloffSpec, falloff};
/// use sweep_curves::Easing;
///
/// let spec = FalloffSpec::run(2, 3).with_easing(Easing::Linear, 1.0);
/// let sel = falloff::compute(4, &spec);
/// assert_eq!(sel.indices, vec![2, 3, 0]);
/// assert_eq!(sel.weights, vec![0.0, 0.5, 1.0]);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute(total: usize, spec: &FalloffSpec) -> Falloff {
    if total == 0 {
        return Falloff::default();
    }

    let items = spec.items.clamp(1, total);
    let start = usize::try_from(sweep_curves::wrap_offset(spec.start, total)).unwrap_or(0);
    let base = run_weights(items, spec);

    let mut taken = vec![false; total];
    let mut out = Falloff {
        indices: Vec::with_capacity(total),
        weights: Vec::with_capacity(total),
    };

    // Run offsets advance by `stride` modulo `total`, so they cycle after
    // `total / gcd(stride, total)` runs; later runs only revisit taken indices.
    let stride = (items + spec.gap % total) % total;
    let cycle = total / gcd(stride, total);
    let repeats = if items < total {
        spec.repeats.clamp(1, cycle)
    } else {
        1
    };
    let factor = if spec.falloff_factor.is_finite() {
        spec.falloff_factor.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let step = spec.falloff_step.max(1);

    let mut run_offset = 0;
    'runs: for r in 0..repeats {
        let amplitude = factor.powi(i32::try_from(r / step).unwrap_or(i32::MAX));
        for (k, &w) in base.iter().enumerate() {
            let shift = (run_offset + k) % total;
            let index = if spec.reverse {
                (start + total - shift) % total
            } else {
                (start + shift) % total
            };
            if !taken[index] {
                taken[index] = true;
                out.indices.push(index);
                out.weights.push(w * amplitude);
            }
            if out.indices.len() == total {
                break 'runs;
            }
        }
        run_offset = (run_offset + stride) % total;
    }
    out
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Weights for one run of `items` positions.
#[allow(clippy::cast_precision_loss)]
fn run_weights(items: usize, spec: &FalloffSpec) -> Vec<f64> {
    if spec.easing.is_off() || items == 1 {
        return vec![1.0; items];
    }
    let last = items - 1;
    let half = (last / 2).max(1) as f64;
    (0..items)
        .map(|k| {
            let t = if spec.mirror && last == 1 {
                1.0
            } else if spec.mirror {
                k.min(last - k) as f64 / half
            } else {
                k as f64 / last as f64
            };
            spec.reflect
                .apply(spec.easing.apply(t, spec.exponent))
                .clamp(0.0, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_item_full_weight() {
        let sel = compute(4, &FalloffSpec::run(0, 1));
        assert_eq!(sel.indices, vec![0]);
        assert_eq!(sel.weights, vec![1.0]);
    }

    #[test]
    fn start_wraps_and_items_clamp() {
        let sel = compute(5, &FalloffSpec::run(-1, 99));
        assert_eq!(sel.indices, vec![4, 0, 1, 2, 3]);
        assert!(sel.weights.iter().all(|&w| (w - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn reverse_walks_down() {
        let spec = FalloffSpec {
            reverse: true,
            ..FalloffSpec::run(1, 3)
        };
        assert_eq!(compute(6, &spec).indices, vec![1, 0, 5]);
    }

    #[test]
    fn linear_ramp() {
        let spec = FalloffSpec::run(0, 5).with_easing(Easing::Linear, 1.0);
        let sel = compute(8, &spec);
        assert_eq!(sel.weights, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn mirrored_ramp_is_palindromic() {
        let spec = FalloffSpec::run(0, 5)
            .with_easing(Easing::Linear, 1.0)
            .mirrored();
        assert_eq!(compute(8, &spec).weights, vec![0.0, 0.5, 1.0, 0.5, 0.0]);

        let spec = FalloffSpec::run(0, 4)
            .with_easing(Easing::Linear, 1.0)
            .mirrored();
        assert_eq!(compute(8, &spec).weights, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn mirrored_pair_sits_at_peak() {
        let spec = FalloffSpec::run(0, 2)
            .with_easing(Easing::Linear, 1.0)
            .mirrored();
        assert_eq!(compute(8, &spec).weights, vec![1.0, 1.0]);
    }

    #[test]
    fn reflect_modes() {
        assert_relative_eq!(Reflect::All.apply(0.5), 1.0);
        assert_relative_eq!(Reflect::All.apply(1.0), 0.0);
        assert_relative_eq!(Reflect::Highs.apply(0.8), 0.2, epsilon = 1e-12);
        assert_relative_eq!(Reflect::Highs.apply(0.3), 0.3);
        assert_relative_eq!(Reflect::Lows.apply(0.3), 0.7, epsilon = 1e-12);
        assert_relative_eq!(Reflect::None.apply(0.3), 0.3);
    }

    #[test]
    fn repeats_with_gap_and_decay() {
        let spec = FalloffSpec {
            falloff_factor: 0.5,
            falloff_step: 1,
            ..FalloffSpec::run(0, 2).with_repeats(3, 1)
        };
        let sel = compute(12, &spec);
        assert_eq!(sel.indices, vec![0, 1, 3, 4, 6, 7]);
        assert_eq!(sel.weights, vec![1.0, 1.0, 0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn decay_every_second_repeat() {
        let spec = FalloffSpec {
            falloff_factor: 0.5,
            falloff_step: 2,
            ..FalloffSpec::run(0, 1).with_repeats(4, 0)
        };
        assert_eq!(compute(10, &spec).weights, vec![1.0, 1.0, 0.5, 0.5]);
    }

    #[test]
    fn wraparound_duplicates_are_dropped() {
        let spec = FalloffSpec::run(0, 3).with_repeats(5, 0);
        let sel = compute(7, &spec);
        assert_eq!(sel.len(), 7);
        let mut sorted = sel.indices.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn huge_gap_wraps_instead_of_overflowing() {
        let spec = FalloffSpec::run(0, 1).with_repeats(2, usize::MAX);
        let sel = compute(10, &spec);
        // usize::MAX % 10 == 5, so the second run starts 1 + 5 further on
        assert_eq!(sel.indices, vec![0, 6]);
    }

    #[test]
    fn repeats_stop_once_offsets_cycle() {
        // stride == total: every run lands on the first one
        let sel = compute(10, &FalloffSpec::run(0, 1).with_repeats(200_000_000, 9));
        assert_eq!(sel.indices, vec![0]);

        // stride coprime with total: the runs reach every index, then stop
        let sel = compute(10, &FalloffSpec::run(0, 1).with_repeats(usize::MAX, 2));
        assert_eq!(sel.len(), 10);
        assert_eq!(sel.indices[..4], [0, 3, 6, 9]);
    }

    #[test]
    fn empty_total_is_empty() {
        assert!(compute(0, &FalloffSpec::all()).is_empty());
    }

    #[test]
    fn setters_clamp() {
        let mut spec = FalloffSpec::run(9, 40);
        spec.clamp_to(4);
        assert_eq!(spec.start, 1);
        assert_eq!(spec.items, 4);
        spec.set_items(0, 4);
        assert_eq!(spec.items, 1);
    }

    #[test]
    fn dense_table() {
        let sel = compute(5, &FalloffSpec::run(3, 2));
        assert_eq!(sel.dense(5), vec![1.0, 0.0, 0.0, 1.0, 1.0]);
    }
}
