//! Easing curves.
//!
//! Shared by point spacing (lines, helix height), falloff weights and
//! animation schedules. Every curve maps `[0, 1]` onto `[0, 1]`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest exponent accepted by the power curves.
pub const MIN_EXPONENT: f64 = 0.01;

/// Shape of an easing curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Easing {
    /// No easing: every sample evaluates to full weight.
    Off,
    /// Identity ramp.
    #[default]
    Linear,
    /// Slow start, `t^e`.
    In,
    /// Slow end, `1 - (1 - t)^e`.
    Out,
    /// Slow start and end.
    InOut,
}

impl Easing {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    ///
    /// `exponent` only affects the power curves; values below
    /// [`MIN_EXPONENT`] or non-finite values are sanitized instead of
    /// rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use sweep_curves::Easing;
    ///
    /// assert_eq!(Easing::Linear.apply(0.25, 2.0), 0.25);
    /// assert_eq!(Easing::In.apply(0.5, 2.0), 0.25);
    /// assert_eq!(Easing::Off.apply(0.0, 2.0), 1.0);
    /// ```
    #[must_use]
    pub fn apply(self, t: f64, exponent: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let e = sanitize_exponent(exponent);
        match self {
            Self::Off => 1.0,
            Self::Linear => t,
            Self::In => t.powf(e),
            Self::Out => 1.0 - (1.0 - t).powf(e),
            Self::InOut => {
                if t < 0.5 {
                    0.5 * (2.0 * t).powf(e)
                } else {
                    1.0 - 0.5 * (2.0 - 2.0 * t).powf(e)
                }
            }
        }
    }

    /// Whether this is [`Easing::Off`].
    #[must_use]
    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }

    /// Like [`Easing::apply`], but treats [`Easing::Off`] as linear.
    ///
    /// Used where a curve has to progress from 0 to 1, such as point spacing.
    #[must_use]
    pub fn progress(self, t: f64, exponent: f64) -> f64 {
        if self.is_off() {
            Self::Linear.apply(t, exponent)
        } else {
            self.apply(t, exponent)
        }
    }
}

fn sanitize_exponent(exponent: f64) -> f64 {
    if exponent.is_finite() {
        exponent.max(MIN_EXPONENT)
    } else {
        1.0
    }
}
