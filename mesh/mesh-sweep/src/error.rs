//! Error types for sweep recomputes.

use sweep_curves::CurveError;
use thiserror::Error;

/// Result type for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Errors raised while building or recomputing a sweep.
///
/// A [`crate::Sweep`] that fails a recompute is invalidated; build a new one
/// instead of retrying.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SweepError {
    /// Degenerate shape parameters or too few points.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Description of the problem.
        reason: String,
    },

    /// A custom or blend source does not match the expected point count.
    #[error("{what} has {actual} points, expected {expected}")]
    CountMismatch {
        /// Which source mismatched.
        what: String,
        /// Expected point count.
        expected: usize,
        /// Actual point count.
        actual: usize,
    },

    /// Path or profile is not ready to be built.
    #[error("configuration incomplete: {reason}")]
    ConfigurationIncomplete {
        /// What is missing.
        reason: String,
    },

    /// The instance failed an earlier recompute and must be rebuilt.
    #[error("sweep was invalidated by a failed recompute")]
    Invalidated,

    /// Configuration JSON could not be read or written.
    #[error("configuration serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be read or written.
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Create an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create a count mismatch error for the named source.
    #[must_use]
    pub fn count_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::CountMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Attach the source name to a curve error.
    #[must_use]
    pub fn from_curve(what: &str, err: CurveError) -> Self {
        match err {
            CurveError::InvalidGeometry { reason } => Self::InvalidGeometry {
                reason: format!("{what}: {reason}"),
            },
            CurveError::CountMismatch { expected, actual } => {
                Self::count_mismatch(what, expected, actual)
            }
            CurveError::ConfigurationIncomplete { reason } => Self::ConfigurationIncomplete {
                reason: format!("{what}: {reason}"),
            },
        }
    }

    /// Check if this is an invalid geometry error.
    #[must_use]
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry { .. })
    }

    /// Check if this is a count mismatch error.
    #[must_use]
    pub fn is_count_mismatch(&self) -> bool {
        matches!(self, Self::CountMismatch { .. })
    }

    /// Check if this is a configuration incomplete error.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::ConfigurationIncomplete { .. })
    }
}

impl From<CurveError> for SweepError {
    fn from(err: CurveError) -> Self {
        Self::from_curve("shape", err)
    }
}
