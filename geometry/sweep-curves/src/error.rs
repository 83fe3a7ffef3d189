//! Error types for shape sampling.

use thiserror::Error;

/// Errors that can occur while sampling a path or profile shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    /// Shape parameters cannot produce a usable point sequence.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Description of what's wrong with the parameters.
        reason: String,
    },

    /// A sampled source produced a different number of points than expected.
    #[error("point count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// Expected point count.
        expected: usize,
        /// Actual point count.
        actual: usize,
    },

    /// The shape is missing data it needs before it can be sampled.
    #[error("configuration incomplete: {reason}")]
    ConfigurationIncomplete {
        /// What is missing.
        reason: String,
    },
}

impl CurveError {
    /// Create an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create a count mismatch error.
    #[must_use]
    pub fn count_mismatch(expected: usize, actual: usize) -> Self {
        Self::CountMismatch { expected, actual }
    }

    /// Create a configuration incomplete error.
    #[must_use]
    pub fn incomplete(reason: impl Into<String>) -> Self {
        Self::ConfigurationIncomplete {
            reason: reason.into(),
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
