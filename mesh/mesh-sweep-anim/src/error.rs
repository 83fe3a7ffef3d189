//! Error types for keyframe sampling.

use mesh_sweep::SweepError;
use thiserror::Error;

/// Result type for animation operations.
pub type AnimResult<T> = Result<T, AnimError>;

/// Errors raised while sampling an animation plan.
#[derive(Debug, Error)]
pub enum AnimError {
    /// A keyframe's sweep failed to build.
    #[error("sweep failed: {0}")]
    Sweep(#[from] SweepError),

    /// The plan does not fit the configuration it animates.
    #[error("invalid animation plan: {reason}")]
    InvalidPlan {
        /// Description of the problem.
        reason: String,
    },

    /// A keyframe produced a different number of vertices than the first.
    #[error("keyframe {keyframe} has {actual} vertices, expected {expected}")]
    VertexCountChanged {
        /// Keyframe index.
        keyframe: usize,
        /// Vertex count of the first keyframe.
        expected: usize,
        /// Vertex count of this keyframe.
        actual: usize,
    },

    /// Plan JSON could not be read or written.
    #[error("plan serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnimError {
    /// Create an invalid plan error.
    #[must_use]
    pub fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            reason: reason.into(),
        }
    }

    /// Check if this is an invalid plan error.
    #[must_use]
    pub fn is_invalid_plan(&self) -> bool {
        matches!(self, Self::InvalidPlan { .. })
    }

    /// Check if this is a vertex count change.
    #[must_use]
    pub fn is_vertex_count_changed(&self) -> bool {
        matches!(self, Self::VertexCountChanged { .. })
    }
}
