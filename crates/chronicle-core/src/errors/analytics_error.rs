//! Analytics query errors.

use uuid::Uuid;

use super::error_code::{self, ChronicleErrorCode};
use super::storage_error::StorageError;

/// Errors surfaced by hierarchy, overlap, gap, and path queries.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("event '{id}' not found")]
    EventNotFound { id: Uuid },

    /// A parent/child cycle was detected during traversal. Indicates
    /// corrupted parent links; surfaced distinctly from not-found.
    #[error("cycle detected at event '{id}'")]
    CycleDetected { id: Uuid },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ChronicleErrorCode for AnalyticsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EventNotFound { .. } => error_code::NOT_FOUND,
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            Self::Storage(e) => e.error_code(),
        }
    }
}
