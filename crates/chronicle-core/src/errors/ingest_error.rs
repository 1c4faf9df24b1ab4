//! Fatal ingestion errors.
//!
//! Distinct from `ParseError`: anything here aborts the job (or prevents it
//! from starting), whereas per-line validation failures never do.

use uuid::Uuid;

use super::error_code::{self, ChronicleErrorCode};
use super::storage_error::StorageError;

/// Errors that terminate or prevent an ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("source unreadable '{path}': {message}")]
    SourceUnreadable { path: String, message: String },

    #[error("unknown job '{id}'")]
    JobNotFound { id: Uuid },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ChronicleErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SourceUnreadable { .. } => error_code::SOURCE_UNREADABLE,
            Self::JobNotFound { .. } => error_code::JOB_NOT_FOUND,
            Self::Storage(e) => e.error_code(),
        }
    }
}
