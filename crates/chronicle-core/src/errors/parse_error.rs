//! Per-line validation errors from the record parser.
//!
//! These are recoverable by design: the ingestion pipeline records them in
//! the job's error list and continues with the next line.

use super::error_code::{self, ChronicleErrorCode};

/// A single record line failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("insufficient fields: expected {expected}, got {actual}")]
    InsufficientFields { expected: usize, actual: usize },

    #[error("invalid event id '{value}'")]
    InvalidEventId { value: String },

    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid {field} date '{value}'")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("end must be after start")]
    EndNotAfterStart,

    #[error("invalid parent id '{value}'")]
    InvalidParentId { value: String },

    #[error("invalid research value '{value}'")]
    InvalidResearchValue { value: String },
}

impl ChronicleErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
