//! Stable error codes for boundary translation.
//!
//! Codes are part of the external contract: hosts map them to user-facing
//! responses, so they must never change meaning between releases.

pub const PARSE_ERROR: &str = "CHRONICLE_PARSE_ERROR";
pub const STORAGE_ERROR: &str = "CHRONICLE_STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "CHRONICLE_MIGRATION_FAILED";
pub const MISSING_PARENT: &str = "CHRONICLE_MISSING_PARENT";
pub const NOT_FOUND: &str = "CHRONICLE_NOT_FOUND";
pub const CYCLE_DETECTED: &str = "CHRONICLE_CYCLE_DETECTED";
pub const SOURCE_UNREADABLE: &str = "CHRONICLE_SOURCE_UNREADABLE";
pub const JOB_NOT_FOUND: &str = "CHRONICLE_JOB_NOT_FOUND";

/// Every Chronicle error maps to a stable code.
pub trait ChronicleErrorCode {
    fn error_code(&self) -> &'static str;
}
