//! Storage-layer errors for SQLite operations.

use uuid::Uuid;

use super::error_code::{self, ChronicleErrorCode};

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("unknown parent event '{id}'")]
    MissingParent { id: Uuid },

    #[error("connection lock poisoned: {message}")]
    LockPoisoned { message: String },
}

impl ChronicleErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::MissingParent { .. } => error_code::MISSING_PARENT,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
