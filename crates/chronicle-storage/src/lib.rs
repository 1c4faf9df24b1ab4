//! # chronicle-storage
//!
//! SQLite persistence layer for the Chronicle timeline engine.
//! WAL mode, write-serialized + read-pooled, forward-only migrations,
//! offset pagination for event search.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::SqliteEventStore;
pub use pool::ConnectionPool;

use chronicle_core::errors::StorageError;

/// Helper to wrap a SQLite failure message into a `StorageError`.
pub fn to_storage_err(msg: String) -> StorageError {
    StorageError::SqliteError { message: msg }
}
