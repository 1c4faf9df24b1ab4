//! `SqliteEventStore` — the storage engine implementing the core
//! `EventStore` trait.
//!
//! Wraps `ConnectionPool` (read/write routing). All reads go through
//! `with_reader()`, all writes through `with_writer()`; no code outside this
//! crate touches a raw `Connection` for events operations.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use chronicle_core::config::StorageConfig;
use chronicle_core::errors::StorageError;
use chronicle_core::model::Event;
use chronicle_core::traits::event_store::{EventStore, SearchPage, SearchQuery};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// SQLite-backed event repository.
pub struct SqliteEventStore {
    pool: ConnectionPool,
}

impl SqliteEventStore {
    /// Open a file-backed store at the given path.
    /// Runs migrations and applies pragmas.
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        pool.with_writer(migrations::run_migrations)?;
        Ok(Self { pool })
    }

    /// Open per `StorageConfig`: file-backed when `db_path` is set,
    /// in-memory otherwise.
    pub fn open_with_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match &config.db_path {
            Some(path) => Self::open(Path::new(path), config.effective_read_pool_size()),
            None => Self::open_in_memory(),
        }
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(migrations::run_migrations)?;
        Ok(Self { pool })
    }

    /// Expose as `Arc<dyn EventStore>` for consumers programming against
    /// the trait.
    pub fn into_shared(self) -> Arc<dyn EventStore> {
        Arc::new(self)
    }
}

impl EventStore for SqliteEventStore {
    fn upsert(&self, event: &Event) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::events::upsert(conn, event))
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError> {
        self.pool.with_reader(|conn| queries::events::get_by_id(conn, id))
    }

    fn get_children(&self, parent_id: Uuid) -> Result<Vec<Event>, StorageError> {
        self.pool
            .with_reader(|conn| queries::events::get_children(conn, parent_id))
    }

    fn search(&self, query: &SearchQuery) -> Result<SearchPage, StorageError> {
        self.pool.with_reader(|conn| {
            let (total_matching, events) = queries::events::search(conn, query)?;
            Ok(SearchPage {
                total_matching,
                events,
            })
        })
    }

    fn scan_all(&self) -> Result<Vec<Event>, StorageError> {
        self.pool.with_reader(queries::events::scan_all)
    }

    fn scan_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, StorageError> {
        self.pool
            .with_reader(|conn| queries::events::scan_range(conn, range_start, range_end))
    }

    fn count(&self) -> Result<i64, StorageError> {
        self.pool.with_reader(queries::events::count)
    }
}
