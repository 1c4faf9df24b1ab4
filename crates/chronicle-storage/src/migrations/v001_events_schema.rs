//! v001: the events table.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (millisecond
//! precision) so lexicographic order equals temporal order and range scans
//! can use the start index directly.

use rusqlite::Connection;

use chronicle_core::errors::StorageError;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            start_ts TEXT NOT NULL,
            end_ts TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            parent_id TEXT REFERENCES events(id),
            research_value INTEGER NOT NULL DEFAULT 0,
            metadata TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            CHECK (end_ts > start_ts),
            CHECK (research_value >= 0)
         );

         CREATE INDEX IF NOT EXISTS idx_events_parent ON events(parent_id);
         CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_ts);",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
