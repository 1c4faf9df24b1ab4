//! The event repository boundary.
//!
//! The core treats storage as an abstract keyed repository; whether the
//! implementation is an embedded index, a relational engine, or an
//! in-memory structure is a storage-crate choice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StorageError;
use crate::model::Event;

/// Sortable fields for `search`. Unknown inputs fall back to `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Start,
    End,
    Name,
    DurationMinutes,
}

impl SortField {
    /// Parse a user-supplied sort field, falling back to `Start` for
    /// anything outside the whitelist.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "end" => Self::End,
            "name" => Self::Name,
            "durationMinutes" | "duration_minutes" => Self::DurationMinutes,
            _ => Self::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filter, sort, and page parameters for `search`.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Case-sensitive substring match on `name`.
    pub name_contains: Option<String>,
    /// Keep events with `start >= start_after`.
    pub start_after: Option<DateTime<Utc>>,
    /// Keep events with `end <= end_before`.
    pub end_before: Option<DateTime<Utc>>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            name_contains: None,
            start_after: None,
            end_before: None,
            sort_field: SortField::Start,
            sort_order: SortOrder::Asc,
            page: 1,
            page_size: 50,
        }
    }
}

/// One page of search results plus the total match count.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub total_matching: i64,
    pub events: Vec<Event>,
}

/// Durable keyed storage of event records.
///
/// Implementations must support concurrent writers (last writer wins per
/// event id) and concurrent read-only queries.
pub trait EventStore: Send + Sync {
    /// Insert or fully replace the record keyed by `event.id`.
    ///
    /// Replacement preserves `created_at` and bumps `modified_at`. Fails
    /// with [`StorageError::MissingParent`] when `parent_id` does not
    /// reference an existing event.
    fn upsert(&self, event: &Event) -> Result<(), StorageError>;

    fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, StorageError>;

    /// Direct children of `parent_id`, ordered by `start` ascending.
    fn get_children(&self, parent_id: Uuid) -> Result<Vec<Event>, StorageError>;

    fn search(&self, query: &SearchQuery) -> Result<SearchPage, StorageError>;

    /// Every event, in insertion order (deterministic tie-break source for
    /// the overlap report).
    fn scan_all(&self) -> Result<Vec<Event>, StorageError>;

    /// Events fully contained in `[range_start, range_end]`, ordered by
    /// `start` ascending.
    fn scan_range(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, StorageError>;

    fn count(&self) -> Result<i64, StorageError>;
}
