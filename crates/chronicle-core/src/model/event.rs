//! The event record: a historical occurrence with a time interval and an
//! optional parent link. Events form a forest via `parent_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A validated historical event.
///
/// `duration_minutes` is derived from the interval and recomputed whenever
/// the interval changes; it is never trusted from input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Primary key, immutable.
    pub id: Uuid,
    /// Non-empty display string.
    pub name: String,
    /// Free text, may be empty.
    pub description: String,
    /// Interval start. Invariant: `end > start` (strict).
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// floor((end - start) in minutes). >= 0 follows from the interval invariant.
    pub duration_minutes: i64,
    /// `None` means root. If set, must reference an existing event at write time.
    pub parent_id: Option<Uuid>,
    /// Opaque non-negative importance score, uninterpreted by the core.
    pub research_value: i64,
    /// Open key/value map, carried but never interpreted (e.g. originating
    /// line number).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Event {
    /// Build an event, deriving `duration_minutes` and stamping both
    /// timestamps with now. The caller is responsible for `end > start`.
    pub fn new(
        id: Uuid,
        name: String,
        description: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        parent_id: Option<Uuid>,
        research_value: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            start,
            end,
            duration_minutes: duration_minutes(start, end),
            parent_id,
            research_value,
            metadata: Map::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Replace the interval and recompute the derived duration.
    pub fn set_interval(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.start = start;
        self.end = end;
        self.duration_minutes = duration_minutes(start, end);
    }
}

/// floor((end - start) in minutes).
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}
