//! Raw SQL operations for the events table.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};
use uuid::Uuid;

use chronicle_core::errors::StorageError;
use chronicle_core::model::Event;
use chronicle_core::traits::event_store::{SearchQuery, SortField, SortOrder};

use crate::to_storage_err;

const EVENT_COLUMNS: &str = "id, name, description, start_ts, end_ts, duration_minutes,
             parent_id, research_value, metadata, created_at, modified_at";

/// Raw event row from the database, strings not yet decoded.
#[derive(Debug, Clone)]
struct RawEvent {
    id: String,
    name: String,
    description: String,
    start_ts: String,
    end_ts: String,
    duration_minutes: i64,
    parent_id: Option<String>,
    research_value: i64,
    metadata: String,
    created_at: String,
    modified_at: String,
}

/// Format a timestamp the way this schema stores it: fixed-width RFC 3339
/// UTC with millisecond precision, so string order equals temporal order.
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("corrupt timestamp '{raw}': {e}")))
}

fn parse_id(raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|e| to_storage_err(format!("corrupt event id '{raw}': {e}")))
}

fn decode(raw: RawEvent) -> Result<Event, StorageError> {
    let metadata = serde_json::from_str(&raw.metadata)
        .map_err(|e| to_storage_err(format!("corrupt metadata: {e}")))?;
    Ok(Event {
        id: parse_id(&raw.id)?,
        name: raw.name,
        description: raw.description,
        start: parse_ts(&raw.start_ts)?,
        end: parse_ts(&raw.end_ts)?,
        duration_minutes: raw.duration_minutes,
        parent_id: raw.parent_id.as_deref().map(parse_id).transpose()?,
        research_value: raw.research_value,
        metadata,
        created_at: parse_ts(&raw.created_at)?,
        modified_at: parse_ts(&raw.modified_at)?,
    })
}

fn map_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok(RawEvent {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_ts: row.get(3)?,
        end_ts: row.get(4)?,
        duration_minutes: row.get(5)?,
        parent_id: row.get(6)?,
        research_value: row.get(7)?,
        metadata: row.get(8)?,
        created_at: row.get(9)?,
        modified_at: row.get(10)?,
    })
}

fn collect_events(
    stmt: &mut rusqlite::Statement<'_>,
    sql_params: &[&dyn ToSql],
) -> Result<Vec<Event>, StorageError> {
    let rows = stmt
        .query_map(sql_params, map_raw)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(decode(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(result)
}

/// Does an event with this id exist?
pub fn exists(conn: &Connection, id: Uuid) -> Result<bool, StorageError> {
    conn.prepare_cached("SELECT 1 FROM events WHERE id = ?1")
        .and_then(|mut stmt| stmt.exists(params![id.to_string()]))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert or fully replace the record keyed by `event.id`.
///
/// Field-level `ON CONFLICT DO UPDATE` (not `INSERT OR REPLACE`) so the row
/// identity survives and child FK references stay valid across re-ingestion.
/// `created_at` is preserved on replace; `modified_at` is bumped.
pub fn upsert(conn: &Connection, event: &Event) -> Result<(), StorageError> {
    if let Some(parent_id) = event.parent_id {
        if !exists(conn, parent_id)? {
            return Err(StorageError::MissingParent { id: parent_id });
        }
    }

    let metadata = serde_json::to_string(&event.metadata)
        .map_err(|e| to_storage_err(format!("metadata encode: {e}")))?;

    conn.prepare_cached(
        "INSERT INTO events
             (id, name, description, start_ts, end_ts, duration_minutes,
              parent_id, research_value, metadata, created_at, modified_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             description = excluded.description,
             start_ts = excluded.start_ts,
             end_ts = excluded.end_ts,
             duration_minutes = excluded.duration_minutes,
             parent_id = excluded.parent_id,
             research_value = excluded.research_value,
             metadata = excluded.metadata,
             modified_at = excluded.modified_at",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            event.id.to_string(),
            event.name,
            event.description,
            format_ts(event.start),
            format_ts(event.end),
            event.duration_minutes,
            event.parent_id.map(|p| p.to_string()),
            event.research_value,
            metadata,
            format_ts(Utc::now()),
        ])
    })
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

pub fn get_by_id(conn: &Connection, id: Uuid) -> Result<Option<Event>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut rows = collect_events(&mut stmt, &[&id.to_string()])?;
    Ok(rows.pop())
}

/// Direct children of `parent_id`, ordered by start ascending.
pub fn get_children(conn: &Connection, parent_id: Uuid) -> Result<Vec<Event>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE parent_id = ?1 ORDER BY start_ts, rowid"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_events(&mut stmt, &[&parent_id.to_string()])
}

/// Every event in insertion (rowid) order.
pub fn scan_all(conn: &Connection) -> Result<Vec<Event>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY rowid"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_events(&mut stmt, &[])
}

/// Events fully contained in `[range_start, range_end]`, start ascending.
pub fn scan_range(
    conn: &Connection,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Result<Vec<Event>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE start_ts >= ?1 AND end_ts <= ?2
             ORDER BY start_ts, rowid"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    collect_events(&mut stmt, &[&format_ts(range_start), &format_ts(range_end)])
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Start => "start_ts",
        SortField::End => "end_ts",
        SortField::Name => "name",
        SortField::DurationMinutes => "duration_minutes",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// Filtered, sorted, offset-paginated search.
/// Returns `(total_matching, page_of_events)`.
pub fn search(
    conn: &Connection,
    query: &SearchQuery,
) -> Result<(i64, Vec<Event>), StorageError> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(name) = &query.name_contains {
        clauses.push("name LIKE ?");
        values.push(Box::new(format!("%{name}%")));
    }
    if let Some(start_after) = query.start_after {
        clauses.push("start_ts >= ?");
        values.push(Box::new(format_ts(start_after)));
    }
    if let Some(end_before) = query.end_before {
        clauses.push("end_ts <= ?");
        values.push(Box::new(format_ts(end_before)));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let filter_params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();

    let total: i64 = conn
        .prepare_cached(&format!("SELECT COUNT(*) FROM events{where_sql}"))
        .and_then(|mut stmt| stmt.query_row(&filter_params[..], |row| row.get(0)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let page = query.page.max(1);
    let offset = i64::from(page - 1) * i64::from(query.page_size);
    let limit = i64::from(query.page_size);

    // Sort column and direction come from closed enums, never user strings,
    // so interpolation is safe here. rowid keeps ties deterministic.
    let page_sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events{where_sql}
         ORDER BY {} {}, rowid LIMIT ? OFFSET ?",
        sort_column(query.sort_field),
        sort_direction(query.sort_order),
    );

    let mut page_params: Vec<&dyn ToSql> = filter_params;
    page_params.push(&limit);
    page_params.push(&offset);

    let mut stmt = conn
        .prepare_cached(&page_sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let events = collect_events(&mut stmt, &page_params)?;

    Ok((total, events))
}
