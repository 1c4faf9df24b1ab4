//! Line parser & validator.
//!
//! Pure function from a raw record line to a validated `Event` or a typed
//! `ParseError`. Never panics on malformed input. Validation short-circuits
//! on the first failing rule, in the fixed order: field count, event id,
//! name, start date, end date, interval direction, parent id, research
//! value.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use chronicle_core::errors::ParseError;
use chronicle_core::model::Event;

/// `id|name|start|end|parent_or_NULL|research_value|description`
const EXPECTED_FIELDS: usize = 7;

/// Parse one record line (1-based `line_number` for provenance metadata).
///
/// Blank lines are the pipeline's concern and never reach this function.
pub fn parse_line(line: &str, line_number: u64) -> Result<Event, ParseError> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != EXPECTED_FIELDS {
        return Err(ParseError::InsufficientFields {
            expected: EXPECTED_FIELDS,
            actual: fields.len(),
        });
    }

    let raw_id = fields[0].trim();
    let id = parse_canonical_uuid(raw_id).ok_or_else(|| ParseError::InvalidEventId {
        value: raw_id.to_string(),
    })?;

    let name = fields[1].trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let raw_start = fields[2].trim();
    let start = parse_timestamp(raw_start).ok_or_else(|| ParseError::InvalidTimestamp {
        field: "start",
        value: raw_start.to_string(),
    })?;

    let raw_end = fields[3].trim();
    let end = parse_timestamp(raw_end).ok_or_else(|| ParseError::InvalidTimestamp {
        field: "end",
        value: raw_end.to_string(),
    })?;

    if end <= start {
        return Err(ParseError::EndNotAfterStart);
    }

    let parent_id = parse_parent(fields[4].trim())?;

    let raw_research = fields[5].trim();
    let research_value = raw_research
        .parse::<i64>()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| ParseError::InvalidResearchValue {
            value: raw_research.to_string(),
        })?;

    let mut event = Event::new(
        id,
        name.to_string(),
        fields[6].trim().to_string(),
        start,
        end,
        parent_id,
        research_value,
    );
    event
        .metadata
        .insert("line_number".to_string(), serde_json::json!(line_number));
    Ok(event)
}

/// Case-insensitive literal `NULL` (or empty) means no parent; anything
/// else must be a canonical UUID.
fn parse_parent(raw: &str) -> Result<Option<Uuid>, ParseError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    parse_canonical_uuid(raw)
        .map(Some)
        .ok_or_else(|| ParseError::InvalidParentId {
            value: raw.to_string(),
        })
}

/// Canonical 8-4-4-4-12 hexadecimal shape, case-insensitive.
///
/// Stricter than `Uuid::parse_str`, which also accepts braced, simple, and
/// URN forms that this record format does not allow.
fn parse_canonical_uuid(raw: &str) -> Option<Uuid> {
    let bytes = raw.as_bytes();
    if bytes.len() != 36 {
        return None;
    }
    let shaped = bytes.iter().enumerate().all(|(i, &c)| match i {
        8 | 13 | 18 | 23 => c == b'-',
        _ => c.is_ascii_hexdigit(),
    });
    if !shaped {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

/// `YYYY-MM-DDTHH:mm:ss[.fff]` with optional trailing `Z`/offset, calendar
/// valid. Zone-less values are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_uuid_rejects_other_uuid_forms() {
        // Simple (no hyphens) and braced forms parse as Uuid but are not
        // canonical record ids.
        assert!(parse_canonical_uuid("936da01f9abd4d9d80c702af85c822a8").is_none());
        assert!(parse_canonical_uuid("{936da01f-9abd-4d9d-80c7-02af85c822a8}").is_none());
        assert!(parse_canonical_uuid("936da01f-9abd-4d9d-80c7-02af85c822a8").is_some());
        assert!(parse_canonical_uuid("936DA01F-9ABD-4D9D-80C7-02AF85C822A8").is_some());
    }

    #[test]
    fn timestamp_accepts_zoneless_millis_and_zulu() {
        assert!(parse_timestamp("2024-03-01T10:00:00").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00.250").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00+02:00").is_some());
        // Calendar-invalid.
        assert!(parse_timestamp("2024-02-30T10:00:00").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
    }
}
