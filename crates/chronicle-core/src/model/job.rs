//! Ingestion job record and its status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job lifecycle status.
///
/// ```text
/// Pending --(pipeline begins reading)--> Processing
/// Processing --(stream exhausted)------> Completed
/// Processing --(fatal error)-----------> Failed
/// ```
///
/// `Completed` and `Failed` are terminal and final. Per-line validation
/// failures never transition a job to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A tracked unit of ingestion work over one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionJob {
    pub id: Uuid,
    pub status: JobStatus,
    /// Origin of the ingested data; opaque to the core.
    pub source_path: String,
    pub total_lines: u64,
    pub processed_lines: u64,
    pub error_lines: u64,
    /// Append-only, one entry per rejected line, each prefixed with its
    /// 1-based line number.
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    /// Unset until the job reaches a terminal status.
    pub ended_at: Option<DateTime<Utc>>,
}

impl IngestionJob {
    /// Create a fresh job in `Pending` with a known total line count.
    pub fn new(source_path: String, total_lines: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            source_path,
            total_lines,
            processed_lines: 0,
            error_lines: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_screaming() {
        let s = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(s, "\"PROCESSING\"");
    }
}
