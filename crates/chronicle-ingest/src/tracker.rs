//! Ingestion job tracker.
//!
//! Owns the job table: a sharded concurrent map keyed by job id. Every
//! mutation happens under the entry's shard lock, so a counter bump and its
//! matching error append are observed together — status pollers read either
//! the pre- or post-update snapshot, never a torn one.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use chronicle_core::errors::IngestError;
use chronicle_core::model::{IngestionJob, JobStatus};

/// Concurrent job table with a single-writer-per-job discipline: only the
/// owning pipeline worker (and its launcher's failure handler) mutate a job.
#[derive(Default)]
pub struct JobTracker {
    jobs: DashMap<Uuid, IngestionJob>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a job in `Pending` and return a snapshot of it.
    pub fn create(&self, source_path: &str, total_lines: u64) -> IngestionJob {
        let job = IngestionJob::new(source_path.to_string(), total_lines);
        self.jobs.insert(job.id, job.clone());
        job
    }

    /// Cloned snapshot for status queries.
    pub fn get(&self, id: Uuid) -> Option<IngestionJob> {
        self.jobs.get(&id).map(|entry| entry.clone())
    }

    /// `Pending` -> `Processing`.
    pub fn mark_processing(&self, id: Uuid) -> Result<(), IngestError> {
        self.mutate(id, |job| {
            if job.status == JobStatus::Pending {
                job.status = JobStatus::Processing;
            }
        })
    }

    /// Record one successfully loaded line.
    pub fn increment_processed(&self, id: Uuid) -> Result<(), IngestError> {
        self.mutate(id, |job| job.processed_lines += 1)
    }

    /// Record one rejected line: the error counter and the message list
    /// move together, atomically with respect to readers.
    pub fn append_error(&self, id: Uuid, message: String) -> Result<(), IngestError> {
        self.mutate(id, |job| {
            job.error_lines += 1;
            job.errors.push(message);
        })
    }

    /// `Processing` -> `Completed`, stamping the end time.
    pub fn complete(&self, id: Uuid) -> Result<(), IngestError> {
        self.mutate(id, |job| {
            job.status = JobStatus::Completed;
            job.ended_at = Some(Utc::now());
        })
    }

    /// Any non-terminal state -> `Failed`, recording the fatal message as
    /// the last error entry and stamping the end time.
    pub fn fail(&self, id: Uuid, fatal_message: String) -> Result<(), IngestError> {
        self.mutate(id, |job| {
            job.errors.push(fatal_message);
            job.status = JobStatus::Failed;
            job.ended_at = Some(Utc::now());
        })
    }

    /// Apply a mutation under the entry lock. Terminal jobs are immutable;
    /// late mutations are silently dropped rather than corrupting a final
    /// record.
    fn mutate<F>(&self, id: Uuid, f: F) -> Result<(), IngestError>
    where
        F: FnOnce(&mut IngestionJob),
    {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or(IngestError::JobNotFound { id })?;
        if entry.status.is_terminal() {
            return Ok(());
        }
        f(entry.value_mut());
        Ok(())
    }
}
