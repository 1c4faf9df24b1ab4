//! Streaming ingestion pipeline.
//!
//! `start()` counts the source lines, creates the job record, spawns a named
//! worker thread, and returns the job id immediately — the caller never
//! blocks on file processing. One bad record never aborts a job; only a
//! fatal stream error does.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chronicle_core::errors::{IngestError, StorageError};
use chronicle_core::model::IngestionJob;
use chronicle_core::traits::EventStore;

use crate::parser;
use crate::tracker::JobTracker;

/// Launches and supervises ingestion jobs.
pub struct IngestPipeline {
    store: Arc<dyn EventStore>,
    tracker: Arc<JobTracker>,
    workers: DashMap<Uuid, JoinHandle<()>>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn EventStore>, tracker: Arc<JobTracker>) -> Self {
        Self {
            store,
            tracker,
            workers: DashMap::new(),
        }
    }

    /// Start ingesting `path` in the background. Returns the job id as soon
    /// as the job record exists and the total line count is known.
    ///
    /// A source that cannot be opened for the counting pass fails fast here,
    /// before any job record is created.
    pub fn start(&self, path: &Path) -> Result<Uuid, IngestError> {
        // Reap handles of workers that already ran to completion, so a
        // host that only polls status never accumulates dead handles.
        self.workers.retain(|_, handle| !handle.is_finished());

        let source = path.display().to_string();
        let total_lines = count_lines(path, &source)?;

        let job = self.tracker.create(&source, total_lines);
        let job_id = job.id;
        info!(job = %job_id, source = %source, total_lines, "ingestion job created");

        let store = Arc::clone(&self.store);
        let tracker = Arc::clone(&self.tracker);
        let worker_path = path.to_path_buf();
        let handle = match thread::Builder::new()
            .name(format!("chronicle-ingest-{job_id}"))
            .spawn(move || run_job(&*store, &tracker, job_id, &worker_path))
        {
            Ok(handle) => handle,
            Err(e) => {
                // Leave the job record in a terminal state rather than
                // `Pending` forever.
                let message = format!("failed to spawn ingest worker: {e}");
                let _ = self.tracker.fail(job_id, message.clone());
                return Err(IngestError::SourceUnreadable {
                    path: source,
                    message,
                });
            }
        };
        self.workers.insert(job_id, handle);

        Ok(job_id)
    }

    /// Number of worker handles currently held (finished ones are reaped
    /// on the next `start`).
    pub fn running_workers(&self) -> usize {
        self.workers.len()
    }

    /// Status snapshot for a job (running or finished).
    pub fn status(&self, job_id: Uuid) -> Result<IngestionJob, IngestError> {
        self.tracker
            .get(job_id)
            .ok_or(IngestError::JobNotFound { id: job_id })
    }

    /// Block until the job's worker finishes and return the final record.
    /// Used by tests and orderly shutdown; status polling never needs it.
    pub fn wait(&self, job_id: Uuid) -> Result<IngestionJob, IngestError> {
        if let Some((_, handle)) = self.workers.remove(&job_id) {
            let _ = handle.join();
        }
        self.status(job_id)
    }
}

/// First pass: count every line (blank ones included) so progress reporting
/// is honest from the start.
fn count_lines(path: &Path, source: &str) -> Result<u64, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::SourceUnreadable {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    let mut count = 0u64;
    for line in BufReader::new(file).lines() {
        line.map_err(|e| IngestError::SourceUnreadable {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        count += 1;
    }
    Ok(count)
}

/// Worker body: stream the source in order, tolerate per-line failures,
/// terminate the job on stream end or fatal error.
fn run_job(store: &dyn EventStore, tracker: &JobTracker, job_id: Uuid, path: &Path) {
    if tracker.mark_processing(job_id).is_err() {
        return;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            let _ = tracker.fail(job_id, format!("source unreadable: {e}"));
            return;
        }
    };

    for (index, read) in BufReader::new(file).lines().enumerate() {
        let line_number = index as u64 + 1;
        let line = match read {
            Ok(line) => line,
            Err(e) => {
                // Not a per-line validation failure: the stream itself broke.
                let _ = tracker.fail(
                    job_id,
                    format!("fatal read error at line {line_number}: {e}"),
                );
                return;
            }
        };

        if line.trim().is_empty() {
            debug!(job = %job_id, line_number, "skipping blank line");
            continue;
        }

        match parser::parse_line(&line, line_number) {
            Ok(event) => match store.upsert(&event) {
                Ok(()) => {
                    let _ = tracker.increment_processed(job_id);
                }
                Err(e @ StorageError::MissingParent { .. }) => {
                    // A data problem local to this record; tolerated like
                    // any validation failure.
                    warn!(job = %job_id, line_number, error = %e, "line rejected");
                    let _ = tracker.append_error(job_id, format!("Line {line_number}: {e}"));
                }
                Err(e) => {
                    let _ = tracker.fail(job_id, format!("storage failure: {e}"));
                    return;
                }
            },
            Err(e) => {
                warn!(job = %job_id, line_number, error = %e, "line rejected");
                let _ = tracker.append_error(job_id, format!("Line {line_number}: {e}"));
            }
        }
    }

    let _ = tracker.complete(job_id);
    info!(job = %job_id, "ingestion job completed");
}
