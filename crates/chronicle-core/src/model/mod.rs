//! Data models shared across the workspace.

pub mod event;
pub mod job;

pub use event::Event;
pub use job::{IngestionJob, JobStatus};
