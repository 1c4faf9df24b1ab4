//! # chronicle-ingest
//!
//! Streaming ingestion for flat, `|`-delimited historical records.
//! A pure line parser/validator, a concurrent job tracker, and a pipeline
//! that runs one background worker thread per job, tolerating per-line
//! errors without aborting the stream.

pub mod parser;
pub mod pipeline;
pub mod tracker;

pub use pipeline::IngestPipeline;
pub use tracker::JobTracker;
