//! Typed errors, one enum per subsystem.

pub mod analytics_error;
pub mod error_code;
pub mod ingest_error;
pub mod parse_error;
pub mod storage_error;

pub use analytics_error::AnalyticsError;
pub use ingest_error::IngestError;
pub use parse_error::ParseError;
pub use storage_error::StorageError;
