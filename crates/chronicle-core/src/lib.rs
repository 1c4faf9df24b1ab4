//! # chronicle-core
//!
//! Foundation crate for the Chronicle timeline engine.
//! Defines the event and job models, typed errors, config, telemetry init,
//! and the `EventStore` trait every other crate programs against.

pub mod config;
pub mod errors;
pub mod model;
pub mod telemetry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::ChronicleConfig;
pub use errors::error_code::ChronicleErrorCode;
pub use model::event::Event;
pub use model::job::{IngestionJob, JobStatus};
pub use traits::event_store::{
    EventStore, SearchPage, SearchQuery, SortField, SortOrder,
};
