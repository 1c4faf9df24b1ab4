//! Trait seams between the core and its collaborators.

pub mod event_store;

pub use event_store::EventStore;
