//! # chronicle-analytics
//!
//! Temporal analytics over the event repository: hierarchy reconstruction,
//! pairwise interval overlap, maximal coverage-gap detection, and descent
//! path finding. Every query runs against the `EventStore` trait; this
//! crate never touches storage internals.

pub mod gaps;
pub mod hierarchy;
pub mod overlap;
pub mod paths;

pub use gaps::{find_largest_gap, Gap};
pub use hierarchy::{build_tree, TimelineNode};
pub use overlap::{find_overlaps, OverlapPair};
pub use paths::{shortest_path, PathResult};
