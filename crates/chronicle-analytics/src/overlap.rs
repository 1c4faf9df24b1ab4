//! Pairwise interval overlap report.

use serde::Serialize;
use tracing::debug;

use chronicle_core::errors::AnalyticsError;
use chronicle_core::model::Event;
use chronicle_core::traits::EventStore;

/// Two events whose intervals share more than zero whole minutes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapPair {
    pub first: Event,
    pub second: Event,
    /// floor(min(end) - max(start)) in minutes, always > 0.
    pub overlap_minutes: i64,
}

/// All unordered pairs of overlapping events, largest overlap first.
///
/// Overlap is strict interval intersection (`a.start < b.end && b.start <
/// a.end`); pairs whose intersection floors to zero minutes are dropped.
/// Ties keep insertion order: pairs are generated in scan order and the
/// sort is stable.
pub fn find_overlaps(store: &dyn EventStore) -> Result<Vec<OverlapPair>, AnalyticsError> {
    let events = store.scan_all()?;

    let mut pairs = Vec::new();
    for (i, a) in events.iter().enumerate() {
        for b in &events[i + 1..] {
            if a.start < b.end && b.start < a.end {
                let latest_start = a.start.max(b.start);
                let earliest_end = a.end.min(b.end);
                let overlap_minutes = (earliest_end - latest_start).num_minutes();
                if overlap_minutes > 0 {
                    pairs.push(OverlapPair {
                        first: a.clone(),
                        second: b.clone(),
                        overlap_minutes,
                    });
                }
            }
        }
    }

    pairs.sort_by(|x, y| y.overlap_minutes.cmp(&x.overlap_minutes));
    debug!(events = events.len(), overlaps = pairs.len(), "overlap report built");
    Ok(pairs)
}
