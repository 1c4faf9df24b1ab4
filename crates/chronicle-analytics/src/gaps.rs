//! Maximal coverage-gap detection inside a query range.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use chronicle_core::errors::AnalyticsError;
use chronicle_core::model::Event;
use chronicle_core::traits::EventStore;

/// The largest stretch of uncovered time between two coverage blocks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Gap length in minutes, rounded to the nearest whole minute.
    pub gap_minutes: i64,
    /// The event whose end closes the block before the gap.
    pub preceding: Event,
    /// The event whose start opens the block after the gap.
    pub succeeding: Event,
}

/// A run of transitively connected intervals. `end_event` is the event
/// whose `end` currently defines the block's right edge.
struct CoverageBlock {
    end: DateTime<Utc>,
    end_event: Event,
}

/// Best candidate so far, at full resolution. Rounding to minutes happens
/// only in the emitted report, never in the comparison.
struct GapCandidate {
    length: chrono::Duration,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    preceding: Event,
    succeeding: Event,
}

/// Find the largest uncovered stretch between events fully contained in
/// `[range_start, range_end]`.
///
/// Contained events are merged into maximal coverage blocks: a block
/// absorbs the next event while `next.start <= block.end` (touching
/// intervals connect, they leave no gap). Candidate gaps lie between
/// consecutive blocks; the longest wins, and on a tie the earliest is
/// kept. Returns `None` when fewer than two blocks exist.
pub fn find_largest_gap(
    store: &dyn EventStore,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Result<Option<Gap>, AnalyticsError> {
    // Ordered by start ascending, so blocks form left to right.
    let events = store.scan_range(range_start, range_end)?;

    let mut best: Option<GapCandidate> = None;
    let mut block: Option<CoverageBlock> = None;

    for event in events {
        match block.as_mut() {
            Some(current) if event.start <= current.end => {
                if event.end > current.end {
                    current.end = event.end;
                    current.end_event = event;
                }
            }
            Some(current) => {
                let length = event.start - current.end;
                let longer = best.as_ref().map_or(true, |b| length > b.length);
                if longer {
                    best = Some(GapCandidate {
                        length,
                        start: current.end,
                        end: event.start,
                        preceding: current.end_event.clone(),
                        succeeding: event.clone(),
                    });
                }
                block = Some(CoverageBlock {
                    end: event.end,
                    end_event: event,
                });
            }
            None => {
                block = Some(CoverageBlock {
                    end: event.end,
                    end_event: event,
                });
            }
        }
    }

    let result = best.and_then(|b| {
        let gap_minutes = whole_minutes(b.length);
        // A longest gap under half a minute rounds to zero and is not
        // reported.
        if gap_minutes == 0 {
            return None;
        }
        Some(Gap {
            start: b.start,
            end: b.end,
            gap_minutes,
            preceding: b.preceding,
            succeeding: b.succeeding,
        })
    });

    debug!(
        range_start = %range_start,
        range_end = %range_end,
        found = result.is_some(),
        "gap scan finished"
    );
    Ok(result)
}

/// Round a positive duration to the nearest whole minute.
fn whole_minutes(d: chrono::Duration) -> i64 {
    (d.num_seconds() + 30) / 60
}
