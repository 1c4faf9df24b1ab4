//! Descent path finding through the parent/child hierarchy.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use chronicle_core::errors::AnalyticsError;
use chronicle_core::model::Event;
use chronicle_core::traits::EventStore;

/// A source-to-target descent, inclusive of both endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub path: Vec<Event>,
    /// Sum of `duration_minutes` over every event on the path.
    pub total_duration_minutes: i64,
}

/// Find the descent path from `source_id` down to `target_id`.
///
/// Parent links form a forest, so at most one descent path exists; the
/// first arrival is the answer. Unknown source or unreachable target is
/// `Ok(None)`, corrupted parent links that loop are `CycleDetected`.
pub fn shortest_path(
    store: &dyn EventStore,
    source_id: Uuid,
    target_id: Uuid,
) -> Result<Option<PathResult>, AnalyticsError> {
    let source = match store.get_by_id(source_id)? {
        Some(event) => event,
        None => return Ok(None),
    };

    let mut on_path = FxHashSet::default();
    let mut path = Vec::new();
    let found = descend(store, source, target_id, &mut on_path, &mut path)?;
    if !found {
        debug!(source = %source_id, target = %target_id, "target unreachable");
        return Ok(None);
    }

    let total_duration_minutes = path.iter().map(|e| e.duration_minutes).sum();
    Ok(Some(PathResult {
        path,
        total_duration_minutes,
    }))
}

/// Depth-first descent. On success `path` holds the source-to-target
/// events in order; on a dead end the frame pops itself back off.
fn descend(
    store: &dyn EventStore,
    event: Event,
    target_id: Uuid,
    on_path: &mut FxHashSet<Uuid>,
    path: &mut Vec<Event>,
) -> Result<bool, AnalyticsError> {
    let id = event.id;
    if !on_path.insert(id) {
        return Err(AnalyticsError::CycleDetected { id });
    }
    path.push(event);

    if id == target_id {
        return Ok(true);
    }

    for child in store.get_children(id)? {
        if descend(store, child, target_id, on_path, path)? {
            return Ok(true);
        }
    }

    path.pop();
    on_path.remove(&id);
    Ok(false)
}
