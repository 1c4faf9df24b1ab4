//! Hierarchy reconstruction: materialize the subtree rooted at an event.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use chronicle_core::errors::AnalyticsError;
use chronicle_core::model::Event;
use chronicle_core::traits::EventStore;

/// One node of a reconstructed timeline tree. Children are ordered by
/// `start` ascending, matching `EventStore::get_children`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    pub event: Event,
    pub children: Vec<TimelineNode>,
}

/// Build the full subtree rooted at `root_id`.
///
/// Fails with `EventNotFound` for an unknown root and `CycleDetected` when
/// a parent link loops back onto the current descent path. The visited set
/// tracks only the path from the root to the node under construction, so
/// a legitimate diamond-free forest of any size traverses cleanly.
pub fn build_tree(
    store: &dyn EventStore,
    root_id: Uuid,
) -> Result<TimelineNode, AnalyticsError> {
    let root = store
        .get_by_id(root_id)?
        .ok_or(AnalyticsError::EventNotFound { id: root_id })?;

    let mut on_path = FxHashSet::default();
    let node = descend(store, root, &mut on_path)?;
    debug!(root = %root_id, "hierarchy materialized");
    Ok(node)
}

fn descend(
    store: &dyn EventStore,
    event: Event,
    on_path: &mut FxHashSet<Uuid>,
) -> Result<TimelineNode, AnalyticsError> {
    let id = event.id;
    if !on_path.insert(id) {
        return Err(AnalyticsError::CycleDetected { id });
    }

    let mut children = Vec::new();
    for child in store.get_children(id)? {
        children.push(descend(store, child, on_path)?);
    }

    on_path.remove(&id);
    Ok(TimelineNode { event, children })
}
