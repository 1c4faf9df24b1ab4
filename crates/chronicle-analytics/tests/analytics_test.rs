//! Analytics queries against a real store: hierarchy, overlap, gaps,
//! descent paths, and cycle defense on corrupted parent links.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use chronicle_analytics::{build_tree, find_largest_gap, find_overlaps, shortest_path};
use chronicle_core::errors::AnalyticsError;
use chronicle_core::model::Event;
use chronicle_core::traits::EventStore;
use chronicle_storage::SqliteEventStore;

fn store() -> Arc<dyn EventStore> {
    SqliteEventStore::open_in_memory()
        .expect("in-memory store")
        .into_shared()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1453, 5, 29, hour, minute, 0).unwrap()
}

fn event(
    name: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    parent_id: Option<Uuid>,
) -> Event {
    Event::new(
        Uuid::new_v4(),
        name.to_string(),
        String::new(),
        start,
        end,
        parent_id,
        0,
    )
}

#[test]
fn tree_mirrors_parent_links_with_children_in_start_order() {
    let store = store();
    let root = event("campaign", at(0, 0), at(23, 0), None);
    let late = event("assault", at(12, 0), at(14, 0), Some(root.id));
    let early = event("bombardment", at(4, 0), at(10, 0), Some(root.id));
    let nested = event("breach", at(13, 0), at(13, 30), Some(late.id));
    for e in [&root, &late, &early, &nested] {
        store.upsert(e).unwrap();
    }

    let tree = build_tree(store.as_ref(), root.id).unwrap();
    assert_eq!(tree.event.id, root.id);
    assert_eq!(tree.children.len(), 2);
    // start ascending, not insertion order
    assert_eq!(tree.children[0].event.name, "bombardment");
    assert_eq!(tree.children[1].event.name, "assault");
    assert_eq!(tree.children[1].children[0].event.id, nested.id);
    assert!(tree.children[0].children.is_empty());
}

#[test]
fn unknown_root_is_not_found() {
    let store = store();
    assert!(matches!(
        build_tree(store.as_ref(), Uuid::new_v4()).unwrap_err(),
        AnalyticsError::EventNotFound { .. }
    ));
}

#[test]
fn leaf_event_builds_a_single_node_tree() {
    let store = store();
    let solo = event("lone siege", at(8, 0), at(18, 0), None);
    store.upsert(&solo).unwrap();

    let tree = build_tree(store.as_ref(), solo.id).unwrap();
    assert_eq!(tree.event.id, solo.id);
    assert!(tree.children.is_empty());
}

#[test]
fn overlap_report_floors_minutes_and_sorts_descending() {
    let store = store();
    let x = event("x", at(10, 0), at(11, 0), None);
    let y = event("y", at(10, 30), at(11, 30), None);
    let z = event("z", at(10, 15), at(11, 10), None); // 45 with x, 40 with y
    for e in [&x, &y, &z] {
        store.upsert(e).unwrap();
    }

    let pairs = find_overlaps(store.as_ref()).unwrap();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[0].overlap_minutes, 45);
    assert_eq!((pairs[0].first.id, pairs[0].second.id), (x.id, z.id));
    assert_eq!(pairs[1].overlap_minutes, 40);
    assert_eq!(pairs[2].overlap_minutes, 30);
    assert_eq!((pairs[2].first.id, pairs[2].second.id), (x.id, y.id));
}

#[test]
fn touching_and_disjoint_intervals_do_not_overlap() {
    let store = store();
    // b starts exactly when a ends; c is far away.
    store.upsert(&event("a", at(9, 0), at(10, 0), None)).unwrap();
    store.upsert(&event("b", at(10, 0), at(11, 0), None)).unwrap();
    store.upsert(&event("c", at(20, 0), at(21, 0), None)).unwrap();

    assert!(find_overlaps(store.as_ref()).unwrap().is_empty());
}

#[test]
fn sub_minute_overlap_is_dropped() {
    let store = store();
    let half_past = Utc.with_ymd_and_hms(1453, 5, 29, 9, 59, 30).unwrap();
    store.upsert(&event("a", at(9, 0), at(10, 0), None)).unwrap();
    store.upsert(&event("b", half_past, at(11, 0), None)).unwrap();

    // 30 seconds of intersection floors to zero minutes.
    assert!(find_overlaps(store.as_ref()).unwrap().is_empty());
}

#[test]
fn largest_gap_between_coverage_blocks() {
    let store = store();
    let morning = event("morning watch", at(9, 0), at(10, 0), None);
    let noon = event("noon muster", at(12, 0), at(13, 0), None);
    store.upsert(&morning).unwrap();
    store.upsert(&noon).unwrap();

    let gap = find_largest_gap(store.as_ref(), at(9, 0), at(13, 0))
        .unwrap()
        .expect("one gap");
    assert_eq!(gap.gap_minutes, 120);
    assert_eq!(gap.start, at(10, 0));
    assert_eq!(gap.end, at(12, 0));
    assert_eq!(gap.preceding.id, morning.id);
    assert_eq!(gap.succeeding.id, noon.id);
}

#[test]
fn touching_intervals_merge_into_one_block() {
    let store = store();
    store.upsert(&event("a", at(9, 0), at(10, 0), None)).unwrap();
    store.upsert(&event("b", at(10, 0), at(11, 0), None)).unwrap();

    assert!(find_largest_gap(store.as_ref(), at(9, 0), at(11, 0))
        .unwrap()
        .is_none());
}

#[test]
fn gap_considers_only_events_fully_inside_the_range() {
    let store = store();
    // Straddles the range start, so it is excluded; without it the two
    // contained events leave a 60-minute gap.
    store.upsert(&event("straddler", at(8, 0), at(10, 30), None)).unwrap();
    store.upsert(&event("a", at(9, 30), at(10, 0), None)).unwrap();
    store.upsert(&event("b", at(11, 0), at(12, 0), None)).unwrap();

    let gap = find_largest_gap(store.as_ref(), at(9, 0), at(12, 0))
        .unwrap()
        .expect("one gap");
    assert_eq!(gap.gap_minutes, 60);
    assert_eq!(gap.start, at(10, 0));
}

#[test]
fn first_of_equal_gaps_wins() {
    let store = store();
    store.upsert(&event("a", at(8, 0), at(9, 0), None)).unwrap();
    store.upsert(&event("b", at(10, 0), at(11, 0), None)).unwrap();
    store.upsert(&event("c", at(12, 0), at(13, 0), None)).unwrap();

    let gap = find_largest_gap(store.as_ref(), at(8, 0), at(13, 0))
        .unwrap()
        .expect("one gap");
    assert_eq!(gap.gap_minutes, 60);
    assert_eq!(gap.start, at(9, 0));
    assert_eq!(gap.end, at(10, 0));
}

#[test]
fn raw_longer_gap_wins_even_when_minutes_round_equal() {
    let store = store();
    let sec = |h, m, s| Utc.with_ymd_and_hms(1453, 5, 29, h, m, s).unwrap();
    // First gap is exactly 120s; second is 145s. Both round to 2 minutes,
    // but the second is genuinely longer.
    store.upsert(&event("a", sec(9, 0, 0), sec(9, 10, 0), None)).unwrap();
    store.upsert(&event("b", sec(9, 12, 0), sec(9, 20, 0), None)).unwrap();
    store.upsert(&event("c", sec(9, 22, 25), sec(9, 30, 0), None)).unwrap();

    let gap = find_largest_gap(store.as_ref(), sec(9, 0, 0), sec(9, 30, 0))
        .unwrap()
        .expect("one gap");
    assert_eq!(gap.gap_minutes, 2);
    assert_eq!(gap.start, sec(9, 20, 0));
    assert_eq!(gap.end, sec(9, 22, 25));
}

#[test]
fn sub_half_minute_gaps_are_not_reported() {
    let store = store();
    let sec = |h, m, s| Utc.with_ymd_and_hms(1453, 5, 29, h, m, s).unwrap();
    store.upsert(&event("a", sec(9, 0, 0), sec(9, 10, 0), None)).unwrap();
    store.upsert(&event("b", sec(9, 10, 20), sec(9, 20, 0), None)).unwrap();

    assert!(find_largest_gap(store.as_ref(), sec(9, 0, 0), sec(9, 20, 0))
        .unwrap()
        .is_none());
}

#[test]
fn fewer_than_two_blocks_yields_no_gap() {
    let store = store();
    assert!(find_largest_gap(store.as_ref(), at(0, 0), at(23, 0))
        .unwrap()
        .is_none());

    store.upsert(&event("only", at(9, 0), at(10, 0), None)).unwrap();
    assert!(find_largest_gap(store.as_ref(), at(0, 0), at(23, 0))
        .unwrap()
        .is_none());
}

#[test]
fn descent_path_sums_inclusive_durations() {
    let store = store();
    let a = event("era", at(0, 0), at(1, 0), None); // 60
    let b = event("war", at(2, 0), at(10, 0), Some(a.id)); // 480
    let c = event("campaign", at(2, 0), at(18, 0), Some(b.id)); // 960
    let d = event("battle", at(3, 0), at(6, 0), Some(c.id)); // 180
    let decoy = event("decoy", at(1, 0), at(2, 0), Some(a.id));
    for e in [&a, &b, &c, &d, &decoy] {
        store.upsert(e).unwrap();
    }

    let result = shortest_path(store.as_ref(), a.id, d.id)
        .unwrap()
        .expect("path exists");
    let ids: Vec<Uuid> = result.path.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id, d.id]);
    assert_eq!(result.total_duration_minutes, 1680);
}

#[test]
fn path_to_self_is_the_single_event() {
    let store = store();
    let solo = event("solo", at(9, 0), at(10, 0), None);
    store.upsert(&solo).unwrap();

    let result = shortest_path(store.as_ref(), solo.id, solo.id)
        .unwrap()
        .expect("self path");
    assert_eq!(result.path.len(), 1);
    assert_eq!(result.total_duration_minutes, 60);
}

#[test]
fn unknown_source_or_unreachable_target_is_none() {
    let store = store();
    let a = event("a", at(9, 0), at(10, 0), None);
    let sibling = event("sibling", at(9, 0), at(10, 0), None);
    store.upsert(&a).unwrap();
    store.upsert(&sibling).unwrap();

    assert!(shortest_path(store.as_ref(), Uuid::new_v4(), a.id)
        .unwrap()
        .is_none());
    // Siblings share no descent path.
    assert!(shortest_path(store.as_ref(), a.id, sibling.id)
        .unwrap()
        .is_none());
}

/// Re-parenting the root onto its own descendant is accepted by storage
/// (the parent row exists) but makes the hierarchy circular. Both
/// traversals must surface that instead of recursing forever.
#[test]
fn corrupted_parent_cycle_is_detected() {
    let store = store();
    let mut a = event("a", at(0, 0), at(23, 0), None);
    let b = event("b", at(1, 0), at(2, 0), Some(a.id));
    store.upsert(&a).unwrap();
    store.upsert(&b).unwrap();

    a.parent_id = Some(b.id);
    store.upsert(&a).unwrap();

    assert!(matches!(
        build_tree(store.as_ref(), a.id).unwrap_err(),
        AnalyticsError::CycleDetected { .. }
    ));
    assert!(matches!(
        shortest_path(store.as_ref(), a.id, Uuid::new_v4()).unwrap_err(),
        AnalyticsError::CycleDetected { .. }
    ));
}
