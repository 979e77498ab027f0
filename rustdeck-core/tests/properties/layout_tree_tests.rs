//! Property-based tests for the layout split tree
//!
//! These tests verify that structural edits preserve pane membership and
//! ordering invariants for layouts of any shape.

use proptest::prelude::*;
use rustdeck_core::{InsertPosition, Layout, LayoutNode, NavDirection, PaneId, SplitDirection};

/// Fresh distinct pane ids.
fn panes(count: usize) -> Vec<PaneId> {
    (0..count).map(|_| PaneId::new()).collect()
}

/// Strategy for insert positions.
fn position_strategy() -> impl Strategy<Value = InsertPosition> {
    prop_oneof![Just(InsertPosition::Before), Just(InsertPosition::After)]
}

/// Strategy for split directions.
fn direction_strategy() -> impl Strategy<Value = SplitDirection> {
    prop_oneof![
        Just(SplitDirection::Horizontal),
        Just(SplitDirection::Vertical)
    ]
}

/// Collects every split ratio in the tree, keyed by split id, in
/// traversal order.
fn split_ratios(layout: &Layout) -> Vec<(rustdeck_core::SplitId, f64)> {
    fn collect(node: &LayoutNode, out: &mut Vec<(rustdeck_core::SplitId, f64)>) {
        if let LayoutNode::Split(split) = node {
            out.push((split.id, split.ratio));
            collect(&split.first, out);
            collect(&split.second, out);
        }
    }
    let mut out = Vec::new();
    if let Some(root) = layout.root() {
        collect(root, &mut out);
    }
    out
}

/// Checks that every split's children flip direction relative to their
/// parent.
fn directions_alternate(node: &LayoutNode) -> bool {
    match node {
        LayoutNode::Leaf(_) => true,
        LayoutNode::Split(split) => {
            for child in [&split.first, &split.second] {
                if let LayoutNode::Split(inner) = child.as_ref() {
                    if inner.direction != split.direction.flipped() {
                        return false;
                    }
                }
                if !directions_alternate(child) {
                    return false;
                }
            }
            true
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Removing a pane and re-inserting it next to any survivor restores
    /// the original pane-id set (shape may differ; membership may not).
    #[test]
    fn prop_remove_then_reinsert_preserves_membership(
        count in 2usize..10,
        remove_index in 0usize..10,
        target_index in 0usize..10,
        direction in direction_strategy(),
        position in position_strategy(),
    ) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let removed = ids[remove_index % count];

        let without = layout.removing(removed);
        prop_assert!(!without.contains(removed));
        prop_assert_eq!(without.pane_count(), count - 1);

        let survivors = without.pane_ids();
        let target = survivors[target_index % survivors.len()];
        let restored = without.inserting(removed, target, direction, position);

        let mut expected = ids.clone();
        let mut actual = restored.pane_ids();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    /// `equalized` is idempotent.
    #[test]
    fn prop_equalized_is_idempotent(count in 1usize..10, ratio in 0.0f64..1.5) {
        let ids = panes(count);
        let mut layout = Layout::auto_tiled(&ids);
        // Disturb one ratio so equalize has something to do.
        if let Some((split_id, _)) = split_ratios(&layout).first().copied() {
            layout = layout.resizing(split_id, ratio);
        }

        let once = layout.equalized();
        let twice = once.equalized();
        prop_assert_eq!(&twice, &once);

        for (_, r) in split_ratios(&once) {
            prop_assert!((r - 0.5).abs() < f64::EPSILON);
        }
    }

    /// `resizing` is idempotent for the same input and never touches
    /// other splits.
    #[test]
    fn prop_resizing_is_idempotent_and_isolated(
        count in 3usize..10,
        split_index in 0usize..10,
        ratio in -1.0f64..2.0,
    ) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let ratios = split_ratios(&layout);
        let (split_id, _) = ratios[split_index % ratios.len()];

        let once = layout.resizing(split_id, ratio);
        let twice = once.resizing(split_id, ratio);
        prop_assert_eq!(&twice, &once);

        // The target ratio is clamped; every other split is untouched.
        let clamped = ratio.clamp(0.1, 0.9);
        for (id, r) in split_ratios(&once) {
            if id == split_id {
                prop_assert!((r - clamped).abs() < f64::EPSILON);
            } else {
                let original = ratios.iter().find(|(o, _)| *o == id).map(|(_, r)| *r);
                prop_assert_eq!(original, Some(r));
            }
        }
    }

    /// `auto_tiled` preserves input order in the canonical traversal for
    /// any pane count.
    #[test]
    fn prop_auto_tiled_preserves_order(count in 0usize..20) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        prop_assert_eq!(layout.pane_ids(), ids);
    }

    /// `auto_tiled` alternates split direction strictly by depth, with a
    /// horizontal root.
    #[test]
    fn prop_auto_tiled_alternates_directions(count in 4usize..20) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);

        let root = layout.root().unwrap();
        match root {
            LayoutNode::Split(split) => {
                prop_assert_eq!(split.direction, SplitDirection::Horizontal);
            }
            LayoutNode::Leaf(_) => prop_assert!(false, "four panes must split"),
        }
        prop_assert!(directions_alternate(root));
    }

    /// Pane ids are unique in every generated layout.
    #[test]
    fn prop_pane_ids_are_unique(count in 1usize..15) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let mut seen = ids.clone();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), layout.pane_ids().len());
    }

    /// `previous_pane` undoes `next_pane` at every position.
    #[test]
    fn prop_next_previous_are_inverse(count in 1usize..12, index in 0usize..12) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let start = ids[index % count];

        let next = layout.next_pane(start).unwrap();
        prop_assert_eq!(layout.previous_pane(next), Some(start));
    }

    /// A neighbor, when one exists, is a different member pane.
    #[test]
    fn prop_neighbor_is_a_distinct_member(
        count in 2usize..12,
        index in 0usize..12,
    ) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let from = ids[index % count];

        for direction in [
            NavDirection::Left,
            NavDirection::Right,
            NavDirection::Up,
            NavDirection::Down,
        ] {
            if let Some(found) = layout.neighbor(from, direction) {
                prop_assert!(layout.contains(found));
                prop_assert_ne!(found, from);
            }
        }
    }

    /// Structural edits never mutate the receiver.
    #[test]
    fn prop_edits_are_pure(count in 2usize..10, ratio in 0.0f64..1.0) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let snapshot = layout.clone();

        let _ = layout.removing(ids[0]);
        let _ = layout.inserting(
            PaneId::new(),
            ids[0],
            SplitDirection::Vertical,
            InsertPosition::Before,
        );
        let _ = layout.equalized();
        if let Some((split_id, _)) = split_ratios(&layout).first().copied() {
            let _ = layout.resizing(split_id, ratio);
        }

        prop_assert_eq!(layout, snapshot);
    }
}
