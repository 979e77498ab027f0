//! Property-based tests for minimize-aware render ratios
//!
//! These tests verify the forward weight computation and the inverse
//! render-to-model mapping across generated layouts and minimized sets.

use std::collections::HashSet;

use proptest::prelude::*;
use rustdeck_core::{Layout, LayoutNode, PaneId, SplitId, SplitRenderInfo};

fn panes(count: usize) -> Vec<PaneId> {
    (0..count).map(|_| PaneId::new()).collect()
}

fn split_ids(layout: &Layout) -> Vec<SplitId> {
    fn collect(node: &LayoutNode, out: &mut Vec<SplitId>) {
        if let LayoutNode::Split(split) = node {
            out.push(split.id);
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

/// Layout with every split ratio disturbed away from the default.
fn resized_layout(ids: &[PaneId], ratios: &[f64]) -> Layout {
    let mut layout = Layout::auto_tiled(ids);
    for (index, split_id) in split_ids(&layout).into_iter().enumerate() {
        layout = layout.resizing(split_id, ratios[index % ratios.len()]);
    }
    layout
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With nothing minimized, every adjusted ratio equals its stored
    /// model ratio and nothing is reported minimized.
    #[test]
    fn prop_empty_minimized_set_is_identity(count in 1usize..12) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let info = SplitRenderInfo::compute(&layout, &HashSet::new());

        prop_assert!(!info.all_minimized);
        prop_assert_eq!(info.minimized_leaf_count(), 0);
        for split_id in split_ids(&layout) {
            let split = info.split(split_id).unwrap();
            let model = layout.split_ratio(split_id).unwrap();
            prop_assert!((split.adjusted_ratio - model).abs() < 1e-9);
            prop_assert!(!split.left_fully_minimized);
            prop_assert!(!split.right_fully_minimized);
        }
    }

    /// The inverse mapping recovers the stored model ratio whenever both
    /// subtree weights are non-zero.
    #[test]
    fn prop_render_model_ratio_round_trips(
        count in 2usize..10,
        ratios in prop::collection::vec(0.1f64..0.9, 1..6),
        minimize_mask in 0u32..1024,
    ) {
        let ids = panes(count);
        let layout = resized_layout(&ids, &ratios);

        let minimized: HashSet<PaneId> = ids
            .iter()
            .enumerate()
            .filter(|(index, _)| minimize_mask & (1 << index) != 0)
            .map(|(_, id)| *id)
            .collect();

        let info = SplitRenderInfo::compute(&layout, &minimized);
        for split_id in split_ids(&layout) {
            let split = info.split(split_id).unwrap();
            if split.left_visible_weight > 0.0 && split.right_visible_weight > 0.0 {
                let model = layout.split_ratio(split_id).unwrap();
                let recovered = split.model_ratio(split.adjusted_ratio);
                prop_assert!(
                    (recovered - model).abs() < 0.01,
                    "expected {} recovered {}",
                    model,
                    recovered
                );
            }
        }
    }

    /// Weights and adjusted ratios stay inside [0, 1].
    #[test]
    fn prop_weights_and_ratios_are_bounded(
        count in 1usize..10,
        minimize_mask in 0u32..1024,
    ) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let minimized: HashSet<PaneId> = ids
            .iter()
            .enumerate()
            .filter(|(index, _)| minimize_mask & (1 << index) != 0)
            .map(|(_, id)| *id)
            .collect();

        let info = SplitRenderInfo::compute(&layout, &minimized);
        for split in info.split_info.values() {
            prop_assert!((0.0..=1.0).contains(&split.adjusted_ratio));
            prop_assert!((0.0..=1.0).contains(&split.left_visible_weight));
            prop_assert!((0.0..=1.0).contains(&split.right_visible_weight));
        }
    }

    /// `all_minimized` holds exactly when every pane is in the minimized
    /// set, and the reported ids follow tree order.
    #[test]
    fn prop_all_minimized_tracks_membership(
        count in 1usize..10,
        minimize_mask in 0u32..1024,
    ) {
        let ids = panes(count);
        let layout = Layout::auto_tiled(&ids);
        let minimized: HashSet<PaneId> = ids
            .iter()
            .enumerate()
            .filter(|(index, _)| minimize_mask & (1 << index) != 0)
            .map(|(_, id)| *id)
            .collect();

        let info = SplitRenderInfo::compute(&layout, &minimized);

        prop_assert_eq!(info.all_minimized, minimized.len() == count);
        prop_assert_eq!(info.minimized_leaf_count(), minimized.len());

        let expected: Vec<PaneId> = ids
            .iter()
            .filter(|id| minimized.contains(id))
            .copied()
            .collect();
        prop_assert_eq!(info.ordered_minimized_pane_ids(), expected.as_slice());
    }

    /// A split with one side fully minimized pushes the whole area to the
    /// other side.
    #[test]
    fn prop_fully_minimized_side_collapses(ratio in 0.1f64..0.9) {
        let ids = panes(2);
        let layout = Layout::auto_tiled(&ids);
        let split_id = split_ids(&layout)[0];
        let layout = layout.resizing(split_id, ratio);

        let info = SplitRenderInfo::compute(&layout, &HashSet::from([ids[0]]));
        let split = info.split(split_id).unwrap();
        prop_assert!(split.left_fully_minimized);
        prop_assert!((split.adjusted_ratio - 0.0).abs() < 1e-9);

        let info = SplitRenderInfo::compute(&layout, &HashSet::from([ids[1]]));
        let split = info.split(split_id).unwrap();
        prop_assert!(split.right_fully_minimized);
        prop_assert!((split.adjusted_ratio - 1.0).abs() < 1e-9);
    }
}
