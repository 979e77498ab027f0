//! Minimize-aware render-ratio computation
//!
//! When some panes in a layout are minimized they stop contributing space,
//! and every split above them needs an adjusted ratio for on-screen layout
//! while the user-edited model ratio stays untouched in the tree. This
//! module computes those adjusted ratios, plus the per-subtree minimized
//! bookkeeping the rendering layer needs to draw collapsed regions.
//!
//! The computation is a pure function of `(layout, minimized pane set)`:
//! it is recomputed on demand, never stored, and identical inputs always
//! produce identical output. Every input has a well-defined result,
//! including an empty layout or an empty minimized set.

use std::collections::{HashMap, HashSet};

use super::tree::{Layout, LayoutNode};
use super::types::{PaneId, SplitId};

/// Per-split rendering information derived from the minimized pane set.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    /// Ratio to use for on-screen layout (render space).
    pub adjusted_ratio: f64,
    /// True if every pane in the first child subtree is minimized.
    pub left_fully_minimized: bool,
    /// True if every pane in the second child subtree is minimized.
    pub right_fully_minimized: bool,
    /// Minimized panes in the first child subtree, in tree order.
    pub left_minimized_pane_ids: Vec<PaneId>,
    /// Minimized panes in the second child subtree, in tree order.
    pub right_minimized_pane_ids: Vec<PaneId>,
    /// Raw visibility weight of the first child subtree.
    ///
    /// Retained together with `right_visible_weight` so a render-space
    /// ratio can be mapped back to model space.
    pub left_visible_weight: f64,
    /// Raw visibility weight of the second child subtree.
    pub right_visible_weight: f64,
}

impl SplitInfo {
    /// Maps a render-space ratio back to the model-space ratio.
    ///
    /// This is the inverse of the adjusted-ratio computation: a divider
    /// dragged while panes are minimized lands on the ratio the user would
    /// have stored with nothing minimized. If either visibility weight is
    /// zero the mapping is degenerate and the input is returned unchanged.
    #[must_use]
    pub fn model_ratio(&self, render_ratio: f64) -> f64 {
        let lw = self.left_visible_weight;
        let rw = self.right_visible_weight;
        if lw == 0.0 || rw == 0.0 {
            return render_ratio;
        }
        (render_ratio * rw) / (render_ratio * rw + (1.0 - render_ratio) * lw)
    }
}

/// Rendering information for a whole layout under a minimized pane set.
///
/// Computed fresh via [`SplitRenderInfo::compute`]; consumers must not
/// cache it across layout or minimize mutations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitRenderInfo {
    /// Per-split info, keyed by split ID.
    pub split_info: HashMap<SplitId, SplitInfo>,
    /// True if every pane in the layout is minimized.
    pub all_minimized: bool,
    /// Every minimized pane in the layout, in tree order.
    pub all_minimized_pane_ids: Vec<PaneId>,
}

impl SplitRenderInfo {
    /// Computes rendering information for `layout` with the given minimized
    /// pane set.
    ///
    /// An empty layout yields an empty split map and `all_minimized ==
    /// false`. Minimized ids not present in the layout are ignored.
    #[must_use]
    pub fn compute(layout: &Layout, minimized: &HashSet<PaneId>) -> Self {
        let Some(root) = layout.root() else {
            return Self::default();
        };

        let mut split_info = HashMap::new();
        let (weight, all_minimized_pane_ids) = walk(root, minimized, &mut split_info);

        Self {
            split_info,
            all_minimized: weight == 0.0,
            all_minimized_pane_ids,
        }
    }

    /// Returns the info for one split, if the split exists in the layout.
    #[must_use]
    pub fn split(&self, split_id: SplitId) -> Option<&SplitInfo> {
        self.split_info.get(&split_id)
    }

    /// Returns the number of minimized panes in the layout.
    #[must_use]
    pub fn minimized_leaf_count(&self) -> usize {
        self.all_minimized_pane_ids.len()
    }

    /// Returns the minimized panes in tree order.
    #[must_use]
    pub fn ordered_minimized_pane_ids(&self) -> &[PaneId] {
        &self.all_minimized_pane_ids
    }
}

/// Recursive weight computation.
///
/// Returns `(visible_weight, minimized ids in tree order)` for the subtree
/// and records a `SplitInfo` for every split on the way back up.
///
/// A leaf weighs 0 when minimized and 1 otherwise; a split weighs
/// `ratio * weight(first) + (1 - ratio) * weight(second)`, so a subtree's
/// weight is exactly the share of its area still visible.
fn walk(
    node: &LayoutNode,
    minimized: &HashSet<PaneId>,
    split_info: &mut HashMap<SplitId, SplitInfo>,
) -> (f64, Vec<PaneId>) {
    match node {
        LayoutNode::Leaf(id) => {
            if minimized.contains(id) {
                (0.0, vec![*id])
            } else {
                (1.0, Vec::new())
            }
        }
        LayoutNode::Split(split) => {
            let (left_weight, left_min) = walk(&split.first, minimized, split_info);
            let (right_weight, right_min) = walk(&split.second, minimized, split_info);

            let left_share = split.ratio * left_weight;
            let right_share = (1.0 - split.ratio) * right_weight;
            let weight = left_share + right_share;

            // Both sides fully minimized: the adjusted ratio is meaningless
            // here and an ancestor collapses the whole subtree instead.
            let adjusted_ratio = if weight > 0.0 {
                left_share / weight
            } else {
                split.ratio
            };

            split_info.insert(
                split.id,
                SplitInfo {
                    adjusted_ratio,
                    left_fully_minimized: left_weight == 0.0,
                    right_fully_minimized: right_weight == 0.0,
                    left_minimized_pane_ids: left_min.clone(),
                    right_minimized_pane_ids: right_min.clone(),
                    left_visible_weight: left_weight,
                    right_visible_weight: right_weight,
                },
            );

            let mut minimized_ids = left_min;
            minimized_ids.extend(right_min);
            (weight, minimized_ids)
        }
    }
}
