//! Binary split-tree layout model
//!
//! This module provides the `Layout` value type used to describe how a set
//! of panes subdivides a tab's area. A layout is either empty, a single
//! leaf, or a split node with two children:
//!
//! ```text
//! Split(Horizontal)
//! ├── Leaf(A)
//! └── Split(Vertical)
//!     ├── Leaf(B)
//!     └── Leaf(C)
//! ```
//!
//! Every structural operation is pure and total: it returns a new `Layout`
//! and leaves the receiver untouched. Unmatched targets (unknown pane or
//! split ids, edits against an empty layout) return the layout unchanged
//! rather than signalling an error, so stale-id requests from the UI layer
//! can never corrupt or crash the engine.

use serde::{Deserialize, Serialize};

use super::types::{InsertPosition, NavDirection, PaneId, SplitDirection, SplitId};

/// Default split ratio (50% of available space to the first child).
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Minimum stored split ratio.
pub const MIN_SPLIT_RATIO: f64 = 0.1;

/// Maximum stored split ratio.
pub const MAX_SPLIT_RATIO: f64 = 0.9;

/// A node in the layout tree.
///
/// Closed sum type: every operation over the tree is an exhaustive match on
/// leaf vs. split, with no open extension point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutNode {
    /// A leaf holding exactly one pane.
    Leaf(PaneId),
    /// A split dividing space between two children.
    Split(SplitNode),
}

/// A split node dividing space between two children along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitNode {
    /// Stable identifier for this split, used to address resize operations.
    pub id: SplitId,
    /// Split direction.
    pub direction: SplitDirection,
    /// Proportion of space allocated to the first child, clamped to
    /// [`MIN_SPLIT_RATIO`, `MAX_SPLIT_RATIO`].
    pub ratio: f64,
    /// First child (left for horizontal, top for vertical).
    pub first: Box<LayoutNode>,
    /// Second child (right for horizontal, bottom for vertical).
    pub second: Box<LayoutNode>,
}

impl SplitNode {
    /// Creates a new split node with a fresh ID and the default ratio.
    #[must_use]
    pub fn new(direction: SplitDirection, first: LayoutNode, second: LayoutNode) -> Self {
        Self {
            id: SplitId::new(),
            direction,
            ratio: DEFAULT_SPLIT_RATIO,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Creates a new split node with a custom ratio.
    ///
    /// The ratio is clamped to [`MIN_SPLIT_RATIO`, `MAX_SPLIT_RATIO`].
    #[must_use]
    pub fn with_ratio(
        direction: SplitDirection,
        first: LayoutNode,
        second: LayoutNode,
        ratio: f64,
    ) -> Self {
        Self {
            ratio: ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO),
            ..Self::new(direction, first, second)
        }
    }
}

impl LayoutNode {
    /// Returns true if this is a leaf node.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true if this is a split node.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// Returns the split node if this is a split.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => Some(split),
        }
    }

    /// Returns true if the subtree contains the given pane.
    #[must_use]
    pub fn contains(&self, pane_id: PaneId) -> bool {
        match self {
            Self::Leaf(id) => *id == pane_id,
            Self::Split(split) => split.first.contains(pane_id) || split.second.contains(pane_id),
        }
    }

    /// Returns the first (leftmost/topmost) pane in the subtree.
    #[must_use]
    pub fn first_pane(&self) -> PaneId {
        match self {
            Self::Leaf(id) => *id,
            Self::Split(split) => split.first.first_pane(),
        }
    }

    /// Returns the last (rightmost/bottommost) pane in the subtree.
    #[must_use]
    pub fn last_pane(&self) -> PaneId {
        match self {
            Self::Leaf(id) => *id,
            Self::Split(split) => split.second.last_pane(),
        }
    }

    /// Collects pane IDs in pre-order (depth-first, first child before second).
    fn collect_pane_ids(&self, ids: &mut Vec<PaneId>) {
        match self {
            Self::Leaf(id) => ids.push(*id),
            Self::Split(split) => {
                split.first.collect_pane_ids(ids);
                split.second.collect_pane_ids(ids);
            }
        }
    }

    /// Returns the depth of the subtree. A leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(split) => 1 + split.first.depth().max(split.second.depth()),
        }
    }
}

/// The binary split-tree layout for one arrangement.
///
/// A layout is a value type: structural edits return a new `Layout` and
/// never alias nodes with the receiver, so two layout values can never
/// observe each other's edits.
///
/// # Layout States
///
/// - **Empty**: `root` is `None`, no panes at all
/// - **Leaf**: a single pane fills the area
/// - **Split tree**: two or more panes divided by nested splits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Root of the tree (`None` = empty layout).
    root: Option<LayoutNode>,
}

impl Layout {
    /// Creates an empty layout.
    #[must_use]
    pub const fn empty() -> Self {
        Self { root: None }
    }

    /// Creates a layout holding a single pane.
    #[must_use]
    pub const fn leaf(pane_id: PaneId) -> Self {
        Self {
            root: Some(LayoutNode::Leaf(pane_id)),
        }
    }

    /// Creates a layout from an existing root node.
    #[must_use]
    pub const fn from_root(root: LayoutNode) -> Self {
        Self { root: Some(root) }
    }

    /// Returns the root node, if any. Exposed read-only so the rendering
    /// layer can walk the tree.
    #[must_use]
    pub const fn root(&self) -> Option<&LayoutNode> {
        self.root.as_ref()
    }

    /// Returns true if the layout has no panes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns true if the layout contains at least one split.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.root.as_ref().is_some_and(LayoutNode::is_split)
    }

    /// Returns all pane IDs in canonical order (pre-order leaf traversal,
    /// first child before second).
    ///
    /// This ordering is the single source of truth for pane navigation and
    /// serialization.
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        if let Some(root) = &self.root {
            root.collect_pane_ids(&mut ids);
        }
        ids
    }

    /// Returns the number of panes in the layout.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.pane_ids().len()
    }

    /// Returns true if the layout contains the given pane.
    #[must_use]
    pub fn contains(&self, pane_id: PaneId) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(pane_id))
    }

    /// Returns the first pane in canonical order, or `None` if empty.
    #[must_use]
    pub fn first_pane(&self) -> Option<PaneId> {
        self.root.as_ref().map(LayoutNode::first_pane)
    }

    /// Returns the depth of the tree. An empty layout or single leaf has
    /// depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, LayoutNode::depth)
    }

    /// Returns the stored ratio of a split, or `None` if the split is not
    /// in this layout.
    #[must_use]
    pub fn split_ratio(&self, split_id: SplitId) -> Option<f64> {
        fn find(node: &LayoutNode, split_id: SplitId) -> Option<f64> {
            match node {
                LayoutNode::Leaf(_) => None,
                LayoutNode::Split(split) => {
                    if split.id == split_id {
                        Some(split.ratio)
                    } else {
                        find(&split.first, split_id).or_else(|| find(&split.second, split_id))
                    }
                }
            }
        }
        self.root.as_ref().and_then(|root| find(root, split_id))
    }

    // ========================================================================
    // Structural Edits
    // ========================================================================

    /// Returns a layout with `pane_id` inserted next to `target`.
    ///
    /// The leaf holding `target` is replaced by a split of the given
    /// direction at ratio 0.5; the new pane lands before or after the
    /// target according to `position`.
    ///
    /// No-ops (returns the layout unchanged): `target` absent, the layout
    /// empty, or `pane_id` already present (a pane may appear at most once).
    #[must_use]
    pub fn inserting(
        &self,
        pane_id: PaneId,
        target: PaneId,
        direction: SplitDirection,
        position: InsertPosition,
    ) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        if self.contains(pane_id) || !root.contains(target) {
            return self.clone();
        }
        Self {
            root: Some(insert_node(root, pane_id, target, direction, position)),
        }
    }

    /// Returns a layout with `pane_id` removed.
    ///
    /// If the layout is a single leaf holding the pane, the result is the
    /// empty layout. If the pane's leaf is one child of a split, the sibling
    /// subtree is promoted in its place, its internal ratios untouched.
    /// An absent pane or an empty layout is a no-op.
    #[must_use]
    pub fn removing(&self, pane_id: PaneId) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        if !root.contains(pane_id) {
            return self.clone();
        }
        Self {
            root: remove_node(root, pane_id),
        }
    }

    /// Returns a layout with the given split's ratio set to
    /// `clamp(ratio, 0.1, 0.9)`. Every other node is untouched.
    /// An unknown split ID is a no-op.
    #[must_use]
    pub fn resizing(&self, split_id: SplitId, ratio: f64) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        Self {
            root: Some(resize_node(root, split_id, ratio)),
        }
    }

    /// Returns a layout with every split's ratio reset to 0.5.
    #[must_use]
    pub fn equalized(&self) -> Self {
        Self {
            root: self.root.as_ref().map(equalize_node),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Returns the pane adjacent to `of` in the given direction, or `None`
    /// if there is no matching-axis ancestor with a pane on that side.
    ///
    /// The walk tracks the nearest ancestor split whose axis matches the
    /// query (horizontal for left/right, vertical for up/down) and where
    /// `of` sits on the near side of the divider; the result is the edge
    /// leaf of the facing subtree.
    #[must_use]
    pub fn neighbor(&self, of: PaneId, direction: NavDirection) -> Option<PaneId> {
        let mut node = self.root.as_ref()?;
        let mut facing: Option<&LayoutNode> = None;
        loop {
            match node {
                LayoutNode::Leaf(id) => {
                    if *id != of {
                        return None;
                    }
                    break;
                }
                LayoutNode::Split(split) => {
                    let in_first = split.first.contains(of);
                    if !in_first && !split.second.contains(of) {
                        return None;
                    }
                    if split.direction == direction.axis() {
                        if direction.is_backward() {
                            if !in_first {
                                facing = Some(&split.first);
                            }
                        } else if in_first {
                            facing = Some(&split.second);
                        }
                    }
                    node = if in_first { &split.first } else { &split.second };
                }
            }
        }
        facing.map(|subtree| {
            if direction.is_backward() {
                subtree.last_pane()
            } else {
                subtree.first_pane()
            }
        })
    }

    /// Returns the pane after `of` in canonical order, wrapping around.
    ///
    /// A single-pane layout returns the same pane; an absent pane returns
    /// `None`.
    #[must_use]
    pub fn next_pane(&self, of: PaneId) -> Option<PaneId> {
        let ids = self.pane_ids();
        let index = ids.iter().position(|id| *id == of)?;
        Some(ids[(index + 1) % ids.len()])
    }

    /// Returns the pane before `of` in canonical order, wrapping around.
    #[must_use]
    pub fn previous_pane(&self, of: PaneId) -> Option<PaneId> {
        let ids = self.pane_ids();
        let index = ids.iter().position(|id| *id == of)?;
        Some(ids[(index + ids.len() - 1) % ids.len()])
    }

    // ========================================================================
    // Tiling
    // ========================================================================

    /// Builds a balanced layout over the given panes, preserving their
    /// order in the canonical traversal.
    ///
    /// The list is split ⌈N/2⌉ / remainder at each level, alternating split
    /// direction by depth starting with horizontal at the root. Zero panes
    /// yield the empty layout; one pane yields a leaf.
    #[must_use]
    pub fn auto_tiled(pane_ids: &[PaneId]) -> Self {
        Self {
            root: tile_nodes(pane_ids, SplitDirection::Horizontal),
        }
    }
}

// ============================================================================
// Recursive edit helpers
//
// Each helper rebuilds the spine from the root down to the edited node and
// clones untouched subtrees, so the result never shares a mutable path with
// the input tree.
// ============================================================================

fn insert_node(
    node: &LayoutNode,
    pane_id: PaneId,
    target: PaneId,
    direction: SplitDirection,
    position: InsertPosition,
) -> LayoutNode {
    match node {
        LayoutNode::Leaf(id) => {
            if *id != target {
                return node.clone();
            }
            let (first, second) = match position {
                InsertPosition::Before => (LayoutNode::Leaf(pane_id), node.clone()),
                InsertPosition::After => (node.clone(), LayoutNode::Leaf(pane_id)),
            };
            LayoutNode::Split(SplitNode::new(direction, first, second))
        }
        LayoutNode::Split(split) => {
            if split.first.contains(target) {
                LayoutNode::Split(SplitNode {
                    id: split.id,
                    direction: split.direction,
                    ratio: split.ratio,
                    first: Box::new(insert_node(&split.first, pane_id, target, direction, position)),
                    second: split.second.clone(),
                })
            } else if split.second.contains(target) {
                LayoutNode::Split(SplitNode {
                    id: split.id,
                    direction: split.direction,
                    ratio: split.ratio,
                    first: split.first.clone(),
                    second: Box::new(insert_node(
                        &split.second,
                        pane_id,
                        target,
                        direction,
                        position,
                    )),
                })
            } else {
                node.clone()
            }
        }
    }
}

/// Returns the subtree with the pane removed, or `None` if the subtree was
/// exactly the removed leaf.
fn remove_node(node: &LayoutNode, pane_id: PaneId) -> Option<LayoutNode> {
    match node {
        LayoutNode::Leaf(id) => {
            if *id == pane_id {
                None
            } else {
                Some(node.clone())
            }
        }
        LayoutNode::Split(split) => {
            if split.first.contains(pane_id) {
                match remove_node(&split.first, pane_id) {
                    // First child was the removed leaf: promote the sibling.
                    None => Some((*split.second).clone()),
                    Some(first) => Some(LayoutNode::Split(SplitNode {
                        id: split.id,
                        direction: split.direction,
                        ratio: split.ratio,
                        first: Box::new(first),
                        second: split.second.clone(),
                    })),
                }
            } else if split.second.contains(pane_id) {
                match remove_node(&split.second, pane_id) {
                    None => Some((*split.first).clone()),
                    Some(second) => Some(LayoutNode::Split(SplitNode {
                        id: split.id,
                        direction: split.direction,
                        ratio: split.ratio,
                        first: split.first.clone(),
                        second: Box::new(second),
                    })),
                }
            } else {
                Some(node.clone())
            }
        }
    }
}

fn resize_node(node: &LayoutNode, split_id: SplitId, ratio: f64) -> LayoutNode {
    match node {
        LayoutNode::Leaf(_) => node.clone(),
        LayoutNode::Split(split) => {
            if split.id == split_id {
                LayoutNode::Split(SplitNode {
                    id: split.id,
                    direction: split.direction,
                    ratio: ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO),
                    first: split.first.clone(),
                    second: split.second.clone(),
                })
            } else {
                LayoutNode::Split(SplitNode {
                    id: split.id,
                    direction: split.direction,
                    ratio: split.ratio,
                    first: Box::new(resize_node(&split.first, split_id, ratio)),
                    second: Box::new(resize_node(&split.second, split_id, ratio)),
                })
            }
        }
    }
}

fn equalize_node(node: &LayoutNode) -> LayoutNode {
    match node {
        LayoutNode::Leaf(_) => node.clone(),
        LayoutNode::Split(split) => LayoutNode::Split(SplitNode {
            id: split.id,
            direction: split.direction,
            ratio: DEFAULT_SPLIT_RATIO,
            first: Box::new(equalize_node(&split.first)),
            second: Box::new(equalize_node(&split.second)),
        }),
    }
}

fn tile_nodes(pane_ids: &[PaneId], direction: SplitDirection) -> Option<LayoutNode> {
    match pane_ids {
        [] => None,
        [only] => Some(LayoutNode::Leaf(*only)),
        _ => {
            let mid = pane_ids.len().div_ceil(2);
            let first = tile_nodes(&pane_ids[..mid], direction.flipped())?;
            let second = tile_nodes(&pane_ids[mid..], direction.flipped())?;
            Some(LayoutNode::Split(SplitNode::new(direction, first, second)))
        }
    }
}
