//! Named arrangements over a tab's panes
//!
//! An arrangement pairs a [`Layout`] with an explicit visible-pane subset.
//! Every tab owns at least one arrangement, the default, which always
//! contains the union of panes ever placed in the tab; additional named
//! arrangements present alternate views over a subset of those panes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layout::{ArrangementId, InsertPosition, Layout, PaneId, SplitDirection};

/// Name given to the default arrangement created with a tab.
pub const DEFAULT_ARRANGEMENT_NAME: &str = "Default";

/// A named, independently-editable layout over a tab's panes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    /// Stable unique identifier.
    pub id: ArrangementId,
    /// Display name.
    pub name: String,
    /// True for exactly one arrangement per tab. The default arrangement
    /// can never be removed.
    pub is_default: bool,
    /// The split-tree layout for this arrangement.
    pub layout: Layout,
    /// Visible panes; always a subset of the layout's pane ids.
    #[serde(default)]
    pub visible_panes: HashSet<PaneId>,
}

impl Arrangement {
    /// Creates a non-default arrangement with every layout pane visible.
    #[must_use]
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        let visible_panes = layout.pane_ids().into_iter().collect();
        Self {
            id: ArrangementId::new(),
            name: name.into(),
            is_default: false,
            layout,
            visible_panes,
        }
    }

    /// Creates the default arrangement for a new tab.
    #[must_use]
    pub fn new_default(layout: Layout) -> Self {
        Self {
            is_default: true,
            ..Self::new(DEFAULT_ARRANGEMENT_NAME, layout)
        }
    }

    /// Restricts the visible set to the given panes (intersected with the
    /// layout's panes so the subset invariant holds).
    #[must_use]
    pub fn with_visible_panes(mut self, visible: &HashSet<PaneId>) -> Self {
        self.visible_panes = self
            .layout
            .pane_ids()
            .into_iter()
            .filter(|id| visible.contains(id))
            .collect();
        self
    }

    /// Returns the arrangement's pane ids in canonical layout order.
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.layout.pane_ids()
    }

    /// Returns the visible pane ids in canonical layout order.
    #[must_use]
    pub fn visible_pane_ids(&self) -> Vec<PaneId> {
        self.layout
            .pane_ids()
            .into_iter()
            .filter(|id| self.visible_panes.contains(id))
            .collect()
    }

    /// Returns true if the layout contains the given pane.
    #[must_use]
    pub fn contains_pane(&self, pane_id: PaneId) -> bool {
        self.layout.contains(pane_id)
    }

    /// Inserts a pane next to `target` and marks it visible.
    ///
    /// No-op if the target is absent (the layout edit itself is total).
    pub fn insert_pane(
        &mut self,
        pane_id: PaneId,
        target: PaneId,
        direction: SplitDirection,
        position: InsertPosition,
    ) {
        let updated = self.layout.inserting(pane_id, target, direction, position);
        if updated.contains(pane_id) {
            self.visible_panes.insert(pane_id);
        }
        self.layout = updated;
    }

    /// Removes a pane from the layout and the visible set.
    pub fn remove_pane(&mut self, pane_id: PaneId) {
        self.layout = self.layout.removing(pane_id);
        self.visible_panes.remove(&pane_id);
    }
}
