//! Tab aggregate
//!
//! A tab groups a pane membership list with one or more arrangements and
//! the UI-adjacent state that goes with them: the active arrangement, the
//! active pane, the transient zoom flag, and the per-tab minimized pane
//! set. Nearly every derived property delegates to the active arrangement.
//!
//! Tabs never mutate themselves spontaneously; the workspace store drives
//! every change and keeps the invariants:
//!
//! - `arrangements` is non-empty with exactly one default
//! - `panes` equals the union of all arrangements' layout pane ids
//! - `active_arrangement_id` names a member of `arrangements`
//! - `active_pane_id`/`zoomed_pane_id`, when set, are members of the
//!   active arrangement's layout

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layout::{ArrangementId, Layout, PaneId, SplitRenderInfo, TabId};

use super::arrangement::Arrangement;

/// A tab: pane membership, arrangements, and view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Stable unique identifier.
    pub id: TabId,
    /// Declared pane membership: the union of all arrangements' panes.
    pub panes: Vec<PaneId>,
    /// All arrangements; non-empty, exactly one flagged default.
    pub arrangements: Vec<Arrangement>,
    /// The arrangement currently shown.
    pub active_arrangement_id: ArrangementId,
    /// The focused pane, if any; always a member of the active
    /// arrangement's layout.
    #[serde(default)]
    pub active_pane_id: Option<PaneId>,
    /// The zoomed pane, if any. Transient: not persisted.
    #[serde(skip)]
    pub zoomed_pane_id: Option<PaneId>,
    /// Panes currently minimized in this tab.
    #[serde(default)]
    pub minimized_panes: HashSet<PaneId>,
}

impl Tab {
    /// Creates a tab around its first pane, with a sole default
    /// arrangement holding that pane.
    #[must_use]
    pub fn new(pane_id: PaneId) -> Self {
        let arrangement = Arrangement::new_default(Layout::leaf(pane_id));
        let active_arrangement_id = arrangement.id;
        Self {
            id: TabId::new(),
            panes: vec![pane_id],
            arrangements: vec![arrangement],
            active_arrangement_id,
            active_pane_id: Some(pane_id),
            zoomed_pane_id: None,
            minimized_panes: HashSet::new(),
        }
    }

    // ========================================================================
    // Arrangement Lookup
    // ========================================================================

    /// Returns the default arrangement.
    ///
    /// Falls back to the first arrangement if the default flag is missing;
    /// `None` only if the tab invariant is broken (no arrangements at all).
    #[must_use]
    pub fn default_arrangement(&self) -> Option<&Arrangement> {
        self.arrangements
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.arrangements.first())
    }

    /// Mutable variant of [`Self::default_arrangement`].
    pub fn default_arrangement_mut(&mut self) -> Option<&mut Arrangement> {
        let index = self
            .arrangements
            .iter()
            .position(|a| a.is_default)
            .unwrap_or(0);
        self.arrangements.get_mut(index)
    }

    /// Returns the active arrangement, falling back to the default when
    /// `active_arrangement_id` matches nothing.
    #[must_use]
    pub fn active_arrangement(&self) -> Option<&Arrangement> {
        self.arrangements
            .iter()
            .find(|a| a.id == self.active_arrangement_id)
            .or_else(|| self.default_arrangement())
    }

    /// Mutable variant of [`Self::active_arrangement`].
    pub fn active_arrangement_mut(&mut self) -> Option<&mut Arrangement> {
        let index = self
            .arrangements
            .iter()
            .position(|a| a.id == self.active_arrangement_id);
        match index {
            Some(index) => self.arrangements.get_mut(index),
            None => self.default_arrangement_mut(),
        }
    }

    /// Returns an arrangement by ID.
    #[must_use]
    pub fn arrangement(&self, id: ArrangementId) -> Option<&Arrangement> {
        self.arrangements.iter().find(|a| a.id == id)
    }

    // ========================================================================
    // Derived Properties
    // ========================================================================

    /// Pane ids of the active arrangement, in canonical order.
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.active_arrangement()
            .map(Arrangement::pane_ids)
            .unwrap_or_default()
    }

    /// The active arrangement's layout, if the tab is well-formed.
    #[must_use]
    pub fn active_layout(&self) -> Option<&Layout> {
        self.active_arrangement().map(|a| &a.layout)
    }

    /// True if the active arrangement's layout contains a split.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.active_layout().is_some_and(Layout::is_split)
    }

    /// True if the pane is a declared member of this tab.
    #[must_use]
    pub fn contains_pane(&self, pane_id: PaneId) -> bool {
        self.panes.contains(&pane_id)
    }

    /// True once the default arrangement's layout holds no panes. An empty
    /// tab is deleted by the store; there is no way back.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default_arrangement()
            .is_none_or(|a| a.layout.is_empty())
    }

    /// Rendering info for the active arrangement under this tab's
    /// minimized set.
    #[must_use]
    pub fn render_info(&self) -> SplitRenderInfo {
        self.active_layout()
            .map(|layout| SplitRenderInfo::compute(layout, &self.minimized_panes))
            .unwrap_or_default()
    }

    // ========================================================================
    // Membership and Focus Repair
    // ========================================================================

    /// Resynchronizes `panes` to the union of all arrangements' layout
    /// pane ids, default arrangement order first, and prunes the minimized
    /// set to the surviving members.
    pub fn sync_panes(&mut self) {
        let mut union: Vec<PaneId> = Vec::new();
        if let Some(default) = self.default_arrangement() {
            union.extend(default.pane_ids());
        }
        for arrangement in &self.arrangements {
            for id in arrangement.pane_ids() {
                if !union.contains(&id) {
                    union.push(id);
                }
            }
        }
        self.minimized_panes.retain(|id| union.contains(id));
        self.panes = union;
    }

    /// Repairs `active_pane_id` after a structural change: when it no
    /// longer names a member of the active arrangement's layout, it falls
    /// back to that layout's first pane (or none).
    ///
    /// Minimized state is left alone: if every remaining pane is
    /// minimized, none of them is force-expanded.
    pub fn reset_active_pane(&mut self) {
        let member = self
            .active_pane_id
            .is_some_and(|id| self.active_arrangement().is_some_and(|a| a.contains_pane(id)));
        if !member {
            self.active_pane_id = self.active_arrangement().and_then(|a| a.layout.first_pane());
        }
    }

    /// Clears the zoom flag.
    pub fn clear_zoom(&mut self) {
        self.zoomed_pane_id = None;
    }

    // ========================================================================
    // Arrangement Lifecycle
    // ========================================================================

    /// Switches the active arrangement. Returns false (no-op) if `id` is
    /// already active or unknown.
    ///
    /// The active pane carries over when the new arrangement contains it
    /// and resets to the new layout's first pane otherwise; zoom is always
    /// cleared.
    pub fn switch_arrangement(&mut self, id: ArrangementId) -> bool {
        if id == self.active_arrangement_id || self.arrangement(id).is_none() {
            return false;
        }
        self.active_arrangement_id = id;
        self.reset_active_pane();
        self.clear_zoom();
        true
    }

    /// Removes a non-default arrangement. Returns false (no-op) for the
    /// default arrangement or an unknown id.
    ///
    /// Removing the active arrangement falls back to the default, with the
    /// same focus/zoom rederivation as a switch.
    pub fn remove_arrangement(&mut self, id: ArrangementId) -> bool {
        let Some(target) = self.arrangement(id) else {
            return false;
        };
        if target.is_default {
            return false;
        }

        self.arrangements.retain(|a| a.id != id);
        if self.active_arrangement_id == id {
            if let Some(default_id) = self.default_arrangement().map(|a| a.id) {
                self.active_arrangement_id = default_id;
            }
            self.reset_active_pane();
            self.clear_zoom();
        }
        self.sync_panes();
        true
    }

    /// Renames an arrangement. Returns false (no-op) for an unknown id.
    pub fn rename_arrangement(&mut self, id: ArrangementId, name: impl Into<String>) -> bool {
        match self.arrangements.iter_mut().find(|a| a.id == id) {
            Some(arrangement) => {
                arrangement.name = name.into();
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Focus, Zoom, Minimize
    // ========================================================================

    /// Focuses a pane. Returns false (no-op) if the pane is not a member
    /// of the active arrangement's layout.
    pub fn activate_pane(&mut self, pane_id: PaneId) -> bool {
        if self.active_arrangement().is_some_and(|a| a.contains_pane(pane_id)) {
            self.active_pane_id = Some(pane_id);
            true
        } else {
            false
        }
    }

    /// Toggles zoom on a pane of the active arrangement. Returns false
    /// (no-op) for a pane outside it.
    pub fn toggle_zoom(&mut self, pane_id: PaneId) -> bool {
        if !self.active_arrangement().is_some_and(|a| a.contains_pane(pane_id)) {
            return false;
        }
        self.zoomed_pane_id = if self.zoomed_pane_id == Some(pane_id) {
            None
        } else {
            Some(pane_id)
        };
        true
    }

    /// Minimizes a pane of the active arrangement. Returns false (no-op)
    /// for a pane outside it.
    pub fn minimize_pane(&mut self, pane_id: PaneId) -> bool {
        if self.active_arrangement().is_some_and(|a| a.contains_pane(pane_id)) {
            self.minimized_panes.insert(pane_id);
            true
        } else {
            false
        }
    }

    /// Expands a previously minimized pane. Returns false (no-op) if the
    /// pane was not minimized.
    pub fn expand_pane(&mut self, pane_id: PaneId) -> bool {
        self.minimized_panes.remove(&pane_id)
    }
}
