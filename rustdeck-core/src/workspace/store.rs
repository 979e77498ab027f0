//! Workspace store
//!
//! The `WorkspaceStore` is the single mutable owner of all panes and tabs.
//! It is the only component that edits layouts and arrangements, and it is
//! responsible for cascading every pane insertion/removal across every
//! arrangement that references the pane, keeping each tab's declared
//! membership in sync, and repairing focus/zoom after structural changes.
//!
//! # Concurrency
//!
//! The store is designed for single-writer, serialized access: all
//! mutating calls are expected to come from one logical owner and there is
//! no internal locking. The layout engine underneath is pure, so read-side
//! consumers can hold layout values freely.
//!
//! # Dirty Tracking
//!
//! Every effective mutation marks the store dirty. Persistence is
//! debounced and happens outside the store; callers drain the flag with
//! [`WorkspaceStore::take_dirty`] or force a flush with
//! [`WorkspaceStore::save_to_file`].

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::layout::{
    ArrangementId, InsertPosition, Layout, NavDirection, PaneId, SplitDirection, SplitId, TabId,
};
use crate::persist::{self, StateError, WorkspaceState};
use crate::session::{SessionEvent, SessionState};

use super::arrangement::Arrangement;
use super::pane::{Pane, PaneResidency};
use super::tab::Tab;

/// The single mutable aggregate owning all tabs and panes.
#[derive(Debug, Default)]
pub struct WorkspaceStore {
    /// All pane records, keyed by pane ID.
    panes: HashMap<PaneId, Pane>,
    /// Ordered tab list (the order is part of the persisted state).
    tabs: Vec<Tab>,
    /// The tab currently in front.
    active_tab_id: Option<TabId>,
    /// Set by every effective mutation; drained by the save path.
    dirty: bool,
    /// Last reported session state per pane. Not persisted.
    session_states: HashMap<PaneId, SessionState>,
}

impl WorkspaceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns a pane record.
    #[must_use]
    pub fn pane(&self, pane_id: PaneId) -> Option<&Pane> {
        self.panes.get(&pane_id)
    }

    /// Returns the number of registered panes.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Returns the ordered tab list.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Returns a tab by ID.
    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// Returns the active tab, if any.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.tab(id))
    }

    /// Returns the active tab's ID, if any.
    #[must_use]
    pub const fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Returns true if there are unsaved changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, returning its previous value.
    pub const fn take_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    /// Returns the last reported session state for a pane.
    #[must_use]
    pub fn session_state(&self, pane_id: PaneId) -> Option<SessionState> {
        self.session_states.get(&pane_id).copied()
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ========================================================================
    // Pane and Tab Lifecycle
    // ========================================================================

    /// Registers a pane record with the store without placing it in a tab.
    ///
    /// No-op if a pane with the same ID is already registered.
    pub fn add_pane(&mut self, pane: Pane) {
        if self.panes.contains_key(&pane.id) {
            return;
        }
        tracing::debug!(pane_id = %pane.id, title = %pane.title, "Pane registered");
        self.panes.insert(pane.id, pane);
        self.mark_dirty();
    }

    /// Creates a new tab around a registered pane and makes it active.
    ///
    /// Returns `None` (store unchanged) if the pane is unknown or already
    /// a member of some tab.
    pub fn create_tab(&mut self, pane_id: PaneId) -> Option<TabId> {
        if !self.panes.contains_key(&pane_id) || self.owning_tab(pane_id).is_some() {
            return None;
        }
        let tab = Tab::new(pane_id);
        let tab_id = tab.id;
        tracing::info!(tab_id = %tab_id, pane_id = %pane_id, "Tab created");
        self.tabs.push(tab);
        self.active_tab_id = Some(tab_id);
        self.set_residency(pane_id, PaneResidency::Active);
        self.mark_dirty();
        Some(tab_id)
    }

    /// Returns the ID of the tab whose membership contains the pane.
    #[must_use]
    pub fn owning_tab(&self, pane_id: PaneId) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.contains_pane(pane_id))
            .map(|t| t.id)
    }

    /// Opens a pane: registers the record and places it next to the active
    /// tab's focused pane, or in a fresh tab when the workspace has none.
    ///
    /// Returns the tab the pane landed in, or `None` if a pane with the
    /// same ID is already placed somewhere.
    pub fn open_pane(&mut self, pane: Pane) -> Option<TabId> {
        let pane_id = pane.id;
        self.add_pane(pane);
        self.place_pane(pane_id)
    }

    /// Brings a pending-undo or backgrounded pane back into the workspace,
    /// placed like a freshly opened pane.
    ///
    /// Returns the tab the pane landed in, or `None` (no-op) when the pane
    /// is unknown or still placed in a tab.
    pub fn restore_pane(&mut self, pane_id: PaneId) -> Option<TabId> {
        if !self.panes.contains_key(&pane_id) {
            return None;
        }
        let tab_id = self.place_pane(pane_id)?;
        tracing::info!(pane_id = %pane_id, tab_id = %tab_id, "Pane restored");
        Some(tab_id)
    }

    /// Places a registered, unplaced pane next to the active tab's focused
    /// pane (or its first pane), creating a tab when none exists.
    fn place_pane(&mut self, pane_id: PaneId) -> Option<TabId> {
        if self.owning_tab(pane_id).is_some() {
            return None;
        }
        let placement = self.active_tab().and_then(|tab| {
            tab.active_pane_id
                .or_else(|| tab.active_layout().and_then(Layout::first_pane))
                .map(|target| (tab.id, target))
        });
        match placement {
            Some((tab_id, target)) => {
                self.insert_pane(
                    pane_id,
                    tab_id,
                    target,
                    SplitDirection::Horizontal,
                    InsertPosition::After,
                );
                self.tab(tab_id)?.contains_pane(pane_id).then_some(tab_id)
            }
            None => self.create_tab(pane_id),
        }
    }

    /// Inserts a registered pane into a tab next to `target`.
    ///
    /// The insertion is applied to the active arrangement's layout; when
    /// the active arrangement is not the default, the same insertion is
    /// also applied to the default arrangement, so the default always
    /// holds the union of panes ever placed in the tab. Zoom is cleared
    /// and the tab's membership list resynced.
    ///
    /// No-op when the pane is unknown, already placed in a tab, the tab is
    /// unknown, or the target is absent from the active arrangement.
    pub fn insert_pane(
        &mut self,
        pane_id: PaneId,
        tab_id: TabId,
        target: PaneId,
        direction: SplitDirection,
        position: InsertPosition,
    ) {
        if !self.panes.contains_key(&pane_id) || self.owning_tab(pane_id).is_some() {
            return;
        }
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };

        let default_is_active = tab.active_arrangement().is_some_and(|a| a.is_default);
        let Some(active) = tab.active_arrangement_mut() else {
            return;
        };
        active.insert_pane(pane_id, target, direction, position);
        if !active.contains_pane(pane_id) {
            // Target was absent; nothing changed.
            return;
        }
        if !default_is_active {
            if let Some(default) = tab.default_arrangement_mut() {
                default.insert_pane(pane_id, target, direction, position);
            }
        }
        tab.sync_panes();
        tab.clear_zoom();

        tracing::info!(pane_id = %pane_id, tab_id = %tab_id, target = %target, "Pane inserted");
        self.set_residency(pane_id, PaneResidency::Active);
        self.mark_dirty();
    }

    /// Removes a pane from a tab's active (and default) arrangement
    /// layouts, without deleting the pane record or the tab.
    ///
    /// Returns true when the tab's default arrangement is now empty; the
    /// caller decides whether to delete the tab. Focus moves to the first
    /// remaining pane of the active arrangement; minimized state is left
    /// alone, so if every survivor is minimized none is force-expanded.
    pub fn remove_pane_from_layout(&mut self, pane_id: PaneId, tab_id: TabId) -> bool {
        let Some(tab) = self.tab_mut(tab_id) else {
            return false;
        };

        let in_active = tab.active_arrangement().is_some_and(|a| a.contains_pane(pane_id));
        let in_default = tab.default_arrangement().is_some_and(|a| a.contains_pane(pane_id));
        if !in_active && !in_default {
            return false;
        }

        if let Some(active) = tab.active_arrangement_mut() {
            active.remove_pane(pane_id);
        }
        if let Some(default) = tab.default_arrangement_mut() {
            default.remove_pane(pane_id);
        }
        if tab.zoomed_pane_id == Some(pane_id) {
            tab.clear_zoom();
        }
        tab.reset_active_pane();
        tab.sync_panes();
        let now_empty = tab.is_empty();

        tracing::info!(pane_id = %pane_id, tab_id = %tab_id, now_empty, "Pane removed from layout");
        self.mark_dirty();
        now_empty
    }

    /// Removes a pane everywhere: from every arrangement of every tab,
    /// from the pane map, and from session bookkeeping. Drawer children go
    /// with their parent. Tabs whose default arrangement becomes empty are
    /// deleted.
    ///
    /// Unknown pane ids are a no-op.
    pub fn remove_pane(&mut self, pane_id: PaneId) {
        let Some(pane) = self.panes.remove(&pane_id) else {
            return;
        };

        let mut removed = vec![pane_id];
        for child in &pane.drawer {
            if self.panes.remove(child).is_some() {
                removed.push(*child);
            }
            self.session_states.remove(child);
        }
        self.session_states.remove(&pane_id);

        self.detach_from_tabs(&removed);

        tracing::info!(pane_id = %pane_id, drawer_count = pane.drawer.len(), "Pane removed");
        self.mark_dirty();
    }

    /// Removes the given panes from every arrangement of every tab,
    /// repairs focus/zoom, resyncs membership, and deletes emptied tabs.
    fn detach_from_tabs(&mut self, pane_ids: &[PaneId]) {
        for tab in &mut self.tabs {
            let mut touched = false;
            for arrangement in &mut tab.arrangements {
                for pane_id in pane_ids {
                    if arrangement.contains_pane(*pane_id) {
                        arrangement.remove_pane(*pane_id);
                        touched = true;
                    }
                }
            }
            if touched {
                if tab
                    .zoomed_pane_id
                    .is_some_and(|id| pane_ids.contains(&id))
                {
                    tab.clear_zoom();
                }
                tab.reset_active_pane();
                tab.sync_panes();
            }
        }
        self.drop_empty_tabs();
    }

    /// Deletes tabs whose default arrangement has become empty and repairs
    /// the active tab id.
    fn drop_empty_tabs(&mut self) {
        let before = self.tabs.len();
        self.tabs.retain(|tab| {
            let empty = tab.is_empty();
            if empty {
                tracing::info!(tab_id = %tab.id, "Empty tab deleted");
            }
            !empty
        });
        if self.tabs.len() != before {
            let still_there = self
                .active_tab_id
                .is_some_and(|id| self.tabs.iter().any(|t| t.id == id));
            if !still_there {
                self.active_tab_id = self.tabs.first().map(|t| t.id);
            }
        }
    }

    fn set_residency(&mut self, pane_id: PaneId, residency: PaneResidency) {
        if let Some(pane) = self.panes.get_mut(&pane_id) {
            pane.residency = residency;
        }
    }

    // ========================================================================
    // Residency Transitions
    // ========================================================================

    /// Detaches a pane from its tab's layouts and marks it backgrounded.
    /// The record stays registered and can be re-inserted later.
    ///
    /// Returns false (no-op) for unknown or already-detached panes.
    pub fn background_pane(&mut self, pane_id: PaneId) -> bool {
        if !self.panes.contains_key(&pane_id) || self.owning_tab(pane_id).is_none() {
            return false;
        }
        self.detach_from_tabs(&[pane_id]);
        self.set_residency(pane_id, PaneResidency::Backgrounded);
        tracing::info!(pane_id = %pane_id, "Pane backgrounded");
        self.mark_dirty();
        true
    }

    /// Detaches a pane and holds it for undo until `expires_at`.
    ///
    /// Returns false (no-op) for unknown or already-detached panes.
    pub fn mark_pending_undo(&mut self, pane_id: PaneId, expires_at: DateTime<Utc>) -> bool {
        if !self.panes.contains_key(&pane_id) || self.owning_tab(pane_id).is_none() {
            return false;
        }
        self.detach_from_tabs(&[pane_id]);
        self.set_residency(pane_id, PaneResidency::PendingUndo { expires_at });
        tracing::info!(pane_id = %pane_id, "Pane held for undo");
        self.mark_dirty();
        true
    }

    /// Deletes pane records whose undo window has closed. Returns the ids
    /// that were purged.
    pub fn purge_expired_undo(&mut self, now: DateTime<Utc>) -> Vec<PaneId> {
        let expired: Vec<PaneId> = self
            .panes
            .values()
            .filter(|p| p.undo_expired(now))
            .map(|p| p.id)
            .collect();
        for pane_id in &expired {
            self.remove_pane(*pane_id);
        }
        expired
    }

    // ========================================================================
    // Layout Operations (Active Arrangement)
    // ========================================================================

    /// Sets a split's ratio in the active arrangement of a tab. The ratio
    /// is clamped to the valid range; unknown tab or split ids are no-ops.
    pub fn resize_split(&mut self, tab_id: TabId, split_id: SplitId, ratio: f64) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        let Some(active) = tab.active_arrangement_mut() else {
            return;
        };
        let updated = active.layout.resizing(split_id, ratio);
        if updated == active.layout {
            return;
        }
        active.layout = updated;
        tracing::debug!(tab_id = %tab_id, split_id = %split_id, ratio, "Split resized");
        self.mark_dirty();
    }

    /// Resets every split in the active arrangement to an even ratio.
    pub fn equalize_panes(&mut self, tab_id: TabId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        let Some(active) = tab.active_arrangement_mut() else {
            return;
        };
        let updated = active.layout.equalized();
        if updated == active.layout {
            return;
        }
        active.layout = updated;
        tracing::debug!(tab_id = %tab_id, "Splits equalized");
        self.mark_dirty();
    }

    /// Minimizes a pane in a tab. No-op outside the active arrangement.
    pub fn minimize_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.minimize_pane(pane_id) {
            tracing::debug!(tab_id = %tab_id, pane_id = %pane_id, "Pane minimized");
            self.mark_dirty();
        }
    }

    /// Expands a minimized pane. No-op if it was not minimized.
    pub fn expand_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.expand_pane(pane_id) {
            tracing::debug!(tab_id = %tab_id, pane_id = %pane_id, "Pane expanded");
            self.mark_dirty();
        }
    }

    // ========================================================================
    // Arrangements
    // ========================================================================

    /// Creates a named arrangement over a subset of a tab's panes, tiled
    /// in the tab's canonical order.
    ///
    /// Returns `None` (store unchanged) if the tab is unknown, the subset
    /// is empty, or it contains a pane that is not a member of the tab.
    pub fn create_arrangement(
        &mut self,
        tab_id: TabId,
        name: impl Into<String>,
        subset: &[PaneId],
    ) -> Option<ArrangementId> {
        let Some(tab) = self.tab_mut(tab_id) else {
            return None;
        };
        if subset.is_empty() || subset.iter().any(|id| !tab.contains_pane(*id)) {
            return None;
        }

        let ordered: Vec<PaneId> = tab
            .panes
            .iter()
            .filter(|id| subset.contains(id))
            .copied()
            .collect();
        let arrangement = Arrangement::new(name, Layout::auto_tiled(&ordered));
        let arrangement_id = arrangement.id;
        tab.arrangements.push(arrangement);

        tracing::info!(
            tab_id = %tab_id,
            arrangement_id = %arrangement_id,
            pane_count = ordered.len(),
            "Arrangement created"
        );
        self.mark_dirty();
        Some(arrangement_id)
    }

    /// Switches a tab's active arrangement. No-op if already active or
    /// unknown.
    pub fn switch_arrangement(&mut self, tab_id: TabId, arrangement_id: ArrangementId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.switch_arrangement(arrangement_id) {
            tracing::info!(tab_id = %tab_id, arrangement_id = %arrangement_id, "Arrangement switched");
            self.mark_dirty();
        }
    }

    /// Removes a non-default arrangement. Returns false (refused) for the
    /// default arrangement or unknown ids.
    pub fn remove_arrangement(&mut self, tab_id: TabId, arrangement_id: ArrangementId) -> bool {
        let Some(tab) = self.tab_mut(tab_id) else {
            return false;
        };
        if tab.remove_arrangement(arrangement_id) {
            tracing::info!(tab_id = %tab_id, arrangement_id = %arrangement_id, "Arrangement removed");
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    /// Renames an arrangement. No-op for unknown ids.
    pub fn rename_arrangement(
        &mut self,
        tab_id: TabId,
        arrangement_id: ArrangementId,
        name: impl Into<String>,
    ) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.rename_arrangement(arrangement_id, name) {
            self.mark_dirty();
        }
    }

    // ========================================================================
    // Focus and Navigation
    // ========================================================================

    /// Focuses a pane in a tab. No-op outside the active arrangement.
    pub fn activate_pane(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.activate_pane(pane_id) {
            self.mark_dirty();
        }
    }

    /// Toggles zoom on a pane. No-op outside the active arrangement.
    pub fn toggle_zoom(&mut self, tab_id: TabId, pane_id: PaneId) {
        let Some(tab) = self.tab_mut(tab_id) else {
            return;
        };
        if tab.toggle_zoom(pane_id) {
            self.mark_dirty();
        }
    }

    /// Moves focus to the neighboring pane in a direction. Returns the
    /// newly focused pane, or `None` if there is no neighbor.
    pub fn focus_neighbor(&mut self, tab_id: TabId, direction: NavDirection) -> Option<PaneId> {
        let tab = self.tab_mut(tab_id)?;
        let current = tab.active_pane_id?;
        let next = tab.active_layout()?.neighbor(current, direction)?;
        tab.active_pane_id = Some(next);
        self.mark_dirty();
        Some(next)
    }

    /// Moves focus to the next pane in canonical order, wrapping around.
    pub fn focus_next_pane(&mut self, tab_id: TabId) -> Option<PaneId> {
        let tab = self.tab_mut(tab_id)?;
        let current = tab.active_pane_id?;
        let next = tab.active_layout()?.next_pane(current)?;
        tab.active_pane_id = Some(next);
        self.mark_dirty();
        Some(next)
    }

    /// Moves focus to the previous pane in canonical order, wrapping
    /// around.
    pub fn focus_previous_pane(&mut self, tab_id: TabId) -> Option<PaneId> {
        let tab = self.tab_mut(tab_id)?;
        let current = tab.active_pane_id?;
        let previous = tab.active_layout()?.previous_pane(current)?;
        tab.active_pane_id = Some(previous);
        self.mark_dirty();
        Some(previous)
    }

    /// Makes a tab active. No-op for unknown ids.
    pub fn set_active_tab(&mut self, tab_id: TabId) {
        if self.tab(tab_id).is_some() && self.active_tab_id != Some(tab_id) {
            self.active_tab_id = Some(tab_id);
            self.mark_dirty();
        }
    }

    /// Cycles the active tab forward. Returns the new active tab id.
    pub fn next_tab(&mut self) -> Option<TabId> {
        self.cycle_tab(1)
    }

    /// Cycles the active tab backward. Returns the new active tab id.
    pub fn previous_tab(&mut self) -> Option<TabId> {
        self.cycle_tab(-1)
    }

    fn cycle_tab(&mut self, step: isize) -> Option<TabId> {
        if self.tabs.is_empty() {
            return None;
        }
        let len = self.tabs.len() as isize;
        let current = self
            .active_tab_id
            .and_then(|id| self.tabs.iter().position(|t| t.id == id))
            .map_or(0, |index| index as isize);
        let next = (current + step).rem_euclid(len) as usize;
        let next_id = self.tabs[next].id;
        if self.active_tab_id != Some(next_id) {
            self.active_tab_id = Some(next_id);
            self.mark_dirty();
        }
        Some(next_id)
    }

    // ========================================================================
    // Session Events
    // ========================================================================

    /// Applies a session-backend event to the store's bookkeeping.
    ///
    /// Backend operations are asynchronous and may complete after the
    /// owning pane has been removed; events for unknown panes are dropped
    /// silently rather than treated as errors.
    pub fn apply_session_event(&mut self, event: SessionEvent) {
        let pane_id = event.pane_id();
        if !self.panes.contains_key(&pane_id) {
            tracing::debug!(pane_id = %pane_id, "Dropping session event for departed pane");
            return;
        }
        let state = match event {
            SessionEvent::Started { .. } => SessionState::Running,
            SessionEvent::Exited { .. } => SessionState::Exited,
            SessionEvent::Failed { .. } => SessionState::Failed,
        };
        self.session_states.insert(pane_id, state);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Captures the persistable state of the store.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceState {
        let mut panes: Vec<Pane> = self.panes.values().cloned().collect();
        // Keyed by a HashMap in memory; sorted for a stable, diffable file.
        panes.sort_by_key(|p| p.id);
        WorkspaceState::new(panes, self.tabs.clone(), self.active_tab_id)
    }

    /// Rebuilds a store from repaired persisted state.
    #[must_use]
    pub fn from_state(state: WorkspaceState) -> Self {
        let panes = state.panes.into_iter().map(|p| (p.id, p)).collect();
        Self {
            panes,
            tabs: state.tabs,
            active_tab_id: state.active_tab_id,
            dirty: false,
            session_states: HashMap::new(),
        }
    }

    /// Saves the store to a file and clears the dirty flag.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save_to_file(&mut self, path: &Path) -> Result<(), StateError> {
        self.snapshot().save_to_file(path)?;
        self.dirty = false;
        Ok(())
    }

    /// Loads a store from a file, applying the restore-time repair pass.
    ///
    /// A missing file yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if reading or parsing the file fails.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>, StateError> {
        let Some(state) = WorkspaceState::load_from_file(path)? else {
            return Ok(None);
        };
        let (repaired, changed) = persist::repair_on_disk(state);
        if changed {
            tracing::info!(path = %path.display(), "Restored state required repair");
        }
        Ok(Some(Self::from_state(repaired)))
    }
}
