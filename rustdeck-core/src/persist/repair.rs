//! Restore-time invariant repair
//!
//! Persisted state can drift: crashes mid-save, hand edits, or records
//! written by buggy builds. Instead of rejecting such files, loading runs
//! this pass once to heal them. The pass is a pure function (filesystem
//! knowledge is injected as a predicate), so its invariants can be tested
//! in isolation from both disk and the live mutation API. It is
//! deterministic and idempotent: running it twice produces the same state.
//!
//! Repair steps, in order:
//!
//! 1. Panes that are non-persistent, or whose declared worktree no longer
//!    exists, are dropped entirely (records and layout leaves), along with
//!    layout leaves that reference no pane record at all.
//! 2. Per tab: exactly one arrangement carries the default flag (the first
//!    flagged one wins; with none flagged, the first arrangement is
//!    promoted).
//! 3. Per tab: `active_arrangement_id` falls back to the default
//!    arrangement when it matches nothing.
//! 4. Per tab: `active_pane_id` falls back to the active arrangement's
//!    first pane (or none) when it is not a member.
//! 5. Per tab: the pane membership list is resynced to the union of all
//!    arrangements' layout panes.
//! 6. A pane appearing in more than one tab is kept only in the first tab
//!    in document order; later tabs lose it, and steps 2–5 rerun for every
//!    tab mutated this way.
//!
//! Finally, tabs whose default arrangement ended up empty are deleted (an
//! empty tab cannot be re-filled) and the active tab id is re-anchored.

use std::collections::HashSet;
use std::path::Path;

use crate::layout::PaneId;
use crate::workspace::Tab;

use super::WorkspaceState;

/// Repairs a loaded state, returning the healed state and whether anything
/// changed.
///
/// `worktree_exists` answers whether a pane's declared worktree directory
/// is still present; inject [`Path::exists`] for real loads (see
/// [`repair_on_disk`]) or a closure in tests.
#[must_use]
pub fn repair(
    state: WorkspaceState,
    worktree_exists: impl Fn(&Path) -> bool,
) -> (WorkspaceState, bool) {
    let original = state.clone();
    let mut state = state;

    drop_unrestorable_panes(&mut state, &worktree_exists);

    for tab in &mut state.tabs {
        repair_tab(tab);
    }

    dedupe_panes_across_tabs(&mut state);

    state.tabs.retain(|tab| {
        let empty = tab.is_empty();
        if empty {
            tracing::warn!(tab_id = %tab.id, "Dropping empty tab during restore repair");
        }
        !empty
    });

    let active_ok = state
        .active_tab_id
        .is_some_and(|id| state.tabs.iter().any(|t| t.id == id));
    if !active_ok {
        state.active_tab_id = state.tabs.first().map(|t| t.id);
    }

    let changed = state != original;
    (state, changed)
}

/// Repairs a loaded state against the real filesystem.
#[must_use]
pub fn repair_on_disk(state: WorkspaceState) -> (WorkspaceState, bool) {
    repair(state, Path::exists)
}

/// Step 1: drop pane records that must not be restored, then scrub every
/// layout so dangling ids never survive into a tab.
fn drop_unrestorable_panes(state: &mut WorkspaceState, worktree_exists: &impl Fn(&Path) -> bool) {
    state.panes.retain(|pane| {
        if !pane.is_persistent() {
            tracing::warn!(pane_id = %pane.id, "Dropping non-persistent pane during restore");
            return false;
        }
        if let Some(worktree) = &pane.worktree {
            if !worktree_exists(worktree) {
                tracing::warn!(
                    pane_id = %pane.id,
                    worktree = %worktree.display(),
                    "Dropping pane whose worktree no longer exists"
                );
                return false;
            }
        }
        true
    });

    let known: HashSet<PaneId> = state.panes.iter().map(|p| p.id).collect();
    for tab in &mut state.tabs {
        for arrangement in &mut tab.arrangements {
            for pane_id in arrangement.pane_ids() {
                if !known.contains(&pane_id) {
                    arrangement.remove_pane(pane_id);
                }
            }
        }
    }
}

/// Steps 2–5 for one tab.
fn repair_tab(tab: &mut Tab) {
    // Step 2: exactly one default arrangement.
    let mut default_seen = false;
    for arrangement in &mut tab.arrangements {
        if arrangement.is_default {
            if default_seen {
                arrangement.is_default = false;
            }
            default_seen = true;
        }
    }
    if !default_seen {
        if let Some(first) = tab.arrangements.first_mut() {
            first.is_default = true;
        }
    }

    // Step 3: active arrangement id must name a member.
    let active_known = tab
        .arrangements
        .iter()
        .any(|a| a.id == tab.active_arrangement_id);
    if !active_known {
        if let Some(default_id) = tab.default_arrangement().map(|a| a.id) {
            tab.active_arrangement_id = default_id;
        }
    }

    // Step 4: active pane must live in the active arrangement.
    tab.reset_active_pane();

    // Step 5: membership equals the union of arrangement panes.
    tab.sync_panes();
}

/// Step 6: a pane id may appear in at most one tab; first tab in document
/// order wins.
fn dedupe_panes_across_tabs(state: &mut WorkspaceState) {
    let mut seen: HashSet<PaneId> = HashSet::new();
    for tab in &mut state.tabs {
        let mut mutated = false;
        for pane_id in tab.panes.clone() {
            if seen.contains(&pane_id) {
                tracing::warn!(
                    pane_id = %pane_id,
                    tab_id = %tab.id,
                    "Removing pane duplicated across tabs"
                );
                for arrangement in &mut tab.arrangements {
                    arrangement.remove_pane(pane_id);
                }
                mutated = true;
            } else {
                seen.insert(pane_id);
            }
        }
        if mutated {
            repair_tab(tab);
        }
    }
}
