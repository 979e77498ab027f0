//! Property-based tests for the restore-time repair pass
//!
//! These tests corrupt persisted state in generated ways and verify that
//! one repair pass restores every invariant and that a second pass is
//! always a no-op.

use std::collections::HashSet;
use std::path::Path;

use proptest::prelude::*;
use rustdeck_core::{
    Arrangement, ArrangementId, InsertPosition, Layout, Pane, PaneId, PaneLifetime,
    SplitDirection, Tab, TabId, WorkspaceState, repair,
};

fn exists(_: &Path) -> bool {
    true
}

/// Builds a healthy state with `tab_sizes.len()` tabs holding that many
/// panes each.
fn healthy_state(tab_sizes: &[usize]) -> WorkspaceState {
    let mut panes = Vec::new();
    let mut tabs = Vec::new();

    for &size in tab_sizes {
        let first = Pane::new("pane");
        let first_id = first.id;
        panes.push(first);
        let mut tab = Tab::new(first_id);

        let mut anchor = first_id;
        for _ in 1..size {
            let pane = Pane::new("pane");
            let pane_id = pane.id;
            panes.push(pane);
            tab.default_arrangement_mut().unwrap().insert_pane(
                pane_id,
                anchor,
                SplitDirection::Horizontal,
                InsertPosition::After,
            );
            anchor = pane_id;
        }
        tab.sync_panes();
        tabs.push(tab);
    }

    let active = tabs.first().map(|t| t.id);
    WorkspaceState::new(panes, tabs, active)
}

/// Checks every invariant the repair pass promises.
fn assert_invariants(state: &WorkspaceState) -> Result<(), TestCaseError> {
    let known: HashSet<PaneId> = state.panes.iter().map(|p| p.id).collect();
    let mut seen_across_tabs: HashSet<PaneId> = HashSet::new();

    for tab in &state.tabs {
        // Exactly one default arrangement.
        let defaults = tab.arrangements.iter().filter(|a| a.is_default).count();
        prop_assert_eq!(defaults, 1);

        // Active arrangement resolves to a member.
        prop_assert!(
            tab.arrangements
                .iter()
                .any(|a| a.id == tab.active_arrangement_id)
        );

        // Active pane, when set, is a member of the active arrangement.
        if let Some(active_pane) = tab.active_pane_id {
            prop_assert!(
                tab.active_arrangement()
                    .is_some_and(|a| a.contains_pane(active_pane))
            );
        }

        // Membership equals the union of arrangement panes.
        let mut union: Vec<PaneId> = Vec::new();
        for arrangement in &tab.arrangements {
            for id in arrangement.pane_ids() {
                if !union.contains(&id) {
                    union.push(id);
                }
            }
        }
        let member_set: HashSet<PaneId> = tab.panes.iter().copied().collect();
        let union_set: HashSet<PaneId> = union.into_iter().collect();
        prop_assert_eq!(member_set, union_set);

        // Tabs are non-empty and panes appear in at most one tab.
        prop_assert!(!tab.is_empty());
        for pane_id in &tab.panes {
            prop_assert!(known.contains(pane_id));
            prop_assert!(seen_across_tabs.insert(*pane_id));
        }
    }

    // Active tab resolves when any tab exists.
    match state.active_tab_id {
        Some(id) => prop_assert!(state.tabs.iter().any(|t| t.id == id)),
        None => prop_assert!(state.tabs.is_empty()),
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Repair restores every invariant and is idempotent, whatever
    /// combination of corruptions is applied.
    #[test]
    fn prop_repair_heals_and_is_idempotent(
        tab_sizes in prop::collection::vec(1usize..5, 1..4),
        clear_default_flags in any::<bool>(),
        scramble_active_arrangement in any::<bool>(),
        scramble_active_pane in any::<bool>(),
        scramble_membership in any::<bool>(),
        scramble_active_tab in any::<bool>(),
        ephemeral_first_pane in any::<bool>(),
    ) {
        let mut state = healthy_state(&tab_sizes);

        if clear_default_flags {
            for tab in &mut state.tabs {
                for arrangement in &mut tab.arrangements {
                    arrangement.is_default = false;
                }
            }
        }
        if scramble_active_arrangement {
            for tab in &mut state.tabs {
                tab.active_arrangement_id = ArrangementId::new();
            }
        }
        if scramble_active_pane {
            for tab in &mut state.tabs {
                tab.active_pane_id = Some(PaneId::new());
            }
        }
        if scramble_membership {
            for tab in &mut state.tabs {
                tab.panes.push(PaneId::new());
            }
        }
        if scramble_active_tab {
            state.active_tab_id = Some(TabId::new());
        }
        if ephemeral_first_pane {
            state.panes[0] = state.panes[0]
                .clone()
                .with_lifetime(PaneLifetime::Ephemeral);
        }

        let (repaired, _) = repair(state, exists);
        assert_invariants(&repaired)?;

        let (again, changed_again) = repair(repaired.clone(), exists);
        prop_assert!(!changed_again);
        prop_assert_eq!(again, repaired);
    }

    /// A pane injected into a second tab always ends up in exactly one
    /// tab after repair.
    #[test]
    fn prop_duplicates_resolve_to_first_tab(
        first_size in 1usize..4,
        second_size in 1usize..4,
    ) {
        let mut state = healthy_state(&[first_size, second_size]);
        let stolen = state.tabs[0].panes[0];
        let anchor = state.tabs[1].panes[0];
        state.tabs[1].default_arrangement_mut().unwrap().insert_pane(
            stolen,
            anchor,
            SplitDirection::Vertical,
            InsertPosition::After,
        );
        state.tabs[1].sync_panes();

        let (repaired, changed) = repair(state, exists);

        prop_assert!(changed);
        assert_invariants(&repaired)?;
        prop_assert!(repaired.tabs[0].contains_pane(stolen));
    }

    /// Repair never touches a healthy state.
    #[test]
    fn prop_healthy_state_is_fixed_point(
        tab_sizes in prop::collection::vec(1usize..5, 1..4),
    ) {
        let state = healthy_state(&tab_sizes);
        let (repaired, changed) = repair(state.clone(), exists);
        prop_assert!(!changed);
        prop_assert_eq!(repaired, state);
    }

    /// Custom arrangements survive repair with their visible sets pruned
    /// to surviving panes.
    #[test]
    fn prop_custom_arrangements_survive_repair(size in 2usize..5) {
        let mut state = healthy_state(&[size]);
        let subset: Vec<PaneId> = state.tabs[0].panes.clone();
        let custom = Arrangement::new("custom", Layout::auto_tiled(&subset));
        let custom_id = custom.id;
        state.tabs[0].arrangements.push(custom);

        // Drop the first pane's record entirely.
        let dropped = subset[0];
        state.panes.retain(|p| p.id != dropped);

        let (repaired, _) = repair(state, exists);
        assert_invariants(&repaired)?;

        let tab = &repaired.tabs[0];
        let custom = tab.arrangements.iter().find(|a| a.id == custom_id).unwrap();
        prop_assert!(!custom.contains_pane(dropped));
        prop_assert!(!custom.visible_pane_ids().contains(&dropped));
    }
}
