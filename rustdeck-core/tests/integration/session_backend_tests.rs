//! Session backend boundary integration tests
//!
//! These tests simulate a host-provided session backend and verify the
//! tolerance contract: backend operations are asynchronous, may fail or be
//! cancelled per pane, and may complete after the owning pane is gone, in
//! which case their events are dropped silently.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rustdeck_core::{
    InsertPosition, Pane, PaneId, SessionBackend, SessionError, SessionEvent, SessionResult,
    SessionState, SplitDirection, WorkspaceStore,
};

/// In-memory backend that records every request and can be told to fail.
#[derive(Default)]
struct RecordingBackend {
    started: AtomicUsize,
    restored: AtomicUsize,
    terminated: AtomicUsize,
    fail_for: Mutex<HashSet<PaneId>>,
}

impl RecordingBackend {
    fn fail_starts_for(&self, pane_id: PaneId) {
        self.fail_for.lock().unwrap().insert(pane_id);
    }
}

#[async_trait]
impl SessionBackend for RecordingBackend {
    async fn start(&self, pane_id: PaneId) -> SessionResult<()> {
        if self.fail_for.lock().unwrap().contains(&pane_id) {
            return Err(SessionError::StartFailed {
                pane_id,
                reason: "no shell available".to_string(),
            });
        }
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn restore(&self, pane_id: PaneId) -> SessionResult<()> {
        if self.fail_for.lock().unwrap().contains(&pane_id) {
            return Err(SessionError::StartFailed {
                pane_id,
                reason: "stale session".to_string(),
            });
        }
        self.restored.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn terminate(&self, _pane_id: PaneId) -> SessionResult<()> {
        self.terminated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Registers a pane titled `title` and returns its id.
fn add_pane(store: &mut WorkspaceStore, title: &str) -> PaneId {
    let pane = Pane::new(title);
    let id = pane.id;
    store.add_pane(pane);
    id
}

// ============================================================================
// Backend Round Trips
// ============================================================================

#[tokio::test]
async fn start_events_flow_back_into_the_store() {
    let backend = RecordingBackend::default();
    let mut store = WorkspaceStore::new();
    let a = add_pane(&mut store, "shell");
    store.create_tab(a).unwrap();

    backend.start(a).await.expect("start should succeed");
    store.apply_session_event(SessionEvent::Started { pane_id: a });

    assert_eq!(backend.started.load(Ordering::SeqCst), 1);
    assert_eq!(store.session_state(a), Some(SessionState::Running));
}

#[tokio::test]
async fn failed_start_reports_per_pane() {
    let backend = RecordingBackend::default();
    let mut store = WorkspaceStore::new();
    let good = add_pane(&mut store, "good");
    let bad = add_pane(&mut store, "bad");
    let tab_id = store.create_tab(good).unwrap();
    store.insert_pane(bad, tab_id, good, SplitDirection::Horizontal, InsertPosition::After);
    backend.fail_starts_for(bad);

    backend.start(good).await.expect("start should succeed");
    store.apply_session_event(SessionEvent::Started { pane_id: good });

    let err = backend.start(bad).await.unwrap_err();
    assert!(matches!(err, SessionError::StartFailed { pane_id, .. } if pane_id == bad));
    store.apply_session_event(SessionEvent::Failed {
        pane_id: bad,
        reason: "no shell available".to_string(),
    });

    // One pane failing leaves its siblings untouched.
    assert_eq!(store.session_state(good), Some(SessionState::Running));
    assert_eq!(store.session_state(bad), Some(SessionState::Failed));
}

#[tokio::test]
async fn restore_drives_every_persisted_pane() {
    let backend = RecordingBackend::default();
    let mut store = WorkspaceStore::new();
    let a = add_pane(&mut store, "a");
    let b = add_pane(&mut store, "b");
    let tab_id = store.create_tab(a).unwrap();
    store.insert_pane(b, tab_id, a, SplitDirection::Horizontal, InsertPosition::After);

    // The host walks the restored tab membership and asks the backend to
    // bring each session back.
    for pane_id in store.tab(tab_id).unwrap().panes.clone() {
        backend.restore(pane_id).await.expect("restore should succeed");
        store.apply_session_event(SessionEvent::Started { pane_id });
    }

    assert_eq!(backend.restored.load(Ordering::SeqCst), 2);
    assert_eq!(store.session_state(a), Some(SessionState::Running));
    assert_eq!(store.session_state(b), Some(SessionState::Running));
}

// ============================================================================
// Late Completion Tolerance
// ============================================================================

#[tokio::test]
async fn event_arriving_after_pane_removal_is_dropped() {
    let backend = Arc::new(RecordingBackend::default());
    let mut store = WorkspaceStore::new();
    let a = add_pane(&mut store, "short-lived");
    store.create_tab(a).unwrap();

    // The start completes on another task while the pane is being removed.
    let task_backend = Arc::clone(&backend);
    let start = tokio::spawn(async move { task_backend.start(a).await });

    store.remove_pane(a);
    start
        .await
        .expect("task should not panic")
        .expect("start should succeed");

    // The late event targets a pane the store no longer owns: silently
    // dropped, no state recorded, nothing marked dirty.
    store.take_dirty();
    store.apply_session_event(SessionEvent::Started { pane_id: a });
    assert!(store.session_state(a).is_none());
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn exit_event_for_a_departed_tab_is_a_noop() {
    let backend = RecordingBackend::default();
    let mut store = WorkspaceStore::new();
    let a = add_pane(&mut store, "a");
    let tab_id = store.create_tab(a).unwrap();
    backend.start(a).await.expect("start should succeed");
    store.apply_session_event(SessionEvent::Started { pane_id: a });

    store.remove_pane(a);
    assert!(store.tab(tab_id).is_none());

    backend.terminate(a).await.expect("terminate should succeed");
    store.apply_session_event(SessionEvent::Exited { pane_id: a, status: 0 });

    assert!(store.session_state(a).is_none());
    assert_eq!(backend.terminated.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancelled_operations_surface_as_errors_not_state() {
    let mut store = WorkspaceStore::new();
    let a = add_pane(&mut store, "a");
    store.create_tab(a).unwrap();

    // A cancellation belongs to the backend boundary; the store only ever
    // sees completed events, so its bookkeeping stays empty.
    let err = SessionError::Cancelled { pane_id: a };
    assert!(format!("{err}").contains("cancelled"));
    assert!(store.session_state(a).is_none());
}

// ============================================================================
// Trait Object Use
// ============================================================================

#[tokio::test]
async fn backend_is_usable_behind_a_trait_object() {
    let backend: Arc<dyn SessionBackend> = Arc::new(RecordingBackend::default());
    let pane_id = PaneId::new();

    backend.start(pane_id).await.expect("start should succeed");
    backend
        .terminate(pane_id)
        .await
        .expect("terminate should succeed");
}
