//! `RustDeck` Core Library
//!
//! This crate provides the core functionality for the `RustDeck` workspace
//! tool: the binary split-tree layout engine, the multi-arrangement view
//! system layered over each tab's panes, the minimize-aware render-ratio
//! computation, and the workspace store that owns all of it and keeps it
//! consistent under mutation and crash recovery.
//!
//! # Crate Structure
//!
//! - [`layout`] - Split-tree layouts, identifiers, and rendering math
//! - [`workspace`] - Panes, arrangements, tabs, and the owning store
//! - [`persist`] - Versioned JSON persistence with restore-time repair
//! - [`session`] - The pluggable session-backend boundary
//! - [`tracing`] - Structured logging setup
//!
//! # Design Notes
//!
//! The layout engine is pure: every structural operation returns a new
//! value, and malformed input (stale ids, empty layouts) is defined to be
//! a no-op rather than an error. All mutation funnels through
//! [`workspace::WorkspaceStore`], which expects a single writer and
//! cascades each change across every arrangement that references the
//! affected pane. Persisted state is healed, never rejected, by the
//! [`persist::repair`] pass.

#![warn(missing_docs)]

pub mod layout;
pub mod persist;
pub mod session;
pub mod tracing;
pub mod workspace;

// =============================================================================
// Convenience re-exports
//
// Flat re-exports for tests and embedding hosts. New code should prefer
// the modular paths (e.g. `rustdeck_core::layout::Layout`).
// =============================================================================

pub use layout::{
    ArrangementId, DEFAULT_SPLIT_RATIO, InsertPosition, Layout, LayoutNode, MAX_SPLIT_RATIO,
    MIN_SPLIT_RATIO, NavDirection, PaneId, SplitDirection, SplitId, SplitInfo, SplitNode,
    SplitRenderInfo, TabId,
};
pub use persist::{
    STATE_VERSION, SaveDebouncer, StateError, WorkspaceState, default_state_path, repair,
    repair_on_disk,
};
pub use session::{SessionBackend, SessionError, SessionEvent, SessionResult, SessionState};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, field_names,
    get_tracing_config, init_tracing, is_tracing_initialized, span_names,
};
pub use workspace::{
    Arrangement, DEFAULT_ARRANGEMENT_NAME, Pane, PaneLifetime, PaneResidency, Tab, WorkspaceStore,
};
