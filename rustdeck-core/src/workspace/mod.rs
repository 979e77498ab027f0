//! Workspace model module
//!
//! This module provides the mutable aggregate that owns all panes and tabs
//! and the types it is built from.
//!
//! # Architecture
//!
//! - **Tab-scoped arrangements**: each tab owns one or more named
//!   arrangements over its panes, exactly one of them the default
//! - **Single mutable owner**: only [`WorkspaceStore`] edits layouts and
//!   arrangements; every cascading consequence of a mutation (membership
//!   resync, focus/zoom repair, empty-tab deletion) happens inside the
//!   store as explicit loops, never through observers
//! - **No-op discipline**: stale or unknown ids leave state unchanged
//!
//! # Module Structure
//!
//! - `pane` - Pane records (`Pane`, `PaneLifetime`, `PaneResidency`)
//! - `arrangement` - Named layouts (`Arrangement`)
//! - `tab` - The tab aggregate (`Tab`)
//! - `store` - The owning store (`WorkspaceStore`)

mod arrangement;
mod pane;
mod store;
mod tab;

pub use arrangement::{Arrangement, DEFAULT_ARRANGEMENT_NAME};
pub use pane::{Pane, PaneLifetime, PaneResidency};
pub use store::WorkspaceStore;
pub use tab::Tab;
