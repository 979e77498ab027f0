//! Layout engine module
//!
//! This module provides the binary split-tree model used to arrange panes
//! inside a tab, together with the derived rendering computation for
//! minimized panes.
//!
//! # Architecture
//!
//! - **Value-type trees**: every structural edit returns a new [`Layout`];
//!   nothing is mutated in place, so any number of readers can walk a
//!   layout concurrently and two layout values never alias
//! - **Total operations**: unknown pane/split ids and empty layouts are
//!   no-ops, never errors
//! - **Derived rendering state**: [`SplitRenderInfo`] is recomputed from
//!   `(layout, minimized set)` on demand and never stored
//!
//! # Module Structure
//!
//! - `types` - Identifier types and enums (`PaneId`, `SplitId`, `TabId`,
//!   `ArrangementId`, `SplitDirection`, `InsertPosition`, `NavDirection`)
//! - `tree` - The split tree itself (`Layout`, `LayoutNode`, `SplitNode`)
//! - `render` - Minimize-aware ratio computation (`SplitRenderInfo`)
//!
//! # Example
//!
//! ```
//! use rustdeck_core::layout::{InsertPosition, Layout, PaneId, SplitDirection};
//!
//! let a = PaneId::new();
//! let b = PaneId::new();
//!
//! let layout = Layout::leaf(a)
//!     .inserting(b, a, SplitDirection::Horizontal, InsertPosition::After);
//!
//! assert!(layout.is_split());
//! assert_eq!(layout.pane_ids(), vec![a, b]);
//! ```

mod render;
mod tree;
mod types;

pub use render::{SplitInfo, SplitRenderInfo};
pub use tree::{
    DEFAULT_SPLIT_RATIO, Layout, LayoutNode, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO, SplitNode,
};
pub use types::{
    ArrangementId, InsertPosition, NavDirection, PaneId, SplitDirection, SplitId, TabId,
};
