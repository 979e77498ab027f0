//! Core type definitions for the layout engine
//!
//! This module contains the fundamental identifier types and enums used
//! throughout the layout and arrangement system.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pane within a layout.
///
/// Each pane has a unique ID that persists throughout its lifetime,
/// even as the tree structure around it changes. IDs are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub Uuid);

impl PaneId {
    /// Creates a new random pane ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pane({})", self.0)
    }
}

/// Unique identifier for a split node within a layout tree.
///
/// Split IDs survive resize and equalize operations, so a divider dragged
/// in the rendering layer can address the same split across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitId(pub Uuid);

impl SplitId {
    /// Creates a new random split ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SplitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split({})", self.0)
    }
}

/// Unique identifier for a tab.
///
/// Each tab in the workspace has a unique ID that identifies it and its
/// associated arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Unique identifier for an arrangement.
///
/// An arrangement is a named alternate view over a tab's panes. Every tab
/// owns at least one (the default arrangement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrangementId(pub Uuid);

impl ArrangementId {
    /// Creates a new random arrangement ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArrangementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArrangementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arrangement({})", self.0)
    }
}

/// Split direction for dividing panes.
///
/// When a pane is split, it is divided into two children arranged either
/// horizontally (left/right) or vertically (top/bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Split along the horizontal axis, creating left and right panes.
    Horizontal,
    /// Split along the vertical axis, creating top and bottom panes.
    Vertical,
}

impl SplitDirection {
    /// Returns the other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "Horizontal"),
            Self::Vertical => write!(f, "Vertical"),
        }
    }
}

/// Where a newly inserted pane lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    /// New pane becomes the first child (left/top of the target).
    Before,
    /// New pane becomes the second child (right/bottom of the target).
    After,
}

/// Directional navigation between panes.
///
/// Left/right queries walk horizontal splits; up/down queries walk
/// vertical splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// Toward the left neighbor.
    Left,
    /// Toward the right neighbor.
    Right,
    /// Toward the neighbor above.
    Up,
    /// Toward the neighbor below.
    Down,
}

impl NavDirection {
    /// Returns the split axis this navigation direction travels along.
    #[must_use]
    pub const fn axis(self) -> SplitDirection {
        match self {
            Self::Left | Self::Right => SplitDirection::Horizontal,
            Self::Up | Self::Down => SplitDirection::Vertical,
        }
    }

    /// Returns true if this direction moves toward the first child of a split.
    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}
