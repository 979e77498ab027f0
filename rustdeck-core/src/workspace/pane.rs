//! Pane records owned by the workspace store
//!
//! A pane is a single content-bearing unit placed in layouts (terminal,
//! web view, code view). Its content and rendering live entirely outside
//! this crate; the store only tracks identity, lifetime, residency, the
//! owning worktree, and drawer children.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::PaneId;

/// Whether a pane survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneLifetime {
    /// Persisted and restored across restarts.
    #[default]
    Persistent,
    /// Dropped from the persisted state; never restored.
    Ephemeral,
}

/// Where a pane currently lives relative to the visible workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaneResidency {
    /// Placed in a tab and participating in layouts.
    #[default]
    Active,
    /// Removed but recoverable until the expiry passes.
    PendingUndo {
        /// When the undo window closes.
        expires_at: DateTime<Utc>,
    },
    /// Detached from every layout but kept alive in the background.
    Backgrounded,
}

/// A pane record.
///
/// Panes are owned exclusively by the workspace store; layouts and
/// arrangements refer to them by ID only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    /// Stable unique identifier, never reused.
    pub id: PaneId,
    /// Display title.
    pub title: String,
    /// Persistence policy.
    #[serde(default)]
    pub lifetime: PaneLifetime,
    /// Current residency state.
    #[serde(default)]
    pub residency: PaneResidency,
    /// Worktree or repository directory this pane belongs to, if any.
    /// Panes whose worktree disappears are dropped during restore repair.
    #[serde(default)]
    pub worktree: Option<PathBuf>,
    /// Drawer children owned by this pane. They are removed together with
    /// their parent and never appear in a layout of their own.
    #[serde(default)]
    pub drawer: Vec<PaneId>,
}

impl Pane {
    /// Creates a new persistent, active pane with a fresh ID.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: PaneId::new(),
            title: title.into(),
            lifetime: PaneLifetime::Persistent,
            residency: PaneResidency::Active,
            worktree: None,
            drawer: Vec::new(),
        }
    }

    /// Sets the pane's lifetime.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: PaneLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the owning worktree directory.
    #[must_use]
    pub fn with_worktree(mut self, worktree: impl Into<PathBuf>) -> Self {
        self.worktree = Some(worktree.into());
        self
    }

    /// Returns true if the pane is persisted across restarts.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        matches!(self.lifetime, PaneLifetime::Persistent)
    }

    /// Returns true if the pane is pending undo and the window has closed.
    #[must_use]
    pub fn undo_expired(&self, now: DateTime<Utc>) -> bool {
        match self.residency {
            PaneResidency::PendingUndo { expires_at } => now >= expires_at,
            _ => false,
        }
    }
}
