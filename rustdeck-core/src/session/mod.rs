//! Session backend boundary
//!
//! Panes display live content (a terminal process, a web view) driven by a
//! pluggable backend that lives outside this crate. This module defines
//! the boundary: the async [`SessionBackend`] trait implemented by hosts,
//! the [`SessionEvent`]s they report back, and the per-pane
//! [`SessionState`] the store tracks.
//!
//! Backend operations are asynchronous and may be cancelled or fail
//! independently per pane. They can also complete *after* the owning pane
//! has been removed from the workspace; the store treats such late events
//! as no-ops, never as errors.

use async_trait::async_trait;

use crate::layout::PaneId;

/// State of a pane's backing session as last reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The backend is bringing the session up.
    Starting,
    /// The session is live.
    Running,
    /// The session ended on its own or was terminated.
    Exited,
    /// The backend failed to start or lost the session.
    Failed,
}

/// Event reported by a session backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session came up for a pane.
    Started {
        /// The pane whose session started.
        pane_id: PaneId,
    },
    /// A session ended.
    Exited {
        /// The pane whose session ended.
        pane_id: PaneId,
        /// Process exit status, when the backend has one.
        status: i32,
    },
    /// A session failed.
    Failed {
        /// The pane whose session failed.
        pane_id: PaneId,
        /// Human-readable failure description.
        reason: String,
    },
}

impl SessionEvent {
    /// Returns the pane this event concerns.
    #[must_use]
    pub const fn pane_id(&self) -> PaneId {
        match self {
            Self::Started { pane_id }
            | Self::Exited { pane_id, .. }
            | Self::Failed { pane_id, .. } => *pane_id,
        }
    }
}

/// Errors reported by a session backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend could not start a session.
    #[error("failed to start session for {pane_id}: {reason}")]
    StartFailed {
        /// The pane the start was requested for.
        pane_id: PaneId,
        /// Backend-provided description.
        reason: String,
    },

    /// The backend could not terminate a session.
    #[error("failed to terminate session for {pane_id}: {reason}")]
    TerminateFailed {
        /// The pane the termination was requested for.
        pane_id: PaneId,
        /// Backend-provided description.
        reason: String,
    },

    /// The operation was cancelled before it completed.
    #[error("session operation cancelled for {pane_id}")]
    Cancelled {
        /// The pane the cancelled operation targeted.
        pane_id: PaneId,
    },
}

/// Result type for session backend operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// The pluggable terminal-session backend.
///
/// Implemented by the host application; consumed by whatever drives
/// workspace restore and pane lifecycle. The store itself never calls the
/// backend; it only receives [`SessionEvent`]s and tolerates events for
/// panes it no longer owns.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Starts a fresh session for a pane.
    async fn start(&self, pane_id: PaneId) -> SessionResult<()>;

    /// Restores a previously persisted session for a pane.
    async fn restore(&self, pane_id: PaneId) -> SessionResult<()>;

    /// Terminates a pane's session.
    async fn terminate(&self, pane_id: PaneId) -> SessionResult<()>;
}
