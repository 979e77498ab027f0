//! Workspace state persistence
//!
//! This module provides the versioned, human-diffable JSON snapshot of the
//! workspace (panes, tabs with their arrangements, tab ordering, active
//! tab) and the file I/O around it.
//!
//! Loading is tolerant where it can be: a missing file is "no state", an
//! individual pane record in an unrecognized legacy shape is dropped with
//! a warning rather than failing the whole load, and every structural
//! inconsistency that survives decoding is healed by the [`repair`] pass
//! before the state reaches the store. Only real I/O and document-level
//! parse failures surface as errors.

mod debounce;
mod repair;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::TabId;
use crate::workspace::{Pane, Tab};

pub use debounce::SaveDebouncer;
pub use repair::{repair, repair_on_disk};

/// Current version of the persisted workspace state format.
pub const STATE_VERSION: u32 = 1;

/// Persisted workspace state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceState {
    /// Format version for forward compatibility.
    pub version: u32,
    /// When the state was saved.
    pub saved_at: DateTime<Utc>,
    /// All pane records.
    pub panes: Vec<Pane>,
    /// All tabs in display order, each with its arrangements.
    pub tabs: Vec<Tab>,
    /// The tab that was in front.
    pub active_tab_id: Option<TabId>,
}

/// Wire shape used for decoding: pane records are held as raw JSON so a
/// single unrecognized record can be dropped without rejecting the file.
#[derive(Debug, Deserialize)]
struct RawWorkspaceState {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    saved_at: DateTime<Utc>,
    #[serde(default)]
    panes: Vec<serde_json::Value>,
    #[serde(default)]
    tabs: Vec<Tab>,
    #[serde(default)]
    active_tab_id: Option<TabId>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl WorkspaceState {
    /// Creates a state snapshot at the current version.
    #[must_use]
    pub fn new(panes: Vec<Pane>, tabs: Vec<Tab>, active_tab_id: Option<TabId>) -> Self {
        Self {
            version: STATE_VERSION,
            saved_at: Utc::now(),
            panes,
            tabs,
            active_tab_id,
        }
    }

    /// Serializes the state to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a state document from JSON.
    ///
    /// Pane records that fail to decode (legacy shapes without the current
    /// field layout) are dropped as "not restorable" with a warning; they
    /// never fail the load.
    ///
    /// # Errors
    /// Returns an error if the document itself cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawWorkspaceState = serde_json::from_str(json)?;

        let mut panes = Vec::with_capacity(raw.panes.len());
        for value in raw.panes {
            match serde_json::from_value::<Pane>(value) {
                Ok(pane) => panes.push(pane),
                Err(e) => {
                    tracing::warn!(%e, "Dropping pane record that is not restorable");
                }
            }
        }

        Ok(Self {
            version: raw.version,
            saved_at: raw.saved_at,
            panes,
            tabs: raw.tabs,
            active_tab_id: raw.active_tab_id,
        })
    }

    /// Saves the state to a file, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn save_to_file(&self, path: &Path) -> Result<(), StateError> {
        let json = self.to_json().map_err(StateError::Serialization)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StateError::Io)?;
        }

        std::fs::write(path, json).map_err(StateError::Io)
    }

    /// Loads a state from a file.
    ///
    /// A file that does not exist yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error if reading or parsing fails, or if the file was
    /// written by a newer version of the format.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>, StateError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path).map_err(StateError::Io)?;
        let state = Self::from_json(&json).map_err(StateError::Deserialization)?;
        if state.version > STATE_VERSION {
            return Err(StateError::VersionMismatch {
                expected: STATE_VERSION,
                actual: state.version,
            });
        }
        Ok(Some(state))
    }

    /// Returns the number of persisted panes.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Updates the saved_at timestamp.
    pub fn touch(&mut self) {
        self.saved_at = Utc::now();
    }
}

/// Default on-disk location of the workspace state.
#[must_use]
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("rustdeck").join("workspace.json"))
}

/// Errors that can occur at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// The file was written by a newer format version
    #[error("Incompatible state version: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Highest version this build understands
        expected: u32,
        /// Version found in the file
        actual: u32,
    },
}
