//! Save and load of the yield ledger.
//!
//! The placement map is saved with the rest of the scene; the yield ledger
//! is the one piece of core state persisted on its own. The ledger is
//! written as an ordered list of `[placementId, PlacementYieldState]`
//! pairs so it round-trips through plain JSON arrays.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use homestead_world::YieldStateStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur when saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Failed to read or write the snapshot file.
    #[error("snapshot I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to encode or decode the snapshot.
    #[error("snapshot JSON failed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot was written by an unsupported format version.
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
    },
}

/// Persisted yield ledger plus the day it was taken on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSnapshot {
    /// Format version.
    pub version: u32,
    /// Day index at save time.
    pub day: u32,
    /// The ledger, serialized as an association list.
    pub yields: YieldStateStore,
}

impl YieldSnapshot {
    /// Capture `yields` as of `day`.
    pub fn new(day: u32, yields: YieldStateStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            day,
            yields,
        }
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] on malformed input, or
    /// [`PersistError::UnsupportedVersion`] for a newer format.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Write the snapshot to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), placements = self.yields.len(), "yield snapshot saved");
        Ok(())
    }

    /// Read a snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if reading or decoding fails.
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
