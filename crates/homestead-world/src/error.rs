//! Error types for the `homestead-world` crate.
//!
//! Gameplay operations (harvest, death, spoilage sweeps) never fail: they
//! report soft failures through `0`, `None`, or `false`. [`WorldError`]
//! covers the setup paths -- loading a definition catalog and inserting
//! placements into the map.

use homestead_types::{DefinitionId, PlacementId};

/// Errors that can occur while building or loading world state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A placement with the same id already exists in the map.
    #[error("duplicate placement id: {0}")]
    DuplicatePlacement(PlacementId),

    /// A placement references a definition the registry does not know.
    #[error("unknown definition: {0}")]
    UnknownDefinition(DefinitionId),

    /// Two definitions in a catalog share an id.
    #[error("duplicate definition id: {0}")]
    DuplicateDefinition(DefinitionId),

    /// Failed to read a catalog file from disk.
    #[error("failed to read definition catalog: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse a catalog document.
    #[error("failed to parse definition catalog: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
