//! Shared type definitions for the Homestead yield and spoilage engine.
//!
//! This crate is the single source of truth for all types used across the
//! Homestead workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for placement and definition ids
//! - [`enums`] -- Seasons, placement kinds, spoilage categories
//! - [`structs`] -- Definitions, placements, yield ledger records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{PlacementType, Season, SpoilageRate};
pub use ids::{DefinitionId, PlacementId};
pub use structs::{
    AliveYield, AnimalPlacement, CreatureDefinition, DeadYield, GrowthProfile, HarvestedYield,
    InteractionOption, PlacementYieldState, PlantPlacement, ResourceDefinition,
    ResourcePlacement, YieldState,
};
