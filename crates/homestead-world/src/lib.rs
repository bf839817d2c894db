//! Seasonal yield and spoilage lifecycle for the Homestead farm.
//!
//! This crate governs how placed plants and animals produce harvestable
//! resources over time, how those yields expire or shed at season
//! boundaries, how dead entities drop loot, and how ground resources spoil
//! and disappear.
//!
//! The engines never reach into global state. Each one borrows its
//! collaborators for the duration of a call: a [`Clock`], a
//! [`DefinitionRegistry`], a [`PlacementMap`], and (for the yield engines)
//! the [`YieldStateStore`].
//!
//! # Modules
//!
//! - [`definitions`] -- Registry trait and the JSON-backed catalog.
//! - [`placements`] -- Placement map trait and the in-memory map.
//! - [`yield_state`] -- Per-placement yield ledger.
//! - [`lifecycle`] -- Season transitions and harvest transactions.
//! - [`dead_yield`] -- Death loot and de-registration.
//! - [`spoilage`] -- Expiry thresholds and the daily sweep.
//! - [`growth`] -- Growth-stage timer for plants.
//! - [`shed`] -- Drop position arithmetic.
//! - [`starter_farm`] -- Built-in catalog and starting layout.
//! - [`time`] -- Read-only clock seam.
//! - [`error`] -- Error types for setup paths.

pub mod dead_yield;
pub mod definitions;
pub mod error;
pub mod growth;
pub mod lifecycle;
pub mod placements;
pub mod shed;
pub mod spoilage;
pub mod starter_farm;
pub mod time;
pub mod yield_state;

// Re-export primary types at crate root.
pub use dead_yield::DeadYieldEngine;
pub use definitions::{DefinitionCatalog, DefinitionRegistry};
pub use error::WorldError;
pub use growth::{GrowthSettings, GrowthSystem};
pub use lifecycle::{SeasonEndReport, SeasonTransition, YieldLifecycle, interaction_options};
pub use placements::{NewResource, PlacementMap, WorldPlacements};
pub use shed::shed_position;
pub use spoilage::{
    SpoilageSweep, SpoilageThresholds, is_resource_expired, remaining_days, spoilage_progress,
};
pub use starter_farm::{StarterFarm, starter_catalog, starter_farm};
pub use time::{Clock, ClockReading};
pub use yield_state::{YieldSource, YieldStateStore};
