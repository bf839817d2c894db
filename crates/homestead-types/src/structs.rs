//! Core entity structs: definitions, placements, and the yield ledger records.
//!
//! Definitions are immutable templates loaded once per session. Placements
//! are instances positioned in the world and owned by the placement map.
//! [`YieldState`] and [`PlacementYieldState`] are owned exclusively by the
//! yield state store.
//!
//! All structs serialize in camelCase so they match the documents the
//! browser client reads and writes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PlacementType, Season, SpoilageRate};
use crate::ids::{DefinitionId, PlacementId};

// ---------------------------------------------------------------------------
// Yield rules
// ---------------------------------------------------------------------------

/// A renewable yield a living plant or animal produces each season cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AliveYield {
    /// The resource definition produced.
    pub resource_id: DefinitionId,
    /// Maximum units producible per season cycle.
    pub amount: u32,
    /// Seasons in which this yield is active.
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Verb shown on the interaction prompt (`"harvest"`, `"milk"`, ...).
    #[serde(default = "default_interaction_type")]
    pub interaction_type: String,
    /// Drop the uncollected remainder as ground loot at season end.
    /// When `false` the remainder is lost.
    #[serde(default)]
    pub shedding: bool,
    /// The animal must be fed before this yield can be taken.
    #[serde(default)]
    pub requires_fed: bool,
}

impl AliveYield {
    /// Whether this yield is active during `season`.
    pub fn is_active_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

fn default_interaction_type() -> String {
    "harvest".to_owned()
}

/// A one-time drop spawned when a plant or animal dies or is felled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DeadYield {
    /// The resource definition dropped.
    pub resource_id: DefinitionId,
    /// Number of individual ground resources spawned.
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Growth timing for a plant definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GrowthProfile {
    /// Final growth stage (fully grown).
    pub max_stage: u32,
    /// Growing days per stage. `None` uses the configured default.
    #[serde(default)]
    pub days_per_stage: Option<u32>,
}

/// Immutable template for a plant or animal species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CreatureDefinition {
    /// Definition identifier.
    pub id: DefinitionId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Finer category, e.g. `"tree"` or `"bush"` for plants.
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Renewable seasonal yields.
    #[serde(default)]
    pub alive_yields: Vec<AliveYield>,
    /// One-time drops on death.
    #[serde(default)]
    pub dead_yields: Vec<DeadYield>,
    /// Growth timing; `None` for species that do not grow in stages.
    #[serde(default)]
    pub growth: Option<GrowthProfile>,
}

/// Immutable template for a ground resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ResourceDefinition {
    /// Definition identifier.
    pub id: DefinitionId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Spoilage category once the resource lies on the ground.
    #[serde(default)]
    pub spoilage_rate: SpoilageRate,
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

/// A plant positioned in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantPlacement {
    /// Placement identifier.
    pub id: PlacementId,
    /// Species definition.
    pub definition_id: DefinitionId,
    /// Pixel x coordinate.
    pub x: i32,
    /// Pixel y coordinate.
    pub y: i32,
    /// Day index when the plant was placed.
    #[serde(default)]
    pub placed_at_day: u32,
    /// Current growth stage.
    #[serde(default)]
    pub growth_stage: u32,
    /// Days of growth accrued (dormant days excluded).
    #[serde(default)]
    pub growth_days: u32,
}

/// An animal positioned in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnimalPlacement {
    /// Placement identifier.
    pub id: PlacementId,
    /// Species definition.
    pub definition_id: DefinitionId,
    /// Pixel x coordinate.
    pub x: i32,
    /// Pixel y coordinate.
    pub y: i32,
    /// Day index when the animal was placed.
    #[serde(default)]
    pub placed_at_day: u32,
    /// Day index of the most recent feeding.
    #[serde(default)]
    pub last_fed_day: Option<u32>,
}

/// A ground item lying in the world.
///
/// `placed_at_day` anchors the spoilage clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ResourcePlacement {
    /// Placement identifier.
    pub id: PlacementId,
    /// Resource definition.
    pub definition_id: DefinitionId,
    /// Pixel x coordinate.
    pub x: i32,
    /// Pixel y coordinate.
    pub y: i32,
    /// Day index at creation.
    pub placed_at_day: u32,
    /// The placement that produced this resource, if any.
    #[serde(default)]
    pub source_id: Option<PlacementId>,
}

// ---------------------------------------------------------------------------
// Yield ledger
// ---------------------------------------------------------------------------

/// Runtime harvest state of one yield slot of one placement.
///
/// Invariants: `remaining <= total`, and `remaining > 0` implies
/// `is_available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct YieldState {
    /// Index into the definition's `alive_yields`.
    pub yield_index: usize,
    /// Units harvestable right now.
    pub remaining: u32,
    /// Ceiling `remaining` is reset to at season start.
    pub total: u32,
    /// Whether the current season is one of this slot's seasons.
    pub is_available: bool,
    /// Day index of the most recent harvest or refill.
    pub last_harvest_day: Option<u32>,
}

/// All yield slots of a single placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlacementYieldState {
    /// Whether the owner is a plant or an animal.
    pub placement_type: PlacementType,
    /// One entry per alive-yield rule, in definition order.
    pub yields: Vec<YieldState>,
}

impl PlacementYieldState {
    /// Look up the slot for `yield_index`.
    pub fn slot(&self, yield_index: usize) -> Option<&YieldState> {
        self.yields.iter().find(|y| y.yield_index == yield_index)
    }

    /// Whether any slot is available with units remaining.
    pub fn has_available(&self) -> bool {
        self.yields.iter().any(|y| y.is_available && y.remaining > 0)
    }
}

// ---------------------------------------------------------------------------
// Gameplay results
// ---------------------------------------------------------------------------

/// Resource granted to the player by a successful harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HarvestedYield {
    /// The resource produced.
    pub resource_id: DefinitionId,
    /// Units actually taken (already clamped to what was available).
    pub amount: u32,
}

/// One action the interaction prompt may offer for a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct InteractionOption {
    /// Yield slot the action targets.
    pub yield_index: usize,
    /// Verb to display.
    pub interaction_type: String,
    /// Resource the action produces.
    pub resource_id: DefinitionId,
    /// Units currently available.
    pub remaining: u32,
}
