//! Enumeration types shared by the yield, spoilage, and growth engines.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// A season in the farm's annual cycle.
///
/// Alive yields are only harvestable in the seasons their definition lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Season {
    /// First season of the year.
    Spring,
    /// Second season of the year.
    Summer,
    /// Third season of the year; most fruit trees yield here.
    Autumn,
    /// Last season of the year; most plants are dormant.
    Winter,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Lowercase name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Parse a season name. Accepts `"fall"` as an alias for autumn.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" | "fall" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }
}

impl core::fmt::Display for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Placement kinds
// ---------------------------------------------------------------------------

/// The kind of living placement a yield ledger entry belongs to.
///
/// Also used as the "creature type" when dispatching a death to the right
/// placement collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PlacementType {
    /// A planted crop, bush, or tree.
    Plant,
    /// A farm animal.
    Animal,
}

impl core::fmt::Display for PlacementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Plant => f.write_str("plant"),
            Self::Animal => f.write_str("animal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Spoilage
// ---------------------------------------------------------------------------

/// How quickly a ground resource spoils once placed in the world.
///
/// Each category maps to a day threshold in the spoilage configuration,
/// except [`SpoilageRate::Never`], which has no threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SpoilageRate {
    /// Perishable produce (berries, milk, meat).
    Fast,
    /// Typical produce (fruit, vegetables).
    Medium,
    /// Durable goods (hides, wool, seeds).
    Slow,
    /// Never spoils (stone, wood, ore).
    #[default]
    Never,
}
