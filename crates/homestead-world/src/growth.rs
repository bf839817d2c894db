//! Growth-stage timer for placed plants.
//!
//! Each day change, every plant whose definition has a [`GrowthProfile`]
//! accrues one growth day, unless the current season is dormant. Plants
//! in an exempt sub-category (trees by default) keep growing through
//! dormant seasons. The visible stage is derived from the accrued days and
//! capped at the profile's maximum.

use homestead_types::{GrowthProfile, Season};
use tracing::{debug, warn};

use crate::definitions::DefinitionRegistry;
use crate::placements::PlacementMap;
use crate::time::Clock;

/// Default number of growth days per stage.
pub const DEFAULT_DAYS_PER_STAGE: u32 = 3;

/// Tuning for the growth timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthSettings {
    /// Days per stage for profiles that do not set their own.
    pub days_per_stage_default: u32,
    /// Seasons in which plants stop growing.
    pub dormant_seasons: Vec<Season>,
    /// Sub-categories that ignore dormancy.
    pub dormancy_exempt_sub_categories: Vec<String>,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            days_per_stage_default: DEFAULT_DAYS_PER_STAGE,
            dormant_seasons: vec![Season::Winter],
            dormancy_exempt_sub_categories: vec!["tree".to_owned()],
        }
    }
}

impl GrowthSettings {
    /// Whether a plant with `sub_category` grows in `season`.
    pub fn grows_in(&self, season: Season, sub_category: Option<&str>) -> bool {
        if !self.dormant_seasons.contains(&season) {
            return true;
        }
        sub_category.is_some_and(|sub| {
            self.dormancy_exempt_sub_categories
                .iter()
                .any(|exempt| exempt == sub)
        })
    }

    /// Stage reached after `growth_days` under `profile`.
    ///
    /// A zero days-per-stage profile is fully grown immediately.
    pub fn stage_for(&self, profile: GrowthProfile, growth_days: u32) -> u32 {
        let per_stage = profile
            .days_per_stage
            .unwrap_or(self.days_per_stage_default);
        growth_days
            .checked_div(per_stage)
            .unwrap_or(profile.max_stage)
            .min(profile.max_stage)
    }
}

/// Advances plant growth once per day change.
pub struct GrowthSystem<'a> {
    clock: &'a dyn Clock,
    registry: &'a dyn DefinitionRegistry,
    placements: &'a mut dyn PlacementMap,
    settings: &'a GrowthSettings,
}

impl<'a> GrowthSystem<'a> {
    /// Bind the timer to its collaborators.
    pub fn new(
        clock: &'a dyn Clock,
        registry: &'a dyn DefinitionRegistry,
        placements: &'a mut dyn PlacementMap,
        settings: &'a GrowthSettings,
    ) -> Self {
        Self {
            clock,
            registry,
            placements,
            settings,
        }
    }

    /// Accrue one growth day for every eligible plant. Returns how many
    /// plants moved to a new stage.
    pub fn advance_growth(&mut self) -> usize {
        let season = self.clock.current_season();
        let mut advanced = 0_usize;

        for plant in self.placements.plants_mut() {
            let Some(def) = self.registry.find_plant(&plant.definition_id) else {
                warn!(
                    placement_id = %plant.id,
                    definition_id = %plant.definition_id,
                    "growth: definition not found, skipping"
                );
                continue;
            };
            let Some(profile) = def.growth else {
                continue;
            };
            if plant.growth_stage >= profile.max_stage {
                continue;
            }
            if !self.settings.grows_in(season, def.sub_category.as_deref()) {
                continue;
            }

            plant.growth_days = plant.growth_days.saturating_add(1);
            let stage = self.settings.stage_for(profile, plant.growth_days);
            if stage != plant.growth_stage {
                plant.growth_stage = stage;
                advanced = advanced.saturating_add(1);
                debug!(placement_id = %plant.id, stage, "plant advanced growth stage");
            }
        }
        advanced
    }
}
