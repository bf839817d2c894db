//! Yield lifecycle engine: season transitions and the harvest transaction.
//!
//! On a season change the engine first settles the ending season
//! ([`YieldLifecycle::process_season_end`]) and only then re-initializes
//! every ledger entry for the new season
//! ([`YieldLifecycle::initialize_yields_for_season`]). Settling reads the
//! `remaining` values that re-initialization overwrites, so the order is
//! fixed inside [`YieldLifecycle::transition_season`].
//!
//! Uncollected yield from a `shedding` rule drops to the ground as
//! individual resources at the source's shed position. Yield from a
//! non-shedding rule is lost without any world effect.
//!
//! Gameplay takes yield only through [`YieldLifecycle::harvest_yield`].

use homestead_types::{
    AliveYield, DefinitionId, HarvestedYield, InteractionOption, PlacementId, PlacementType,
    Season,
};
use tracing::{debug, info, warn};

use crate::definitions::DefinitionRegistry;
use crate::placements::{NewResource, PlacementMap};
use crate::shed::shed_position;
use crate::time::Clock;
use crate::yield_state::{YieldSource, YieldStateStore};

/// Outcome of settling the ending season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonEndReport {
    /// Ground resources spawned by shedding rules.
    pub shed_ids: Vec<PlacementId>,
    /// Units discarded by non-shedding rules.
    pub lost_units: u32,
}

/// Outcome of a full season transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTransition {
    /// The season that ended.
    pub ended: Season,
    /// The season that began.
    pub started: Season,
    /// Shedding and loss from the ending season.
    pub season_end: SeasonEndReport,
    /// Placements re-initialized for the new season.
    pub initialized: usize,
}

/// Drives the yield ledger through season transitions and harvests.
///
/// Borrows its collaborators for the duration of one operation; nothing is
/// cached between calls.
pub struct YieldLifecycle<'a> {
    clock: &'a dyn Clock,
    registry: &'a dyn DefinitionRegistry,
    placements: &'a mut dyn PlacementMap,
    store: &'a mut YieldStateStore,
    tile_size: u32,
}

impl<'a> YieldLifecycle<'a> {
    /// Bind the engine to its collaborators.
    pub fn new(
        clock: &'a dyn Clock,
        registry: &'a dyn DefinitionRegistry,
        placements: &'a mut dyn PlacementMap,
        store: &'a mut YieldStateStore,
        tile_size: u32,
    ) -> Self {
        Self {
            clock,
            registry,
            placements,
            store,
            tile_size,
        }
    }

    /// Initialize the ledger entry of every plant and animal whose species
    /// has alive-yield rules. Returns how many placements were initialized.
    ///
    /// Placements whose definition is missing are skipped.
    pub fn initialize_yields_for_season(&mut self, season: Season) -> usize {
        let registry = self.registry;
        let placements: &dyn PlacementMap = &*self.placements;

        let plants = placements
            .plants()
            .iter()
            .map(|p| (&p.id, PlacementType::Plant, &p.definition_id));
        let animals = placements
            .animals()
            .iter()
            .map(|a| (&a.id, PlacementType::Animal, &a.definition_id));

        let sources = plants.chain(animals).filter_map(|(id, placement_type, def_id)| {
            let Some(def) = registry.find_creature(placement_type, def_id) else {
                warn!(
                    placement_id = %id,
                    definition_id = %def_id,
                    "skipping yield init: definition not found"
                );
                return None;
            };
            if def.alive_yields.is_empty() {
                return None;
            }
            Some(YieldSource {
                placement_id: id,
                placement_type,
                alive_yields: &def.alive_yields,
            })
        });

        let count = self.store.reset_for_season(sources, season);
        debug!(season = %season, placements = count, "yields initialized for season");
        count
    }

    /// Settle uncollected yield at the end of `ending_season`.
    ///
    /// Every available slot with units left either sheds those units as
    /// ground resources (one placement per unit, stamped with the current
    /// day and the source id) or loses them. All shed resources are added
    /// to the map in a single batch.
    pub fn process_season_end(&mut self, ending_season: Season) -> SeasonEndReport {
        let current_day = self.clock.current_day();
        let mut batch: Vec<NewResource> = Vec::new();
        let mut lost_units: u32 = 0;

        let plants = self
            .placements
            .plants()
            .iter()
            .map(|p| (&p.id, PlacementType::Plant, &p.definition_id, p.x, p.y));
        let animals = self
            .placements
            .animals()
            .iter()
            .map(|a| (&a.id, PlacementType::Animal, &a.definition_id, a.x, a.y));

        for (id, placement_type, def_id, x, y) in plants.chain(animals) {
            let Some(state) = self.store.get(id) else {
                continue;
            };
            if !state.has_available() {
                continue;
            }
            let Some(def) = self.registry.find_creature(placement_type, def_id) else {
                warn!(
                    placement_id = %id,
                    definition_id = %def_id,
                    "skipping season end: definition not found"
                );
                continue;
            };

            let (shed_x, shed_y) = shed_position(x, y, self.tile_size);
            for slot in state.yields.iter().filter(|s| s.is_available && s.remaining > 0) {
                let Some(rule) = def.alive_yields.get(slot.yield_index) else {
                    continue;
                };
                if rule.shedding {
                    let unit = NewResource {
                        definition_id: rule.resource_id.clone(),
                        x: shed_x,
                        y: shed_y,
                        placed_at_day: current_day,
                        source_id: Some(id.clone()),
                    };
                    batch.extend(unit.units(slot.remaining));
                } else {
                    lost_units = lost_units.saturating_add(slot.remaining);
                }
            }
        }

        let shed_ids = if batch.is_empty() {
            Vec::new()
        } else {
            self.placements.add_resources(batch)
        };

        info!(
            season = %ending_season,
            day = current_day,
            shed = shed_ids.len(),
            lost = lost_units,
            "season ended"
        );

        SeasonEndReport {
            shed_ids,
            lost_units,
        }
    }

    /// Settle `ended` and then initialize `started`, in that order.
    pub fn transition_season(&mut self, ended: Season, started: Season) -> SeasonTransition {
        let season_end = self.process_season_end(ended);
        let initialized = self.initialize_yields_for_season(started);
        SeasonTransition {
            ended,
            started,
            season_end,
            initialized,
        }
    }

    /// Take up to `amount` units from one yield slot of a placement.
    ///
    /// Returns `None` when the placement, its definition, or the slot
    /// cannot be resolved, or when nothing was available. Requests larger
    /// than what remains are clamped.
    pub fn harvest_yield(
        &mut self,
        placement_id: &PlacementId,
        yield_index: usize,
        amount: u32,
    ) -> Option<HarvestedYield> {
        let placement_type = self.store.get(placement_id)?.placement_type;
        let (def_id, _, _) = self.placements.locate(placement_type, placement_id)?;
        let rule = resolve_rule(self.registry, placement_type, &def_id, yield_index)?;
        let resource_id = rule.resource_id.clone();

        let taken = self.store.harvest_yield(
            placement_id,
            yield_index,
            amount,
            self.clock.current_day(),
        );
        if taken == 0 {
            return None;
        }

        debug!(
            placement_id = %placement_id,
            yield_index,
            resource_id = %resource_id,
            amount = taken,
            "yield harvested"
        );
        Some(HarvestedYield {
            resource_id,
            amount: taken,
        })
    }
}

fn resolve_rule<'r>(
    registry: &'r dyn DefinitionRegistry,
    placement_type: PlacementType,
    def_id: &DefinitionId,
    yield_index: usize,
) -> Option<&'r AliveYield> {
    registry
        .find_creature(placement_type, def_id)?
        .alive_yields
        .get(yield_index)
}

/// Actions the interaction prompt should offer for a placement.
///
/// Lists every in-season slot with units left. Slots whose rule requires
/// feeding are hidden unless `is_fed`. An empty list means no prompt.
pub fn interaction_options(
    registry: &dyn DefinitionRegistry,
    placements: &dyn PlacementMap,
    store: &YieldStateStore,
    placement_id: &PlacementId,
    is_fed: bool,
) -> Vec<InteractionOption> {
    let Some(state) = store.get(placement_id) else {
        return Vec::new();
    };
    let Some((def_id, _, _)) = placements.locate(state.placement_type, placement_id) else {
        return Vec::new();
    };

    state
        .yields
        .iter()
        .filter(|slot| slot.is_available && slot.remaining > 0)
        .filter_map(|slot| {
            let rule = resolve_rule(registry, state.placement_type, &def_id, slot.yield_index)?;
            if rule.requires_fed && !is_fed {
                return None;
            }
            Some(InteractionOption {
                yield_index: slot.yield_index,
                interaction_type: rule.interaction_type.clone(),
                resource_id: rule.resource_id.clone(),
                remaining: slot.remaining,
            })
        })
        .collect()
}
