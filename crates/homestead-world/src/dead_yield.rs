//! Dead yield engine: converts a plant or animal death into ground loot.
//!
//! A death (chop-down completed, butcher action, harvest to completion)
//! spawns every dead-yield rule of the species as individual ground
//! resources at the shed position, then removes the entity from the
//! placement map and its entry from the yield ledger. There is no undo;
//! callers invoke this only after the gameplay layer has confirmed the
//! death.

use homestead_types::{PlacementId, PlacementType};
use tracing::{info, warn};

use crate::definitions::DefinitionRegistry;
use crate::placements::{NewResource, PlacementMap};
use crate::shed::shed_position;
use crate::time::Clock;
use crate::yield_state::YieldStateStore;

/// Converts deaths into ground loot and de-registers the entity.
pub struct DeadYieldEngine<'a> {
    clock: &'a dyn Clock,
    registry: &'a dyn DefinitionRegistry,
    placements: &'a mut dyn PlacementMap,
    store: &'a mut YieldStateStore,
    tile_size: u32,
}

impl<'a> DeadYieldEngine<'a> {
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

    /// Process the death of `placement_id`.
    ///
    /// Returns `false` with no side effects if no placement of
    /// `creature_type` has that id. Otherwise spawns the loot, removes the
    /// placement and its ledger entry, and returns `true`. A species missing
    /// from the registry drops nothing but is still removed.
    pub fn trigger_dead_yield(
        &mut self,
        placement_id: &PlacementId,
        creature_type: PlacementType,
    ) -> bool {
        let Some((def_id, x, y)) = self.placements.locate(creature_type, placement_id) else {
            return false;
        };

        let (shed_x, shed_y) = shed_position(x, y, self.tile_size);
        let current_day = self.clock.current_day();

        let mut batch = Vec::new();
        match self.registry.find_creature(creature_type, &def_id) {
            Some(def) => {
                for rule in &def.dead_yields {
                    let unit = NewResource {
                        definition_id: rule.resource_id.clone(),
                        x: shed_x,
                        y: shed_y,
                        placed_at_day: current_day,
                        source_id: Some(placement_id.clone()),
                    };
                    batch.extend(unit.units(rule.quantity));
                }
            }
            None => warn!(
                placement_id = %placement_id,
                definition_id = %def_id,
                "dead yield: definition not found, removing without loot"
            ),
        }

        let dropped = if batch.is_empty() {
            0
        } else {
            self.placements.add_resources(batch).len()
        };
        self.placements.remove_creature(creature_type, placement_id);
        self.store.remove_placement(placement_id);

        info!(
            placement_id = %placement_id,
            creature_type = %creature_type,
            dropped,
            "dead yield triggered"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use homestead_types::{
        AliveYield, AnimalPlacement, CreatureDefinition, DeadYield, DefinitionId, Season,
    };

    use super::*;
    use crate::definitions::DefinitionCatalog;
    use crate::placements::WorldPlacements;
    use crate::time::ClockReading;

    fn goat() -> CreatureDefinition {
        CreatureDefinition {
            id: DefinitionId::from("goat"),
            name: "Goat".to_owned(),
            sub_category: None,
            alive_yields: vec![AliveYield {
                resource_id: DefinitionId::from("goat_milk"),
                amount: 1,
                seasons: Season::ALL.to_vec(),
                interaction_type: "milk".to_owned(),
                shedding: false,
                requires_fed: true,
            }],
            dead_yields: vec![
                DeadYield {
                    resource_id: DefinitionId::from("hide"),
                    quantity: 2,
                },
                DeadYield {
                    resource_id: DefinitionId::from("meat"),
                    quantity: 3,
                },
            ],
            growth: None,
        }
    }

    fn animal(id: &str, def: &str) -> AnimalPlacement {
        AnimalPlacement {
            id: PlacementId::from(id),
            definition_id: DefinitionId::from(def),
            x: 70,
            y: 10,
            placed_at_day: 0,
            last_fed_day: None,
        }
    }

    fn setup() -> (DefinitionCatalog, WorldPlacements, YieldStateStore) {
        let mut catalog = DefinitionCatalog::new();
        assert!(catalog.add_animal(goat()).is_ok());
        let mut map = WorldPlacements::new();
        assert!(map.add_animal(animal("animal-7", "goat")).is_ok());
        let mut store = YieldStateStore::new();
        store.init_yield_state(
            &PlacementId::from("animal-7"),
            PlacementType::Animal,
            &goat().alive_yields,
            Season::Spring,
        );
        (catalog, map, store)
    }

    #[test]
    fn death_spawns_each_unit_and_deregisters() {
        let (catalog, mut map, mut store) = setup();
        let clock = ClockReading::new(17, Season::Spring);
        let id = PlacementId::from("animal-7");

        let mut engine = DeadYieldEngine::new(&clock, &catalog, &mut map, &mut store, 32);
        assert!(engine.trigger_dead_yield(&id, PlacementType::Animal));
        assert!(!engine.trigger_dead_yield(&id, PlacementType::Animal));

        assert_eq!(map.resources().len(), 5);
        let hides = map
            .resources()
            .iter()
            .filter(|r| r.definition_id.as_str() == "hide")
            .count();
        assert_eq!(hides, 2);
        assert!(map.resources().iter().all(|r| (r.x, r.y) == (88, 24)));
        assert!(map.resources().iter().all(|r| r.placed_at_day == 17));
        assert!(map.animal(&id).is_none());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn wrong_creature_type_is_not_found() {
        let (catalog, mut map, mut store) = setup();
        let clock = ClockReading::new(3, Season::Spring);
        let id = PlacementId::from("animal-7");

        let mut engine = DeadYieldEngine::new(&clock, &catalog, &mut map, &mut store, 32);
        assert!(!engine.trigger_dead_yield(&id, PlacementType::Plant));
        assert!(map.animal(&id).is_some());
        assert!(map.resources().is_empty());
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn missing_definition_removes_without_loot() {
        let (catalog, mut map, mut store) = setup();
        assert!(map.add_animal(animal("animal-8", "extinct")).is_ok());
        let clock = ClockReading::new(3, Season::Spring);
        let id = PlacementId::from("animal-8");

        let mut engine = DeadYieldEngine::new(&clock, &catalog, &mut map, &mut store, 32);
        assert!(engine.trigger_dead_yield(&id, PlacementType::Animal));
        assert!(map.animal(&id).is_none());
        assert!(map.resources().is_empty());
    }
}
