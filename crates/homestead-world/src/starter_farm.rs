//! Built-in definition catalog and starting farm layout.
//!
//! Used when no catalog document is supplied, and by the headless
//! simulator. Three plant species, three animal species, and the ground
//! resources they produce, laid out on a small farmstead around the
//! origin.

use homestead_types::{
    AliveYield, AnimalPlacement, CreatureDefinition, DeadYield, DefinitionId, GrowthProfile,
    PlacementId, PlantPlacement, ResourceDefinition, Season, SpoilageRate,
};

use crate::definitions::DefinitionCatalog;
use crate::error::WorldError;

/// Helper to build an [`AliveYield`].
fn alive(
    resource: &str,
    amount: u32,
    seasons: &[Season],
    interaction: &str,
    shedding: bool,
    requires_fed: bool,
) -> AliveYield {
    AliveYield {
        resource_id: DefinitionId::from(resource),
        amount,
        seasons: seasons.to_vec(),
        interaction_type: interaction.to_owned(),
        shedding,
        requires_fed,
    }
}

/// Helper to build a [`DeadYield`].
fn dead(resource: &str, quantity: u32) -> DeadYield {
    DeadYield {
        resource_id: DefinitionId::from(resource),
        quantity,
    }
}

/// Helper to build a [`ResourceDefinition`].
fn resource(id: &str, name: &str, spoilage_rate: SpoilageRate) -> ResourceDefinition {
    ResourceDefinition {
        id: DefinitionId::from(id),
        name: name.to_owned(),
        spoilage_rate,
    }
}

fn plants() -> Vec<CreatureDefinition> {
    vec![
        CreatureDefinition {
            id: DefinitionId::from("apple_tree"),
            name: "Apple Tree".to_owned(),
            sub_category: Some("tree".to_owned()),
            alive_yields: vec![alive("apple", 5, &[Season::Autumn], "harvest", true, false)],
            dead_yields: vec![dead("wood", 4)],
            growth: Some(GrowthProfile {
                max_stage: 3,
                days_per_stage: Some(7),
            }),
        },
        CreatureDefinition {
            id: DefinitionId::from("wheat"),
            name: "Wheat".to_owned(),
            sub_category: Some("crop".to_owned()),
            alive_yields: vec![alive("grain", 3, &[Season::Summer], "harvest", false, false)],
            dead_yields: vec![dead("straw", 1)],
            growth: Some(GrowthProfile {
                max_stage: 3,
                days_per_stage: None,
            }),
        },
        CreatureDefinition {
            id: DefinitionId::from("berry_bush"),
            name: "Berry Bush".to_owned(),
            sub_category: Some("bush".to_owned()),
            alive_yields: vec![alive(
                "berries",
                4,
                &[Season::Spring, Season::Summer],
                "pick",
                true,
                false,
            )],
            dead_yields: vec![dead("wood", 1)],
            growth: Some(GrowthProfile {
                max_stage: 2,
                days_per_stage: Some(5),
            }),
        },
    ]
}

fn animals() -> Vec<CreatureDefinition> {
    vec![
        CreatureDefinition {
            id: DefinitionId::from("cow"),
            name: "Cow".to_owned(),
            sub_category: None,
            alive_yields: vec![alive("milk", 2, &Season::ALL, "milk", false, true)],
            dead_yields: vec![dead("hide", 2), dead("meat", 4)],
            growth: None,
        },
        CreatureDefinition {
            id: DefinitionId::from("chicken"),
            name: "Chicken".to_owned(),
            sub_category: None,
            alive_yields: vec![alive(
                "egg",
                1,
                &[Season::Spring, Season::Summer, Season::Autumn],
                "collect",
                false,
                true,
            )],
            dead_yields: vec![dead("feather", 2), dead("meat", 1)],
            growth: None,
        },
        CreatureDefinition {
            id: DefinitionId::from("sheep"),
            name: "Sheep".to_owned(),
            sub_category: None,
            alive_yields: vec![alive("wool", 3, &[Season::Spring], "shear", true, false)],
            dead_yields: vec![dead("hide", 1), dead("meat", 3)],
            growth: None,
        },
    ]
}

fn resources() -> Vec<ResourceDefinition> {
    vec![
        resource("apple", "Apple", SpoilageRate::Medium),
        resource("grain", "Grain", SpoilageRate::Slow),
        resource("berries", "Berries", SpoilageRate::Fast),
        resource("milk", "Milk", SpoilageRate::Fast),
        resource("egg", "Egg", SpoilageRate::Medium),
        resource("wool", "Wool", SpoilageRate::Never),
        resource("hide", "Hide", SpoilageRate::Slow),
        resource("meat", "Meat", SpoilageRate::Fast),
        resource("feather", "Feather", SpoilageRate::Never),
        resource("wood", "Wood", SpoilageRate::Never),
        resource("straw", "Straw", SpoilageRate::Slow),
    ]
}

/// The built-in definition catalog.
///
/// # Errors
///
/// Returns [`WorldError::DuplicateDefinition`] if the built-in tables
/// repeat an id.
pub fn starter_catalog() -> Result<DefinitionCatalog, WorldError> {
    let mut catalog = DefinitionCatalog::new();
    for def in plants() {
        catalog.add_plant(def)?;
    }
    for def in animals() {
        catalog.add_animal(def)?;
    }
    for def in resources() {
        catalog.add_resource(def)?;
    }
    Ok(catalog)
}

/// Plants and animals of the starting farm, not yet placed.
#[derive(Debug, Clone, Default)]
pub struct StarterFarm {
    /// Orchard, field, and hedge.
    pub plants: Vec<PlantPlacement>,
    /// Barnyard livestock.
    pub animals: Vec<AnimalPlacement>,
}

fn plant_at(id: &str, def: &str, x: i32, y: i32, day: u32) -> PlantPlacement {
    PlantPlacement {
        id: PlacementId::from(id),
        definition_id: DefinitionId::from(def),
        x,
        y,
        placed_at_day: day,
        growth_stage: 0,
        growth_days: 0,
    }
}

fn animal_at(id: &str, def: &str, x: i32, y: i32, day: u32) -> AnimalPlacement {
    AnimalPlacement {
        id: PlacementId::from(id),
        definition_id: DefinitionId::from(def),
        x,
        y,
        placed_at_day: day,
        last_fed_day: None,
    }
}

/// Lay out the starting farm, stamping every placement with `day`.
pub fn starter_farm(day: u32) -> StarterFarm {
    StarterFarm {
        plants: vec![
            plant_at("plant-1", "apple_tree", 40, 70, day),
            plant_at("plant-2", "apple_tree", 104, 70, day),
            plant_at("plant-3", "wheat", 200, 40, day),
            plant_at("plant-4", "wheat", 232, 40, day),
            plant_at("plant-5", "berry_bush", 10, 150, day),
        ],
        animals: vec![
            animal_at("animal-1", "cow", 300, 200, day),
            animal_at("animal-2", "chicken", 340, 210, day),
            animal_at("animal-3", "sheep", 380, 190, day),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::DefinitionRegistry;

    #[test]
    fn starter_catalog_builds() {
        let catalog = starter_catalog();
        assert!(catalog.is_ok());
        let catalog = catalog.unwrap_or_default();
        assert_eq!(catalog.counts(), (3, 3, 11));
    }

    #[test]
    fn every_yield_names_a_known_resource() {
        let catalog = starter_catalog().unwrap_or_default();
        for def in plants().iter().chain(animals().iter()) {
            for rule in &def.alive_yields {
                assert!(catalog.find_resource(&rule.resource_id).is_some(), "{}", rule.resource_id);
            }
            for rule in &def.dead_yields {
                assert!(catalog.find_resource(&rule.resource_id).is_some(), "{}", rule.resource_id);
            }
        }
    }

    #[test]
    fn farm_placements_resolve() {
        let catalog = starter_catalog().unwrap_or_default();
        let farm = starter_farm(0);
        assert!(farm.plants.iter().all(|p| catalog.find_plant(&p.definition_id).is_some()));
        assert!(farm.animals.iter().all(|a| catalog.find_animal(&a.definition_id).is_some()));
    }
}
