//! Placement map: the plants, animals, and ground resources currently in
//! the world.
//!
//! The engines mutate the map only through the [`PlacementMap`] trait's
//! add/remove operations and never hold references into it across calls.
//! [`WorldPlacements`] is the in-memory implementation. It owns a
//! monotonic counter for newly created ground resources so shed and death
//! drops never collide with existing ids.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use homestead_types::{
    AnimalPlacement, DefinitionId, PlacementId, PlacementType, PlantPlacement, ResourcePlacement,
};

use crate::error::WorldError;

/// Prefix for generated ground-resource ids.
pub const RESOURCE_ID_PREFIX: &str = "resource";

/// A ground resource waiting to be added to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    /// Resource definition.
    pub definition_id: DefinitionId,
    /// Pixel x coordinate.
    pub x: i32,
    /// Pixel y coordinate.
    pub y: i32,
    /// Day index stamped as the spoilage anchor.
    pub placed_at_day: u32,
    /// The placement that produced it.
    pub source_id: Option<PlacementId>,
}

impl NewResource {
    /// `count` identical units of the same resource at one position.
    pub fn units(&self, count: u32) -> impl Iterator<Item = Self> + '_ {
        (0..count).map(move |_| self.clone())
    }
}

/// Mutable collection of currently placed plants, animals, and resources.
pub trait PlacementMap {
    /// All placed plants, in placement order.
    fn plants(&self) -> &[PlantPlacement];

    /// All placed animals, in placement order.
    fn animals(&self) -> &[AnimalPlacement];

    /// All ground resources, in placement order.
    fn resources(&self) -> &[ResourcePlacement];

    /// Mutable access to plants for the growth timer.
    fn plants_mut(&mut self) -> &mut [PlantPlacement];

    /// Add a batch of ground resources in one mutation. Returns the ids
    /// assigned, in input order.
    fn add_resources(&mut self, batch: Vec<NewResource>) -> Vec<PlacementId>;

    /// Remove a plant. Returns `false` if it was not present.
    fn remove_plant(&mut self, id: &PlacementId) -> bool;

    /// Remove an animal. Returns `false` if it was not present.
    fn remove_animal(&mut self, id: &PlacementId) -> bool;

    /// Remove every ground resource whose id is in `ids`. Returns how many
    /// were removed.
    fn remove_resources(&mut self, ids: &BTreeSet<PlacementId>) -> usize;

    /// Add a single ground resource.
    fn add_resource(
        &mut self,
        definition_id: DefinitionId,
        x: i32,
        y: i32,
        placed_at_day: u32,
        source_id: Option<PlacementId>,
    ) -> Option<PlacementId> {
        self.add_resources(vec![NewResource {
            definition_id,
            x,
            y,
            placed_at_day,
            source_id,
        }])
        .into_iter()
        .next()
    }

    /// Remove a single ground resource.
    fn remove_resource(&mut self, id: &PlacementId) -> bool {
        let ids = BTreeSet::from([id.clone()]);
        self.remove_resources(&ids) > 0
    }

    /// Look up a plant by id.
    fn plant(&self, id: &PlacementId) -> Option<&PlantPlacement> {
        self.plants().iter().find(|p| &p.id == id)
    }

    /// Look up an animal by id.
    fn animal(&self, id: &PlacementId) -> Option<&AnimalPlacement> {
        self.animals().iter().find(|a| &a.id == id)
    }

    /// Definition id and position of a living placement of the given type.
    fn locate(
        &self,
        placement_type: PlacementType,
        id: &PlacementId,
    ) -> Option<(DefinitionId, i32, i32)> {
        match placement_type {
            PlacementType::Plant => self
                .plant(id)
                .map(|p| (p.definition_id.clone(), p.x, p.y)),
            PlacementType::Animal => self
                .animal(id)
                .map(|a| (a.definition_id.clone(), a.x, a.y)),
        }
    }

    /// Remove a living placement, dispatching on its type.
    fn remove_creature(&mut self, placement_type: PlacementType, id: &PlacementId) -> bool {
        match placement_type {
            PlacementType::Plant => self.remove_plant(id),
            PlacementType::Animal => self.remove_animal(id),
        }
    }
}

/// In-memory placement map.
///
/// Serializable so the session can snapshot it alongside the yield ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldPlacements {
    plants: Vec<PlantPlacement>,
    animals: Vec<AnimalPlacement>,
    resources: Vec<ResourcePlacement>,
    /// Next numeric suffix for generated resource ids.
    next_resource_id: u64,
}

impl WorldPlacements {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            plants: Vec::new(),
            animals: Vec::new(),
            resources: Vec::new(),
            next_resource_id: 1,
        }
    }

    /// Place a plant.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicatePlacement`] if any placement already
    /// uses the id.
    pub fn add_plant(&mut self, plant: PlantPlacement) -> Result<(), WorldError> {
        self.ensure_unused(&plant.id)?;
        self.plants.push(plant);
        Ok(())
    }

    /// Place an animal.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicatePlacement`] if any placement already
    /// uses the id.
    pub fn add_animal(&mut self, animal: AnimalPlacement) -> Result<(), WorldError> {
        self.ensure_unused(&animal.id)?;
        self.animals.push(animal);
        Ok(())
    }

    /// Mutable access to one animal.
    pub fn animal_mut(&mut self, id: &PlacementId) -> Option<&mut AnimalPlacement> {
        self.animals.iter_mut().find(|a| &a.id == id)
    }

    /// The id the next generated resource will receive.
    pub const fn next_resource_id(&self) -> u64 {
        self.next_resource_id
    }

    /// Total number of placements of every kind.
    pub fn len(&self) -> usize {
        self.plants
            .len()
            .saturating_add(self.animals.len())
            .saturating_add(self.resources.len())
    }

    /// Whether the map holds no placements at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: &PlacementId) -> bool {
        self.plants.iter().any(|p| &p.id == id)
            || self.animals.iter().any(|a| &a.id == id)
            || self.resources.iter().any(|r| &r.id == id)
    }

    fn ensure_unused(&self, id: &PlacementId) -> Result<(), WorldError> {
        if self.contains(id) {
            return Err(WorldError::DuplicatePlacement(id.clone()));
        }
        Ok(())
    }

    /// Every id currently in use.
    fn taken_ids(&self) -> BTreeSet<&PlacementId> {
        self.plants
            .iter()
            .map(|p| &p.id)
            .chain(self.animals.iter().map(|a| &a.id))
            .chain(self.resources.iter().map(|r| &r.id))
            .collect()
    }
}

/// Allocate the next free resource id from `counter`, skipping any id in
/// `taken`.
fn allocate_resource_id(counter: &mut u64, taken: &BTreeSet<&PlacementId>) -> PlacementId {
    loop {
        let id = PlacementId::new(format!("{RESOURCE_ID_PREFIX}-{counter}"));
        *counter = counter.saturating_add(1);
        if !taken.contains(&id) {
            return id;
        }
    }
}

impl Default for WorldPlacements {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementMap for WorldPlacements {
    fn plants(&self) -> &[PlantPlacement] {
        &self.plants
    }

    fn animals(&self) -> &[AnimalPlacement] {
        &self.animals
    }

    fn resources(&self) -> &[ResourcePlacement] {
        &self.resources
    }

    fn plants_mut(&mut self) -> &mut [PlantPlacement] {
        &mut self.plants
    }

    fn add_resources(&mut self, batch: Vec<NewResource>) -> Vec<PlacementId> {
        if batch.is_empty() {
            return Vec::new();
        }
        let mut ids = Vec::with_capacity(batch.len());
        let mut created = Vec::with_capacity(batch.len());
        let mut counter = self.next_resource_id;
        let taken = self.taken_ids();
        for item in batch {
            let id = allocate_resource_id(&mut counter, &taken);
            ids.push(id.clone());
            created.push(ResourcePlacement {
                id,
                definition_id: item.definition_id,
                x: item.x,
                y: item.y,
                placed_at_day: item.placed_at_day,
                source_id: item.source_id,
            });
        }
        self.next_resource_id = counter;
        self.resources.extend(created);
        ids
    }

    fn remove_plant(&mut self, id: &PlacementId) -> bool {
        let before = self.plants.len();
        self.plants.retain(|p| &p.id != id);
        self.plants.len() != before
    }

    fn remove_animal(&mut self, id: &PlacementId) -> bool {
        let before = self.animals.len();
        self.animals.retain(|a| &a.id != id);
        self.animals.len() != before
    }

    fn remove_resources(&mut self, ids: &BTreeSet<PlacementId>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before = self.resources.len();
        self.resources.retain(|r| !ids.contains(&r.id));
        before.saturating_sub(self.resources.len())
    }
}
