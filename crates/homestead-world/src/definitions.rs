//! Definition registry: the immutable-per-session catalog of plant, animal,
//! and resource templates.
//!
//! The engines depend only on the [`DefinitionRegistry`] trait. The
//! in-memory [`DefinitionCatalog`] implementation is loaded from the same
//! JSON document shape the cloud store serves:
//!
//! ```json
//! { "plants": [...], "animals": [...], "resources": [...] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use homestead_types::{
    AliveYield, CreatureDefinition, DeadYield, DefinitionId, PlacementType, ResourceDefinition,
};

use crate::error::WorldError;

/// Read-only lookup of definitions by id.
pub trait DefinitionRegistry {
    /// Find a plant species.
    fn find_plant(&self, id: &DefinitionId) -> Option<&CreatureDefinition>;

    /// Find an animal species.
    fn find_animal(&self, id: &DefinitionId) -> Option<&CreatureDefinition>;

    /// Find a ground resource.
    fn find_resource(&self, id: &DefinitionId) -> Option<&ResourceDefinition>;

    /// Find a plant or animal species, dispatching on `placement_type`.
    fn find_creature(
        &self,
        placement_type: PlacementType,
        id: &DefinitionId,
    ) -> Option<&CreatureDefinition> {
        match placement_type {
            PlacementType::Plant => self.find_plant(id),
            PlacementType::Animal => self.find_animal(id),
        }
    }

    /// Alive-yield rules for a species, or an empty slice if unknown.
    fn alive_yields(&self, placement_type: PlacementType, id: &DefinitionId) -> &[AliveYield] {
        self.find_creature(placement_type, id)
            .map(|def| def.alive_yields.as_slice())
            .unwrap_or_default()
    }

    /// Dead-yield rules for a species, or an empty slice if unknown.
    fn dead_yields(&self, placement_type: PlacementType, id: &DefinitionId) -> &[DeadYield] {
        self.find_creature(placement_type, id)
            .map(|def| def.dead_yields.as_slice())
            .unwrap_or_default()
    }
}

/// Raw catalog document as stored.
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    plants: Vec<CreatureDefinition>,
    #[serde(default)]
    animals: Vec<CreatureDefinition>,
    #[serde(default)]
    resources: Vec<ResourceDefinition>,
}

/// In-memory definition catalog keyed by definition id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionCatalog {
    plants: BTreeMap<DefinitionId, CreatureDefinition>,
    animals: BTreeMap<DefinitionId, CreatureDefinition>,
    resources: BTreeMap<DefinitionId, ResourceDefinition>,
}

impl DefinitionCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            plants: BTreeMap::new(),
            animals: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Parse a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Json`] on malformed input or
    /// [`WorldError::DuplicateDefinition`] if an id repeats within a
    /// category.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for plant in doc.plants {
            catalog.add_plant(plant)?;
        }
        for animal in doc.animals {
            catalog.add_animal(animal)?;
        }
        for resource in doc.resources {
            catalog.add_resource(resource)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, WorldError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Register a plant species.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateDefinition`] if the id is taken.
    pub fn add_plant(&mut self, def: CreatureDefinition) -> Result<(), WorldError> {
        insert_unique(&mut self.plants, def.id.clone(), def)
    }

    /// Register an animal species.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateDefinition`] if the id is taken.
    pub fn add_animal(&mut self, def: CreatureDefinition) -> Result<(), WorldError> {
        insert_unique(&mut self.animals, def.id.clone(), def)
    }

    /// Register a ground resource.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateDefinition`] if the id is taken.
    pub fn add_resource(&mut self, def: ResourceDefinition) -> Result<(), WorldError> {
        insert_unique(&mut self.resources, def.id.clone(), def)
    }

    /// Number of plant, animal, and resource definitions.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.plants.len(), self.animals.len(), self.resources.len())
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<DefinitionId, T>,
    id: DefinitionId,
    value: T,
) -> Result<(), WorldError> {
    if map.contains_key(&id) {
        return Err(WorldError::DuplicateDefinition(id));
    }
    map.insert(id, value);
    Ok(())
}

impl DefinitionRegistry for DefinitionCatalog {
    fn find_plant(&self, id: &DefinitionId) -> Option<&CreatureDefinition> {
        self.plants.get(id)
    }

    fn find_animal(&self, id: &DefinitionId) -> Option<&CreatureDefinition> {
        self.animals.get(id)
    }

    fn find_resource(&self, id: &DefinitionId) -> Option<&ResourceDefinition> {
        self.resources.get(id)
    }
}
