//! Headless simulator for the Homestead farm.
//!
//! Wires the session to a definition catalog and the starting farm layout,
//! installs the yield, spoilage, and growth hooks, then walks the calendar
//! day by day while a scripted farmer feeds and harvests.
//!
//! # Usage
//!
//! ```text
//! homestead-sim [DAYS] [CATALOG_JSON]
//! ```
//!
//! `DAYS` defaults to one full year. Without a catalog path the built-in
//! starter catalog is used.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `homestead-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the definition catalog
//! 4. Create the session and place the starter farm
//! 5. Install the engine hooks
//! 6. Run the calendar, then fell and butcher a few creatures
//! 7. Log a summary and tear the hooks down

mod error;

use std::collections::BTreeMap;
use std::path::Path;

use homestead_core::{GameConfig, GameSession};
use homestead_types::{PlacementId, PlacementType};
use homestead_world::{DefinitionCatalog, PlacementMap, starter_catalog, starter_farm};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::SimError;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "homestead-config.yaml";

/// The farmer walks the fields this often.
const HARVEST_INTERVAL_DAYS: u32 = 3;

/// Creatures culled after the calendar run: a tree for timber and the
/// sheep for meat.
const CULLS: [(&str, PlacementType); 2] = [
    ("plant-2", PlacementType::Plant),
    ("animal-3", PlacementType::Animal),
];

/// Simulator entry point.
///
/// # Errors
///
/// Returns an error if configuration, catalog loading, or the session fails.
fn main() -> Result<(), SimError> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("homestead-sim starting");

    let mut args = std::env::args().skip(1);
    let days = match args.next() {
        Some(arg) => parse_days(&arg)?,
        None => config.time.days_per_season.saturating_mul(4),
    };
    let catalog = match args.next() {
        Some(path) => DefinitionCatalog::from_file(Path::new(&path))?,
        None => starter_catalog()?,
    };
    let (plants, animals, resources) = catalog.counts();
    info!(plants, animals, resources, "Definition catalog loaded");

    let mut session = GameSession::new(&config, catalog)?;
    let farm = starter_farm(session.day());
    for plant in farm.plants {
        session.place_plant(plant)?;
    }
    for animal in farm.animals {
        session.place_animal(animal)?;
    }
    info!(
        day = session.day(),
        season = %session.season(),
        placements = session.world().placements.len(),
        "Starter farm placed"
    );

    let _hooks = [
        session.init_yield_system(),
        session.init_spoilage_system(),
        session.init_growth_system(),
    ];

    let mut harvested: BTreeMap<String, u32> = BTreeMap::new();
    for _ in 0..days {
        let step = session.advance_day()?;
        if let Some(change) = step.season_change {
            info!(
                day = step.day,
                ended = %change.ended,
                started = %change.started,
                ground_resources = session.world().placements.resources().len(),
                "Season changed"
            );
        }
        feed_animals(&mut session);
        if step.day.checked_rem(HARVEST_INTERVAL_DAYS) == Some(0) {
            harvest_everything(&mut session, &mut harvested);
        }
    }

    for (id, placement_type) in CULLS {
        let id = PlacementId::from(id);
        let removed = session.trigger_dead_yield(&id, placement_type);
        info!(placement = %id, removed, "Culled");
    }

    log_summary(&session, &harvested);

    let removed = session.shutdown();
    info!(hooks_removed = removed, "homestead-sim shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults.
fn load_config() -> Result<GameConfig, SimError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(GameConfig::from_file(config_path)?)
    } else {
        Ok(GameConfig::parse("")?)
    }
}

fn parse_days(arg: &str) -> Result<u32, SimError> {
    arg.parse().map_err(|e| SimError::Args {
        arg: arg.to_owned(),
        reason: format!("{e}"),
    })
}

/// Feed every living animal for today.
fn feed_animals(session: &mut GameSession) {
    let ids: Vec<PlacementId> = session
        .world()
        .placements
        .animals()
        .iter()
        .map(|a| a.id.clone())
        .collect();
    for id in &ids {
        session.feed_animal(id);
    }
}

/// Take every unit currently offered by every plant and animal.
fn harvest_everything(session: &mut GameSession, harvested: &mut BTreeMap<String, u32>) {
    let placements = &session.world().placements;
    let ids: Vec<PlacementId> = placements
        .plants()
        .iter()
        .map(|p| p.id.clone())
        .chain(placements.animals().iter().map(|a| a.id.clone()))
        .collect();

    for id in &ids {
        for option in session.interaction_options(id) {
            let Some(taken) = session.harvest_yield(id, option.yield_index, option.remaining)
            else {
                continue;
            };
            debug!(
                placement = %id,
                action = %option.interaction_type,
                resource = %taken.resource_id,
                amount = taken.amount,
                "Harvested"
            );
            let total = harvested
                .entry(taken.resource_id.as_str().to_owned())
                .or_insert(0);
            *total = total.saturating_add(taken.amount);
        }
    }
}

fn log_summary(session: &GameSession, harvested: &BTreeMap<String, u32>) {
    let world = session.world();
    let mut on_ground: BTreeMap<&str, usize> = BTreeMap::new();
    for resource in world.placements.resources() {
        let count = on_ground.entry(resource.definition_id.as_str()).or_insert(0);
        *count = count.saturating_add(1);
    }

    info!(
        day = session.day(),
        season = %session.season(),
        plants = world.placements.plants().len(),
        animals = world.placements.animals().len(),
        ground_resources = world.placements.resources().len(),
        "Simulation finished"
    );
    for (resource, amount) in harvested {
        info!(resource = %resource, amount, "Harvest total");
    }
    for (resource, count) in on_ground {
        info!(resource = %resource, count, "Left on the ground");
    }
}
