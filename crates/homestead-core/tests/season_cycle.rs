//! Integration tests driving a full session through the calendar.
//!
//! These run the engines only through the public session API: hooks are
//! installed, days are advanced, and gameplay calls are made the way the
//! client would make them.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use homestead_core::{GameConfig, GameSession, Subscription, YieldSnapshot};
use homestead_types::{
    AnimalPlacement, DefinitionId, PlacementId, PlacementType, PlantPlacement, Season,
};
use homestead_world::{DefinitionCatalog, PlacementMap};

const CATALOG: &str = r#"{
  "plants": [
    {
      "id": "plum_tree",
      "name": "Plum Tree",
      "subCategory": "tree",
      "aliveYields": [
        { "resourceId": "plum", "amount": 4, "seasons": ["summer"], "shedding": true }
      ],
      "deadYields": [{ "resourceId": "log", "quantity": 2 }],
      "growth": { "maxStage": 2, "daysPerStage": 1 }
    }
  ],
  "animals": [
    {
      "id": "goat",
      "name": "Goat",
      "aliveYields": [
        {
          "resourceId": "goat_milk",
          "amount": 1,
          "seasons": ["spring", "summer", "autumn", "winter"],
          "interactionType": "milk",
          "requiresFed": true
        }
      ],
      "deadYields": [
        { "resourceId": "hide", "quantity": 2 },
        { "resourceId": "meat", "quantity": 3 }
      ]
    }
  ],
  "resources": [
    { "id": "plum", "name": "Plum", "spoilageRate": "fast" },
    { "id": "log", "name": "Log", "spoilageRate": "never" },
    { "id": "goat_milk", "name": "Goat Milk", "spoilageRate": "fast" },
    { "id": "hide", "name": "Hide", "spoilageRate": "slow" },
    { "id": "meat", "name": "Meat", "spoilageRate": "medium" }
  ]
}"#;

const CONFIG: &str = r"
time:
  days_per_season: 5
  seasons: [spring, summer, fall, winter]
world:
  tile_size: 32
spoilage:
  fast: 3
  medium: 10
  slow: 40
";

struct Game {
    session: GameSession,
    hooks: Vec<Subscription>,
}

fn start() -> Game {
    let config = GameConfig::parse(CONFIG).unwrap();
    let catalog = DefinitionCatalog::from_json(CATALOG).unwrap();
    let mut session = GameSession::new(&config, catalog).unwrap();

    session
        .place_plant(PlantPlacement {
            id: PlacementId::from("plant-1"),
            definition_id: DefinitionId::from("plum_tree"),
            x: 40,
            y: 70,
            placed_at_day: 0,
            growth_stage: 0,
            growth_days: 0,
        })
        .unwrap();
    session
        .place_animal(AnimalPlacement {
            id: PlacementId::from("animal-7"),
            definition_id: DefinitionId::from("goat"),
            x: 70,
            y: 10,
            placed_at_day: 0,
            last_fed_day: None,
        })
        .unwrap();

    let hooks = vec![
        session.init_yield_system(),
        session.init_spoilage_system(),
        session.init_growth_system(),
    ];
    Game { session, hooks }
}

fn count(session: &GameSession, def: &str) -> usize {
    session
        .world()
        .placements
        .resources()
        .iter()
        .filter(|r| r.definition_id.as_str() == def)
        .count()
}

fn advance(session: &mut GameSession, days: u32) {
    for _ in 0..days {
        session.advance_day().unwrap();
    }
}

#[test]
fn summer_plums_shed_into_autumn_and_spoil() {
    let mut game = start();
    let tree = PlacementId::from("plant-1");
    assert_eq!(game.session.season(), Season::Spring);
    assert!(!game.session.has_available_yield(&tree));

    advance(&mut game.session, 5);
    assert_eq!(game.session.season(), Season::Summer);
    let picked = game.session.harvest_yield(&tree, 0, 1).unwrap();
    assert_eq!(picked.resource_id.as_str(), "plum");
    assert_eq!(picked.amount, 1);

    // Over-harvest clamps to what is left.
    let rest = game.session.harvest_yield(&tree, 0, 10).unwrap();
    assert_eq!(rest.amount, 3);
    assert!(game.session.harvest_yield(&tree, 0, 1).is_none());

    // Nothing left to shed at the end of summer.
    advance(&mut game.session, 5);
    assert_eq!(game.session.season(), Season::Autumn);
    assert_eq!(count(&game.session, "plum"), 0);

    // Next summer the tree refills; leave it alone this time.
    advance(&mut game.session, 15);
    assert_eq!(game.session.season(), Season::Summer);
    assert_eq!(
        game.session
            .get_placement_yields(&tree)
            .map(|s| s.yields[0].remaining),
        Some(4)
    );
    advance(&mut game.session, 5);
    assert_eq!(count(&game.session, "plum"), 4);
    let shed = game
        .session
        .world()
        .placements
        .resources()
        .iter()
        .find(|r| r.definition_id.as_str() == "plum")
        .map(|r| (r.x, r.y, r.placed_at_day, r.source_id.clone()));
    assert_eq!(shed, Some((56, 88, 30, Some(tree.clone()))));

    advance(&mut game.session, 2);
    assert_eq!(count(&game.session, "plum"), 4);
    advance(&mut game.session, 1);
    assert_eq!(count(&game.session, "plum"), 0);
}

#[test]
fn goat_milk_needs_feeding_and_butchering_drops_five() {
    let mut game = start();
    let goat = PlacementId::from("animal-7");

    assert!(game.session.interaction_options(&goat).is_empty());
    assert!(game.session.feed_animal(&goat));
    let options = game.session.interaction_options(&goat);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].resource_id.as_str(), "goat_milk");

    assert!(game.session.trigger_dead_yield(&goat, PlacementType::Animal));
    assert!(!game.session.trigger_dead_yield(&goat, PlacementType::Animal));
    assert_eq!(game.session.world().placements.resources().len(), 5);
    assert!(game.session.world().placements.animal(&goat).is_none());
    assert!(game.session.get_placement_yields(&goat).is_none());

    let meat = game
        .session
        .world()
        .placements
        .resources()
        .iter()
        .find(|r| r.definition_id.as_str() == "meat")
        .map(|r| r.id.clone())
        .unwrap();
    advance(&mut game.session, 9);
    assert_eq!(count(&game.session, "meat"), 3);
    let status = game.session.spoilage_status(&meat).unwrap();
    assert_eq!(status.remaining_days, Some(1));
    assert!((status.progress - 90.0).abs() < 1e-9);

    advance(&mut game.session, 1);
    assert_eq!(count(&game.session, "meat"), 0);
    assert_eq!(count(&game.session, "hide"), 2);
}

#[test]
fn trees_grow_through_winter() {
    let mut game = start();
    let tree = PlacementId::from("plant-1");
    advance(&mut game.session, 16);
    assert_eq!(game.session.season(), Season::Winter);
    let stage = game
        .session
        .world()
        .placements
        .plant(&tree)
        .map(|p| p.growth_stage);
    assert_eq!(stage, Some(2));
}

#[test]
fn ledger_snapshot_round_trips_through_a_file() {
    let mut game = start();
    advance(&mut game.session, 5);
    let tree = PlacementId::from("plant-1");
    game.session.harvest_yield(&tree, 0, 2);

    let path = std::env::temp_dir().join(format!(
        "homestead-season-cycle-{}.json",
        std::process::id()
    ));
    game.session.yield_snapshot().save(&path).unwrap();
    let loaded = YieldSnapshot::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    advance(&mut game.session, 7);
    game.session.restore_yield_snapshot(loaded).unwrap();
    assert_eq!(game.session.day(), 5);
    assert_eq!(
        game.session
            .get_placement_yields(&tree)
            .map(|s| s.yields[0].remaining),
        Some(2)
    );
}

#[test]
fn shutdown_stops_the_sweeps() {
    let mut game = start();
    let goat = PlacementId::from("animal-7");
    assert!(game.session.trigger_dead_yield(&goat, PlacementType::Animal));

    assert_eq!(game.session.shutdown(), game.hooks.len());
    advance(&mut game.session, 60);
    assert_eq!(game.session.world().placements.resources().len(), 5);
}
