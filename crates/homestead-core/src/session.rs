//! Game session: owns the world state and wires the engines to the clock.
//!
//! The session is the composition root. It owns the [`World`] (clock,
//! definition catalog, placement map, yield ledger, tuning) and an
//! [`EventBus`] over it. The `init_*_system` hooks register the engines as
//! listeners and return their [`Subscription`] handles; [`GameSession::shutdown`]
//! removes every hook the session installed.
//!
//! On a day that starts a new season, season-change listeners run before
//! day-change listeners, so loot shed at season end is stamped with the
//! first day of the new season and then swept with everything else.

use homestead_types::{
    AliveYield, AnimalPlacement, HarvestedYield, InteractionOption, PlacementId, PlacementType,
    PlacementYieldState, PlantPlacement, Season,
};
use homestead_world::{
    Clock, DeadYieldEngine, DefinitionCatalog, DefinitionRegistry, GrowthSettings, GrowthSystem,
    PlacementMap, SpoilageSweep, SpoilageThresholds, WorldError, WorldPlacements, YieldLifecycle,
    YieldStateStore, interaction_options,
};
use tracing::{debug, info};

use crate::clock::{ClockError, DayAdvance, GameClock};
use crate::config::{ConfigError, GameConfig};
use crate::events::{DayChanged, EventBus, SeasonChanged, Subscription};
use crate::persist::{PersistError, YieldSnapshot};

/// Errors that can occur while setting up or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Saving or restoring state failed.
    #[error("persist error: {source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: PersistError,
    },
}

/// Spoilage read-out for one ground resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpoilageStatus {
    /// Days until removal; `None` if it never spoils.
    pub remaining_days: Option<u32>,
    /// Elapsed share of its lifetime, `0..=100`.
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Everything the engines read and mutate during a session.
#[derive(Debug, Clone)]
pub struct World {
    /// In-game calendar.
    pub clock: GameClock,
    /// Immutable-per-session definitions.
    pub catalog: DefinitionCatalog,
    /// Placed plants, animals, and ground resources.
    pub placements: WorldPlacements,
    /// Yield ledger.
    pub yields: YieldStateStore,
    /// Tile edge length for shed positions.
    pub tile_size: u32,
    /// Spoilage thresholds.
    pub spoilage: SpoilageThresholds,
    /// Growth timer tuning.
    pub growth: GrowthSettings,
}

impl World {
    /// Yield lifecycle engine bound to this world.
    pub fn lifecycle(&mut self) -> YieldLifecycle<'_> {
        YieldLifecycle::new(
            &self.clock,
            &self.catalog,
            &mut self.placements,
            &mut self.yields,
            self.tile_size,
        )
    }

    /// Dead yield engine bound to this world.
    pub fn dead_yield(&mut self) -> DeadYieldEngine<'_> {
        DeadYieldEngine::new(
            &self.clock,
            &self.catalog,
            &mut self.placements,
            &mut self.yields,
            self.tile_size,
        )
    }

    /// Spoilage sweep bound to this world.
    pub fn spoilage_sweep(&mut self) -> SpoilageSweep<'_> {
        SpoilageSweep::new(
            &self.clock,
            &self.catalog,
            &mut self.placements,
            self.spoilage,
        )
    }

    /// Growth timer bound to this world.
    pub fn growth_system(&mut self) -> GrowthSystem<'_> {
        GrowthSystem::new(&self.clock, &self.catalog, &mut self.placements, &self.growth)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Engine hooks a session installs at most once each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Yield,
    Spoilage,
    Growth,
}

/// A running game: world state, listeners, and installed hooks.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    bus: EventBus<World>,
    hooks: Vec<(Hook, Subscription)>,
}

impl GameSession {
    /// Start a session from configuration and a definition catalog, with
    /// an empty placement map.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Clock`] or [`SessionError::Config`] if the
    /// configuration is invalid.
    pub fn new(config: &GameConfig, catalog: DefinitionCatalog) -> Result<Self, SessionError> {
        let clock = GameClock::new(&config.time)?;
        let growth = config.growth_settings()?;
        let world = World {
            clock,
            catalog,
            placements: WorldPlacements::new(),
            yields: YieldStateStore::new(),
            tile_size: config.world.tile_size,
            spoilage: config.spoilage_thresholds(),
            growth,
        };
        info!(
            day = world.clock.day(),
            season = %world.clock.season(),
            tile_size = world.tile_size,
            "session created"
        );
        Ok(Self {
            world,
            bus: EventBus::new(),
            hooks: Vec::new(),
        })
    }

    /// Read-only access to the world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Current day index.
    pub const fn day(&self) -> u32 {
        self.world.clock.day()
    }

    /// Current season.
    pub fn season(&self) -> Season {
        self.world.clock.season()
    }

    // -- Hooks --------------------------------------------------------------

    /// Initialize yields for the current season and install the
    /// season-change listener that settles and re-initializes them.
    ///
    /// Calling it again while the hook is installed returns the existing
    /// handle and leaves the ledger untouched.
    pub fn init_yield_system(&mut self) -> Subscription {
        if let Some(sub) = self.installed(Hook::Yield) {
            return sub;
        }
        let season = self.world.clock.current_season();
        let initialized = self.world.lifecycle().initialize_yields_for_season(season);
        info!(season = %season, initialized, "yield system started");

        let sub = self.bus.on_season_change(|event, world| {
            let transition = world.lifecycle().transition_season(event.ended, event.started);
            debug!(
                day = event.day,
                shed = transition.season_end.shed_ids.len(),
                lost = transition.season_end.lost_units,
                initialized = transition.initialized,
                "season transition applied"
            );
        });
        self.hooks.push((Hook::Yield, sub));
        sub
    }

    /// Install the daily spoilage sweep. Idempotent while installed.
    pub fn init_spoilage_system(&mut self) -> Subscription {
        if let Some(sub) = self.installed(Hook::Spoilage) {
            return sub;
        }
        let sub = self.bus.on_day_change(|_, world| {
            world.spoilage_sweep().remove_expired_resources();
        });
        self.hooks.push((Hook::Spoilage, sub));
        sub
    }

    /// Install the daily growth timer. Idempotent while installed.
    pub fn init_growth_system(&mut self) -> Subscription {
        if let Some(sub) = self.installed(Hook::Growth) {
            return sub;
        }
        let sub = self.bus.on_day_change(|_, world| {
            world.growth_system().advance_growth();
        });
        self.hooks.push((Hook::Growth, sub));
        sub
    }

    fn installed(&self, hook: Hook) -> Option<Subscription> {
        self.hooks
            .iter()
            .find(|(kind, _)| *kind == hook)
            .map(|(_, sub)| *sub)
    }

    /// Register an extra season-change listener.
    pub fn on_season_change(
        &mut self,
        listener: impl FnMut(&SeasonChanged, &mut World) + 'static,
    ) -> Subscription {
        self.bus.on_season_change(listener)
    }

    /// Register an extra day-change listener.
    pub fn on_day_change(
        &mut self,
        listener: impl FnMut(&DayChanged, &mut World) + 'static,
    ) -> Subscription {
        self.bus.on_day_change(listener)
    }

    /// Remove one listener.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.hooks.retain(|(_, sub)| *sub != subscription);
        self.bus.unsubscribe(subscription)
    }

    /// Remove every hook installed by the `init_*_system` calls. Returns
    /// how many were removed.
    pub fn shutdown(&mut self) -> usize {
        let hooks = std::mem::take(&mut self.hooks);
        let removed = hooks
            .into_iter()
            .filter(|(_, sub)| self.bus.unsubscribe(*sub))
            .count();
        info!(removed, "session hooks removed");
        removed
    }

    // -- Time ---------------------------------------------------------------

    /// Advance the clock one day and dispatch events: season change first
    /// (if the day starts a new season), then day change.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Clock`] if the day counter overflows.
    pub fn advance_day(&mut self) -> Result<DayAdvance, SessionError> {
        let step = self.world.clock.advance_day()?;
        let season = self.world.clock.season();

        if let Some(change) = step.season_change {
            info!(day = step.day, ended = %change.ended, started = %change.started, "season changed");
            let event = SeasonChanged {
                day: step.day,
                ended: change.ended,
                started: change.started,
            };
            self.bus.emit_season_change(&event, &mut self.world);
        }

        let event = DayChanged {
            day: step.day,
            season,
        };
        self.bus.emit_day_change(&event, &mut self.world);
        Ok(step)
    }

    // -- Placement ----------------------------------------------------------

    /// Add a plant to the world and initialize its yields for the current
    /// season.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownDefinition`] if the species is not in
    /// the catalog, or [`WorldError::DuplicatePlacement`] if the id is taken.
    pub fn place_plant(&mut self, plant: PlantPlacement) -> Result<(), SessionError> {
        let def = self
            .world
            .catalog
            .find_plant(&plant.definition_id)
            .ok_or_else(|| WorldError::UnknownDefinition(plant.definition_id.clone()))?;
        let rules = def.alive_yields.clone();
        let id = plant.id.clone();
        self.world.placements.add_plant(plant)?;
        self.enter_world(&id, PlacementType::Plant, &rules);
        Ok(())
    }

    /// Add an animal to the world and initialize its yields for the current
    /// season.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownDefinition`] if the species is not in
    /// the catalog, or [`WorldError::DuplicatePlacement`] if the id is taken.
    pub fn place_animal(&mut self, animal: AnimalPlacement) -> Result<(), SessionError> {
        let def = self
            .world
            .catalog
            .find_animal(&animal.definition_id)
            .ok_or_else(|| WorldError::UnknownDefinition(animal.definition_id.clone()))?;
        let rules = def.alive_yields.clone();
        let id = animal.id.clone();
        self.world.placements.add_animal(animal)?;
        self.enter_world(&id, PlacementType::Animal, &rules);
        Ok(())
    }

    fn enter_world(
        &mut self,
        id: &PlacementId,
        placement_type: PlacementType,
        rules: &[AliveYield],
    ) {
        if rules.is_empty() {
            return;
        }
        let season = self.world.clock.season();
        self.world
            .yields
            .init_yield_state(id, placement_type, rules, season);
    }

    // -- Gameplay -----------------------------------------------------------

    /// Take up to `amount` units from one yield slot.
    pub fn harvest_yield(
        &mut self,
        placement_id: &PlacementId,
        yield_index: usize,
        amount: u32,
    ) -> Option<HarvestedYield> {
        self.world
            .lifecycle()
            .harvest_yield(placement_id, yield_index, amount)
    }

    /// Kill a plant or animal, dropping its loot.
    pub fn trigger_dead_yield(
        &mut self,
        placement_id: &PlacementId,
        creature_type: PlacementType,
    ) -> bool {
        self.world
            .dead_yield()
            .trigger_dead_yield(placement_id, creature_type)
    }

    /// Whether any slot of the placement can be harvested now.
    pub fn has_available_yield(&self, placement_id: &PlacementId) -> bool {
        self.world.yields.has_available_yield(placement_id)
    }

    /// The placement's ledger entry.
    pub fn get_placement_yields(&self, placement_id: &PlacementId) -> Option<&PlacementYieldState> {
        self.world.yields.get(placement_id)
    }

    /// Feed an animal today. Returns `false` if no such animal exists.
    pub fn feed_animal(&mut self, placement_id: &PlacementId) -> bool {
        let today = self.world.clock.day();
        let Some(animal) = self.world.placements.animal_mut(placement_id) else {
            return false;
        };
        animal.last_fed_day = Some(today);
        true
    }

    /// Whether the animal was fed today.
    pub fn is_fed(&self, placement_id: &PlacementId) -> bool {
        let today = self.world.clock.day();
        self.world
            .placements
            .animal(placement_id)
            .is_some_and(|animal| animal.last_fed_day == Some(today))
    }

    /// Actions to offer in the interaction prompt for a placement.
    ///
    /// Plants are never gated on feeding.
    pub fn interaction_options(&self, placement_id: &PlacementId) -> Vec<InteractionOption> {
        let is_fed = match self.world.yields.get(placement_id) {
            Some(state) if state.placement_type == PlacementType::Animal => {
                self.is_fed(placement_id)
            }
            _ => true,
        };
        interaction_options(
            &self.world.catalog,
            &self.world.placements,
            &self.world.yields,
            placement_id,
            is_fed,
        )
    }

    /// Spoilage read-out for a ground resource, or `None` if the resource
    /// or its definition is unknown.
    pub fn spoilage_status(&self, resource_id: &PlacementId) -> Option<SpoilageStatus> {
        let resource = self
            .world
            .placements
            .resources()
            .iter()
            .find(|r| &r.id == resource_id)?;
        let rate = self
            .world
            .catalog
            .find_resource(&resource.definition_id)?
            .spoilage_rate;
        let today = self.world.clock.day();
        Some(SpoilageStatus {
            remaining_days: self
                .world
                .spoilage
                .remaining_days(resource.placed_at_day, rate, today),
            progress: self
                .world
                .spoilage
                .spoilage_progress(resource.placed_at_day, rate, today),
        })
    }

    // -- Persistence --------------------------------------------------------

    /// Capture the yield ledger.
    pub fn yield_snapshot(&self) -> YieldSnapshot {
        YieldSnapshot::new(self.world.clock.day(), self.world.yields.clone())
    }

    /// Restore the yield ledger and the day it was taken on.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Clock`] if the clock cannot be rebuilt.
    pub fn restore_yield_snapshot(&mut self, snapshot: YieldSnapshot) -> Result<(), SessionError> {
        let clock = GameClock::from_parts(
            snapshot.day,
            self.world.clock.days_per_season(),
            self.world.clock.seasons().to_vec(),
        )?;
        self.world.clock = clock;
        self.world.yields = snapshot.yields;
        info!(day = snapshot.day, placements = self.world.yields.len(), "yield ledger restored");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use homestead_types::DefinitionId;
    use homestead_world::{starter_catalog, starter_farm};

    use super::*;
    use crate::events::EventKind;

    fn session(days_per_season: u32, starting_day: u32) -> GameSession {
        let mut config = GameConfig::default();
        config.time.days_per_season = days_per_season;
        config.time.starting_day = starting_day;
        GameSession::new(&config, starter_catalog().unwrap()).unwrap()
    }

    fn seeded(days_per_season: u32, starting_day: u32) -> GameSession {
        let mut s = session(days_per_season, starting_day);
        let farm = starter_farm(starting_day);
        for plant in farm.plants {
            s.place_plant(plant).unwrap();
        }
        for animal in farm.animals {
            s.place_animal(animal).unwrap();
        }
        s
    }

    #[test]
    fn placing_initializes_yields_for_current_season() {
        // Day 56 of a 28-day calendar is autumn.
        let s = seeded(28, 56);
        let tree = PlacementId::from("plant-1");
        assert_eq!(s.season(), Season::Autumn);
        assert!(s.has_available_yield(&tree));
        assert_eq!(
            s.get_placement_yields(&tree).map(|st| st.yields[0].remaining),
            Some(5)
        );
    }

    #[test]
    fn unknown_species_is_rejected() {
        let mut s = session(28, 0);
        let mut farm = starter_farm(0);
        let mut plant = farm.plants.remove(0);
        plant.definition_id = DefinitionId::from("mystery");
        let result = s.place_plant(plant);
        assert!(matches!(
            result,
            Err(SessionError::World {
                source: WorldError::UnknownDefinition(_)
            })
        ));
    }

    #[test]
    fn season_end_sheds_before_reinit() {
        let mut s = seeded(2, 4);
        let _ = s.init_yield_system();
        let tree = PlacementId::from("plant-1");
        assert_eq!(s.harvest_yield(&tree, 0, 3).map(|h| h.amount), Some(3));

        s.advance_day().unwrap();
        let step = s.advance_day().unwrap();
        assert!(step.season_change.is_some());
        assert_eq!(s.season(), Season::Winter);

        let apples: Vec<_> = s
            .world()
            .placements
            .resources()
            .iter()
            .filter(|r| r.definition_id.as_str() == "apple")
            .collect();
        assert_eq!(apples.len(), 7);
        assert!(apples.iter().all(|r| r.placed_at_day == 6));
        assert!(!s.has_available_yield(&tree));
    }

    #[test]
    fn shed_loot_spoils_on_schedule() {
        // Last day of autumn; the next day sheds every apple.
        let mut s = seeded(28, 83);
        let _ = s.init_yield_system();
        let _ = s.init_spoilage_system();
        let apples = |s: &GameSession| {
            s.world()
                .placements
                .resources()
                .iter()
                .filter(|r| r.definition_id.as_str() == "apple")
                .count()
        };

        s.advance_day().unwrap();
        assert_eq!(s.season(), Season::Winter);
        assert_eq!(apples(&s), 10);

        for _ in 0..29 {
            s.advance_day().unwrap();
        }
        assert_eq!(s.day(), 113);
        assert_eq!(apples(&s), 10);

        s.advance_day().unwrap();
        assert_eq!(apples(&s), 0);
    }

    #[test]
    fn feeding_gates_milking() {
        let mut s = seeded(28, 0);
        let cow = PlacementId::from("animal-1");

        assert!(s.interaction_options(&cow).is_empty());
        assert!(s.feed_animal(&cow));
        let options = s.interaction_options(&cow);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].interaction_type, "milk");

        s.advance_day().unwrap();
        assert!(!s.is_fed(&cow));
        assert!(!s.feed_animal(&PlacementId::from("animal-99")));
    }

    #[test]
    fn felling_drops_wood_and_forgets_tree() {
        let mut s = seeded(28, 0);
        let tree = PlacementId::from("plant-2");
        assert!(s.trigger_dead_yield(&tree, PlacementType::Plant));
        assert!(!s.trigger_dead_yield(&tree, PlacementType::Plant));
        assert!(s.get_placement_yields(&tree).is_none());
        let wood = s
            .world()
            .placements
            .resources()
            .iter()
            .filter(|r| r.definition_id.as_str() == "wood")
            .count();
        assert_eq!(wood, 4);
    }

    #[test]
    fn spoilage_status_reports_progress() {
        let mut s = seeded(28, 0);
        assert!(s.trigger_dead_yield(&PlacementId::from("animal-1"), PlacementType::Animal));
        let meat = s
            .world()
            .placements
            .resources()
            .iter()
            .find(|r| r.definition_id.as_str() == "meat")
            .map(|r| r.id.clone())
            .unwrap();
        let status = s.spoilage_status(&meat).unwrap();
        assert_eq!(status.remaining_days, Some(7));
        assert!(status.progress.abs() < f64::EPSILON);
        assert!(s.spoilage_status(&PlacementId::from("nope")).is_none());
    }

    #[test]
    fn shutdown_removes_every_hook() {
        let mut s = seeded(28, 0);
        let yields = s.init_yield_system();
        let _ = s.init_spoilage_system();
        let _ = s.init_growth_system();
        assert_eq!(yields.kind(), EventKind::SeasonChange);

        assert_eq!(s.shutdown(), 3);
        assert_eq!(s.shutdown(), 0);
        assert!(!s.unsubscribe(yields));
    }

    #[test]
    fn hooks_install_once() {
        // Last day of summer; the next day starts the apple season.
        let mut s = seeded(28, 55);
        let first = s.init_yield_system();
        assert_eq!(s.init_yield_system(), first);
        let sweep = s.init_spoilage_system();
        assert_eq!(s.init_spoilage_system(), sweep);
        let growth = s.init_growth_system();
        assert_eq!(s.init_growth_system(), growth);

        s.advance_day().unwrap();
        assert_eq!(s.season(), Season::Autumn);
        let apples = s
            .world()
            .placements
            .resources()
            .iter()
            .filter(|r| r.definition_id.as_str() == "apple")
            .count();
        assert_eq!(apples, 0);
        assert_eq!(
            s.get_placement_yields(&PlacementId::from("plant-1"))
                .map(|st| st.yields[0].remaining),
            Some(5)
        );
        assert_eq!(s.shutdown(), 3);
    }

    #[test]
    fn hook_can_be_reinstalled_after_unsubscribe() {
        let mut s = seeded(28, 0);
        let first = s.init_spoilage_system();
        assert!(s.unsubscribe(first));
        let second = s.init_spoilage_system();
        assert_ne!(first, second);
        assert_eq!(s.shutdown(), 1);
    }

    #[test]
    fn snapshot_restores_ledger_and_day() {
        let mut s = seeded(28, 56);
        let _ = s.init_yield_system();
        let tree = PlacementId::from("plant-1");
        s.harvest_yield(&tree, 0, 4);
        let snapshot = s.yield_snapshot();

        s.harvest_yield(&tree, 0, 1);
        s.advance_day().unwrap();
        s.restore_yield_snapshot(snapshot).unwrap();

        assert_eq!(s.day(), 56);
        assert_eq!(
            s.get_placement_yields(&tree).map(|st| st.yields[0].remaining),
            Some(1)
        );
    }
}
