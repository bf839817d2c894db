//! Ground-resource spoilage.
//!
//! Each resource definition carries a [`SpoilageRate`] category. A ground
//! resource expires once the number of whole days since it was placed
//! reaches the threshold for its category; `never` has no threshold. The
//! [`SpoilageSweep`] runs once per day change and removes every expired
//! resource in a single batch.

use std::collections::BTreeSet;

use homestead_types::{PlacementId, SpoilageRate};
use tracing::{debug, warn};

use crate::definitions::DefinitionRegistry;
use crate::placements::PlacementMap;
use crate::time::Clock;

/// Default lifetime in days of a `fast` resource.
pub const DEFAULT_FAST_DAYS: u32 = 7;
/// Default lifetime in days of a `medium` resource.
pub const DEFAULT_MEDIUM_DAYS: u32 = 30;
/// Default lifetime in days of a `slow` resource.
pub const DEFAULT_SLOW_DAYS: u32 = 90;

/// Maximum value of [`spoilage_progress`].
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Day thresholds per spoilage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpoilageThresholds {
    /// Lifetime of `fast` resources.
    pub fast: u32,
    /// Lifetime of `medium` resources.
    pub medium: u32,
    /// Lifetime of `slow` resources.
    pub slow: u32,
}

impl SpoilageThresholds {
    /// Threshold for `rate`, or `None` for resources that never spoil.
    pub const fn threshold(&self, rate: SpoilageRate) -> Option<u32> {
        match rate {
            SpoilageRate::Fast => Some(self.fast),
            SpoilageRate::Medium => Some(self.medium),
            SpoilageRate::Slow => Some(self.slow),
            SpoilageRate::Never => None,
        }
    }

    /// Whether a resource placed on `placed_at_day` has expired by
    /// `current_day`.
    pub const fn is_resource_expired(
        &self,
        placed_at_day: u32,
        rate: SpoilageRate,
        current_day: u32,
    ) -> bool {
        match self.threshold(rate) {
            Some(limit) => age(placed_at_day, current_day) >= limit,
            None => false,
        }
    }

    /// Days left before the resource expires. `None` means it never does.
    pub const fn remaining_days(
        &self,
        placed_at_day: u32,
        rate: SpoilageRate,
        current_day: u32,
    ) -> Option<u32> {
        match self.threshold(rate) {
            Some(limit) => Some(limit.saturating_sub(age(placed_at_day, current_day))),
            None => None,
        }
    }

    /// Percentage of the resource's lifetime already elapsed, in `0..=100`.
    ///
    /// Resources that never spoil report `0`. A zero threshold reports
    /// `100` since such a resource is expired on placement.
    pub fn spoilage_progress(
        &self,
        placed_at_day: u32,
        rate: SpoilageRate,
        current_day: u32,
    ) -> f64 {
        let Some(limit) = self.threshold(rate) else {
            return 0.0;
        };
        if limit == 0 {
            return PROGRESS_COMPLETE;
        }
        let elapsed = f64::from(age(placed_at_day, current_day));
        (elapsed / f64::from(limit) * PROGRESS_COMPLETE).min(PROGRESS_COMPLETE)
    }
}

impl Default for SpoilageThresholds {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_DAYS,
            medium: DEFAULT_MEDIUM_DAYS,
            slow: DEFAULT_SLOW_DAYS,
        }
    }
}

/// Whole days since placement. A placement day in the future counts as 0.
const fn age(placed_at_day: u32, current_day: u32) -> u32 {
    current_day.saturating_sub(placed_at_day)
}

/// [`SpoilageThresholds::is_resource_expired`] with the default thresholds.
pub fn is_resource_expired(placed_at_day: u32, rate: SpoilageRate, current_day: u32) -> bool {
    SpoilageThresholds::default().is_resource_expired(placed_at_day, rate, current_day)
}

/// [`SpoilageThresholds::remaining_days`] with the default thresholds.
pub fn remaining_days(placed_at_day: u32, rate: SpoilageRate, current_day: u32) -> Option<u32> {
    SpoilageThresholds::default().remaining_days(placed_at_day, rate, current_day)
}

/// [`SpoilageThresholds::spoilage_progress`] with the default thresholds.
pub fn spoilage_progress(placed_at_day: u32, rate: SpoilageRate, current_day: u32) -> f64 {
    SpoilageThresholds::default().spoilage_progress(placed_at_day, rate, current_day)
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

/// Daily sweep removing expired ground resources from the placement map.
pub struct SpoilageSweep<'a> {
    clock: &'a dyn Clock,
    registry: &'a dyn DefinitionRegistry,
    placements: &'a mut dyn PlacementMap,
    thresholds: SpoilageThresholds,
}

impl<'a> SpoilageSweep<'a> {
    /// Bind the sweep to its collaborators.
    pub fn new(
        clock: &'a dyn Clock,
        registry: &'a dyn DefinitionRegistry,
        placements: &'a mut dyn PlacementMap,
        thresholds: SpoilageThresholds,
    ) -> Self {
        Self {
            clock,
            registry,
            placements,
            thresholds,
        }
    }

    /// Remove every expired ground resource. Returns how many were removed.
    ///
    /// Resources whose definition is missing are left in place.
    pub fn remove_expired_resources(&mut self) -> usize {
        let current_day = self.clock.current_day();

        let mut expired = BTreeSet::<PlacementId>::new();
        for resource in self.placements.resources() {
            let Some(def) = self.registry.find_resource(&resource.definition_id) else {
                warn!(
                    placement_id = %resource.id,
                    definition_id = %resource.definition_id,
                    "spoilage: definition not found, skipping"
                );
                continue;
            };
            if self
                .thresholds
                .is_resource_expired(resource.placed_at_day, def.spoilage_rate, current_day)
            {
                expired.insert(resource.id.clone());
            }
        }

        if expired.is_empty() {
            return 0;
        }
        let removed = self.placements.remove_resources(&expired);
        debug!(day = current_day, removed, "spoilage sweep");
        removed
    }
}

#[cfg(test)]
mod tests {
    use homestead_types::{DefinitionId, ResourceDefinition, Season};

    use super::*;
    use crate::definitions::DefinitionCatalog;
    use crate::placements::{NewResource, WorldPlacements};
    use crate::time::ClockReading;

    fn resource(id: &str, rate: SpoilageRate) -> ResourceDefinition {
        ResourceDefinition {
            id: DefinitionId::from(id),
            name: id.to_owned(),
            spoilage_rate: rate,
        }
    }

    fn drop_at(map: &mut WorldPlacements, def: &str, day: u32) -> Option<PlacementId> {
        map.add_resource(DefinitionId::from(def), 0, 0, day, None)
    }

    #[test]
    fn medium_expires_on_threshold_day() {
        assert!(!is_resource_expired(10, SpoilageRate::Medium, 39));
        assert!(is_resource_expired(10, SpoilageRate::Medium, 40));
    }

    #[test]
    fn never_does_not_expire() {
        assert!(!is_resource_expired(0, SpoilageRate::Never, u32::MAX));
        assert_eq!(remaining_days(0, SpoilageRate::Never, 500), None);
        assert!(spoilage_progress(0, SpoilageRate::Never, 500).abs() < f64::EPSILON);
    }

    #[test]
    fn remaining_days_counts_down_and_floors_at_zero() {
        assert_eq!(remaining_days(10, SpoilageRate::Fast, 10), Some(7));
        assert_eq!(remaining_days(10, SpoilageRate::Fast, 15), Some(2));
        assert_eq!(remaining_days(10, SpoilageRate::Fast, 40), Some(0));
    }

    #[test]
    fn future_placement_counts_as_fresh() {
        assert!(!is_resource_expired(50, SpoilageRate::Fast, 10));
        assert_eq!(remaining_days(50, SpoilageRate::Fast, 10), Some(7));
    }

    #[test]
    fn progress_is_monotonic_and_hits_100_at_expiry() {
        let mut previous = 0.0_f64;
        for day in 10..=60 {
            let progress = spoilage_progress(10, SpoilageRate::Medium, day);
            assert!(progress >= previous);
            assert!((0.0..=PROGRESS_COMPLETE).contains(&progress));
            let expired = is_resource_expired(10, SpoilageRate::Medium, day);
            assert_eq!(progress >= PROGRESS_COMPLETE, expired, "day {day}");
            previous = progress;
        }
    }

    #[test]
    fn zero_threshold_is_immediately_expired() {
        let thresholds = SpoilageThresholds {
            fast: 0,
            ..SpoilageThresholds::default()
        };
        assert!(thresholds.is_resource_expired(5, SpoilageRate::Fast, 5));
        assert!((thresholds.spoilage_progress(5, SpoilageRate::Fast, 5) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sweep_removes_only_expired() {
        let mut catalog = DefinitionCatalog::new();
        assert!(catalog.add_resource(resource("berry", SpoilageRate::Medium)).is_ok());
        assert!(catalog.add_resource(resource("stone", SpoilageRate::Never)).is_ok());

        let mut map = WorldPlacements::new();
        let berry = drop_at(&mut map, "berry", 10);
        let stone = drop_at(&mut map, "stone", 0);
        let orphan = drop_at(&mut map, "ghost", 0);

        let day_39 = ClockReading::new(39, Season::Summer);
        let mut sweep =
            SpoilageSweep::new(&day_39, &catalog, &mut map, SpoilageThresholds::default());
        assert_eq!(sweep.remove_expired_resources(), 0);

        let day_40 = ClockReading::new(40, Season::Summer);
        let mut sweep =
            SpoilageSweep::new(&day_40, &catalog, &mut map, SpoilageThresholds::default());
        assert_eq!(sweep.remove_expired_resources(), 1);

        let left: Vec<Option<PlacementId>> =
            map.resources().iter().map(|r| Some(r.id.clone())).collect();
        assert!(!left.contains(&berry));
        assert!(left.contains(&stone));
        assert!(left.contains(&orphan));
    }

    #[test]
    fn sweep_removes_batch_of_units() {
        let mut catalog = DefinitionCatalog::new();
        assert!(catalog.add_resource(resource("milk", SpoilageRate::Fast)).is_ok());
        let mut map = WorldPlacements::new();
        let unit = NewResource {
            definition_id: DefinitionId::from("milk"),
            x: 0,
            y: 0,
            placed_at_day: 1,
            source_id: None,
        };
        map.add_resources(unit.units(4).collect());

        let clock = ClockReading::new(8, Season::Spring);
        let mut sweep =
            SpoilageSweep::new(&clock, &catalog, &mut map, SpoilageThresholds::default());
        assert_eq!(sweep.remove_expired_resources(), 4);
        assert!(map.resources().is_empty());
    }
}
