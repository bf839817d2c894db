//! Yield state store: the per-placement, per-slot harvest ledger.
//!
//! Each live plant or animal with at least one alive-yield rule has a
//! [`PlacementYieldState`] keyed by its placement id. Every slot tracks how
//! many units remain this season, the season ceiling, and whether the slot
//! is in season at all.
//!
//! # Invariants
//!
//! - `0 <= remaining <= total` for every slot.
//! - `remaining > 0` implies `is_available`.
//! - Right after [`YieldStateStore::init_yield_state`],
//!   `remaining == if is_available { total } else { 0 }`.
//!
//! A ledger rebuilt from entries (a loaded save) is normalized so the
//! invariants hold again: `remaining` is clamped to `total` and zeroed on
//! unavailable slots.
//!
//! Every operation touches a single placement and either completes or is
//! a no-op. Unknown placements and slots are soft failures that return
//! `0`/`false` rather than errors, because the UI driving these calls may
//! race with world changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use homestead_types::{
    AliveYield, PlacementId, PlacementType, PlacementYieldState, Season, YieldState,
};

/// A placement whose yields should be (re)initialized, as passed to
/// [`YieldStateStore::reset_for_season`].
#[derive(Debug, Clone, Copy)]
pub struct YieldSource<'a> {
    /// Placement id.
    pub placement_id: &'a PlacementId,
    /// Plant or animal.
    pub placement_type: PlacementType,
    /// The species' alive-yield rules.
    pub alive_yields: &'a [AliveYield],
}

/// Authoritative ledger of harvestable yield, keyed by placement id.
///
/// Entries are kept in placement-id order (lexicographic, so `plant-10`
/// sorts before `plant-2`); [`YieldStateStore::entries`] and the persisted
/// association list follow that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(PlacementId, PlacementYieldState)>")]
#[serde(into = "Vec<(PlacementId, PlacementYieldState)>")]
pub struct YieldStateStore {
    placements: BTreeMap<PlacementId, PlacementYieldState>,
}

impl YieldStateStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            placements: BTreeMap::new(),
        }
    }

    /// Create or fully replace the yield state of one placement for
    /// `season`.
    ///
    /// Each slot is available iff `season` is one of its rule's seasons;
    /// available slots start full, unavailable ones empty. A placement with
    /// no rules gets an empty slot list.
    pub fn init_yield_state(
        &mut self,
        placement_id: &PlacementId,
        placement_type: PlacementType,
        alive_yields: &[AliveYield],
        season: Season,
    ) {
        let yields = alive_yields
            .iter()
            .enumerate()
            .map(|(yield_index, rule)| {
                let is_available = rule.is_active_in(season);
                YieldState {
                    yield_index,
                    remaining: if is_available { rule.amount } else { 0 },
                    total: rule.amount,
                    is_available,
                    last_harvest_day: None,
                }
            })
            .collect();

        self.placements.insert(
            placement_id.clone(),
            PlacementYieldState {
                placement_type,
                yields,
            },
        );
    }

    /// Take up to `amount` units from one slot.
    ///
    /// Returns the units actually taken: `min(amount, remaining)`, or `0`
    /// if the placement or slot is unknown, out of season, or empty. A
    /// request for zero units is a no-op.
    pub fn harvest_yield(
        &mut self,
        placement_id: &PlacementId,
        yield_index: usize,
        amount: u32,
        current_day: u32,
    ) -> u32 {
        let Some(slot) = self.slot_mut(placement_id, yield_index) else {
            return 0;
        };
        if amount == 0 || !slot.is_available || slot.remaining == 0 {
            return 0;
        }

        let taken = amount.min(slot.remaining);
        slot.remaining = slot.remaining.saturating_sub(taken);
        slot.last_harvest_day = Some(current_day);
        taken
    }

    /// Units left in one slot, `0` if absent.
    pub fn remaining_yield(&self, placement_id: &PlacementId, yield_index: usize) -> u32 {
        self.placements
            .get(placement_id)
            .and_then(|state| state.slot(yield_index))
            .map_or(0, |slot| slot.remaining)
    }

    /// Whether any slot of the placement is in season with units left.
    pub fn has_available_yield(&self, placement_id: &PlacementId) -> bool {
        self.placements
            .get(placement_id)
            .is_some_and(PlacementYieldState::has_available)
    }

    /// Full yield state of one placement, for read-only UI queries.
    pub fn get(&self, placement_id: &PlacementId) -> Option<&PlacementYieldState> {
        self.placements.get(placement_id)
    }

    /// Re-initialize every listed placement for `season`.
    pub fn reset_for_season<'a>(
        &mut self,
        sources: impl IntoIterator<Item = YieldSource<'a>>,
        season: Season,
    ) -> usize {
        let mut count: usize = 0;
        for source in sources {
            self.init_yield_state(
                source.placement_id,
                source.placement_type,
                source.alive_yields,
                season,
            );
            count = count.saturating_add(1);
        }
        count
    }

    /// Delete a placement's ledger entry. Returns `true` if one existed.
    pub fn remove_placement(&mut self, placement_id: &PlacementId) -> bool {
        self.placements.remove(placement_id).is_some()
    }

    /// Refill one slot to its ceiling outside the season cycle.
    ///
    /// Only in-season slots are refilled so `remaining > 0` keeps implying
    /// availability. Returns `true` if the slot was refilled.
    pub fn regenerate_yield(
        &mut self,
        placement_id: &PlacementId,
        yield_index: usize,
        current_day: u32,
    ) -> bool {
        let Some(slot) = self.slot_mut(placement_id, yield_index) else {
            return false;
        };
        if !slot.is_available {
            return false;
        }
        slot.remaining = slot.total;
        slot.last_harvest_day = Some(current_day);
        true
    }

    /// Iterate ledger entries in lexicographic placement-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&PlacementId, &PlacementYieldState)> {
        self.placements.iter()
    }

    /// Number of placements tracked.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no placement is tracked.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Ledger contents as an ordered association list, the persisted form.
    pub fn entries(&self) -> Vec<(PlacementId, PlacementYieldState)> {
        self.placements
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    /// Rebuild a store from an association list. Later duplicates win.
    ///
    /// Slots that break the ledger invariants are repaired: `remaining` is
    /// clamped to `total`, and an unavailable slot is emptied.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (PlacementId, PlacementYieldState)>,
    ) -> Self {
        let placements = entries
            .into_iter()
            .map(|(id, mut state)| {
                for slot in &mut state.yields {
                    normalize_slot(&id, slot);
                }
                (id, state)
            })
            .collect();
        Self { placements }
    }

    fn slot_mut(
        &mut self,
        placement_id: &PlacementId,
        yield_index: usize,
    ) -> Option<&mut YieldState> {
        self.placements
            .get_mut(placement_id)?
            .yields
            .iter_mut()
            .find(|slot| slot.yield_index == yield_index)
    }
}

fn normalize_slot(placement_id: &PlacementId, slot: &mut YieldState) {
    let repaired = if slot.is_available {
        slot.remaining.min(slot.total)
    } else {
        0
    };
    if repaired != slot.remaining {
        warn!(
            placement = %placement_id,
            yield_index = slot.yield_index,
            remaining = slot.remaining,
            total = slot.total,
            is_available = slot.is_available,
            "repaired yield slot on load"
        );
        slot.remaining = repaired;
    }
}

impl From<Vec<(PlacementId, PlacementYieldState)>> for YieldStateStore {
    fn from(entries: Vec<(PlacementId, PlacementYieldState)>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<YieldStateStore> for Vec<(PlacementId, PlacementYieldState)> {
    fn from(store: YieldStateStore) -> Self {
        store.placements.into_iter().collect()
    }
}
