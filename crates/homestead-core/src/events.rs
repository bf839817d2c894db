//! Day-change and season-change subscriptions.
//!
//! Listeners are boxed closures that receive the event and mutable access
//! to the world they were registered against. Registering returns a
//! [`Subscription`] handle; passing it to [`EventBus::unsubscribe`]
//! removes the listener. Sessions must unsubscribe their hooks on teardown.
//!
//! Listeners of one kind run in registration order.

use homestead_types::Season;

/// Payload of a day-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayChanged {
    /// The new day index.
    pub day: u32,
    /// Season active on the new day.
    pub season: Season,
}

/// Payload of a season-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonChanged {
    /// First day of the new season.
    pub day: u32,
    /// The season that ended.
    pub ended: Season,
    /// The season that began.
    pub started: Season,
}

/// Which event a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired once per advanced day.
    DayChange,
    /// Fired when a day starts a new season.
    SeasonChange,
}

/// Handle returned by a registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "dropping a subscription handle leaks the listener"]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    /// The event this subscription listens to.
    pub const fn kind(self) -> EventKind {
        self.kind
    }
}

type DayListener<W> = Box<dyn FnMut(&DayChanged, &mut W)>;
type SeasonListener<W> = Box<dyn FnMut(&SeasonChanged, &mut W)>;

/// Registry of day and season listeners over a world type `W`.
pub struct EventBus<W> {
    next_id: u64,
    day_listeners: Vec<(u64, DayListener<W>)>,
    season_listeners: Vec<(u64, SeasonListener<W>)>,
}

impl<W> EventBus<W> {
    /// Create a bus with no listeners.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            day_listeners: Vec::new(),
            season_listeners: Vec::new(),
        }
    }

    /// Register a day-change listener.
    pub fn on_day_change(
        &mut self,
        listener: impl FnMut(&DayChanged, &mut W) + 'static,
    ) -> Subscription {
        let id = self.allocate_id();
        self.day_listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            kind: EventKind::DayChange,
        }
    }

    /// Register a season-change listener.
    pub fn on_season_change(
        &mut self,
        listener: impl FnMut(&SeasonChanged, &mut W) + 'static,
    ) -> Subscription {
        let id = self.allocate_id();
        self.season_listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            kind: EventKind::SeasonChange,
        }
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        match subscription.kind {
            EventKind::DayChange => remove_by_id(&mut self.day_listeners, subscription.id),
            EventKind::SeasonChange => remove_by_id(&mut self.season_listeners, subscription.id),
        }
    }

    /// Deliver a day-change event. Returns how many listeners ran.
    pub fn emit_day_change(&mut self, event: &DayChanged, world: &mut W) -> usize {
        for (_, listener) in &mut self.day_listeners {
            listener(event, &mut *world);
        }
        self.day_listeners.len()
    }

    /// Deliver a season-change event. Returns how many listeners ran.
    pub fn emit_season_change(&mut self, event: &SeasonChanged, world: &mut W) -> usize {
        for (_, listener) in &mut self.season_listeners {
            listener(event, &mut *world);
        }
        self.season_listeners.len()
    }

    /// Number of registered listeners of `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::DayChange => self.day_listeners.len(),
            EventKind::SeasonChange => self.season_listeners.len(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl<W> Default for EventBus<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> core::fmt::Debug for EventBus<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("day_listeners", &self.day_listeners.len())
            .field("season_listeners", &self.season_listeners.len())
            .finish_non_exhaustive()
    }
}

fn remove_by_id<L>(listeners: &mut Vec<(u64, L)>, id: u64) -> bool {
    let before = listeners.len();
    listeners.retain(|(listener_id, _)| *listener_id != id);
    listeners.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        entries: Vec<String>,
    }

    fn day(day: u32) -> DayChanged {
        DayChanged {
            day,
            season: Season::Spring,
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut bus = EventBus::<Log>::new();
        let _first = bus.on_day_change(|e, log| log.entries.push(format!("a{}", e.day)));
        let _second = bus.on_day_change(|e, log| log.entries.push(format!("b{}", e.day)));

        let mut log = Log::default();
        assert_eq!(bus.emit_day_change(&day(3), &mut log), 2);
        assert_eq!(log.entries, vec!["a3", "b3"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let mut bus = EventBus::<Log>::new();
        let first = bus.on_day_change(|_, log| log.entries.push("a".to_owned()));
        let _second = bus.on_day_change(|_, log| log.entries.push("b".to_owned()));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));

        let mut log = Log::default();
        bus.emit_day_change(&day(1), &mut log);
        assert_eq!(log.entries, vec!["b"]);
    }

    #[test]
    fn kinds_are_independent() {
        let mut bus = EventBus::<Log>::new();
        let season = bus.on_season_change(|e, log| log.entries.push(e.started.to_string()));
        assert_eq!(season.kind(), EventKind::SeasonChange);
        assert_eq!(bus.listener_count(EventKind::DayChange), 0);
        assert_eq!(bus.listener_count(EventKind::SeasonChange), 1);

        let mut log = Log::default();
        assert_eq!(bus.emit_day_change(&day(28), &mut log), 0);
        let change = SeasonChanged {
            day: 28,
            ended: Season::Spring,
            started: Season::Summer,
        };
        assert_eq!(bus.emit_season_change(&change, &mut log), 1);
        assert_eq!(log.entries, vec!["summer"]);
    }

    #[test]
    fn listeners_keep_their_own_state() {
        let mut bus = EventBus::<Log>::new();
        let mut calls = 0_u32;
        let _sub = bus.on_day_change(move |_, log| {
            calls = calls.saturating_add(1);
            log.entries.push(calls.to_string());
        });

        let mut log = Log::default();
        bus.emit_day_change(&day(1), &mut log);
        bus.emit_day_change(&day(2), &mut log);
        assert_eq!(log.entries, vec!["1", "2"]);
    }
}
