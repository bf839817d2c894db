//! Read-only view of the game clock consumed by the engines.
//!
//! The engines never advance time themselves. They read the current day
//! and season through [`Clock`], which the session's clock implements.
//! [`ClockReading`] is a frozen copy, handy inside event listeners and
//! tests.

use homestead_types::Season;

/// Current day index and season.
pub trait Clock {
    /// Current day index (0-based).
    fn current_day(&self) -> u32;

    /// Season active on the current day.
    fn current_season(&self) -> Season;
}

/// A snapshot of the clock at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// Day index.
    pub day: u32,
    /// Season on that day.
    pub season: Season,
}

impl ClockReading {
    /// Create a reading for `day` in `season`.
    pub const fn new(day: u32, season: Season) -> Self {
        Self { day, season }
    }
}

impl Clock for ClockReading {
    fn current_day(&self) -> u32 {
        self.day
    }

    fn current_season(&self) -> Season {
        self.season
    }
}
