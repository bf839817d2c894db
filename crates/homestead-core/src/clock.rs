//! Game clock and calendar tracking.
//!
//! The clock is the single source of truth for in-game time. It counts
//! whole days and derives the season from the day count and the
//! configured calendar. Nothing else stores the season independently.
//!
//! Advancing a day reports whether the step crossed a season boundary so
//! the session can run the season transition before the daily sweeps.

use homestead_types::Season;
use homestead_world::Clock;

use crate::config::{ConfigError, TimeConfig, parse_seasons};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u32::MAX")]
    DayOverflow,

    /// Invalid time configuration (e.g. zero days per season).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<ConfigError> for ClockError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

/// A season boundary crossed by [`GameClock::advance_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonChange {
    /// The season that ended.
    pub ended: Season,
    /// The season that began.
    pub started: Season,
}

/// Result of advancing the clock by one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAdvance {
    /// The new day index.
    pub day: u32,
    /// Set when the new day starts a new season.
    pub season_change: Option<SeasonChange>,
}

/// Day counter with season derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    /// Current day index (0-based).
    day: u32,

    /// Number of days per season.
    days_per_season: u32,

    /// Ordered list of seasons that form the year.
    seasons: Vec<Season>,
}

impl GameClock {
    /// Create a clock from a time configuration, starting on
    /// `starting_day`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_season` is 0, the
    /// season list is empty, or a season name is unknown.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        let seasons = parse_seasons(&config.seasons)?;
        Self::from_parts(config.starting_day, config.days_per_season, seasons)
    }

    /// Create a clock from explicit parameters (used for state
    /// restoration and tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_season` is 0
    /// or the season list is empty.
    pub fn from_parts(
        day: u32,
        days_per_season: u32,
        seasons: Vec<Season>,
    ) -> Result<Self, ClockError> {
        if days_per_season == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "days_per_season must be at least 1".to_owned(),
            });
        }
        if seasons.is_empty() {
            return Err(ClockError::InvalidConfig {
                reason: "at least one season must be configured".to_owned(),
            });
        }
        Ok(Self {
            day,
            days_per_season,
            seasons,
        })
    }

    /// Advance the clock by one day.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the day counter would exceed
    /// `u32::MAX`.
    pub fn advance_day(&mut self) -> Result<DayAdvance, ClockError> {
        let before = self.season();
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        let after = self.season();

        let season_change = (self.day_within_season() == 0).then_some(SeasonChange {
            ended: before,
            started: after,
        });
        Ok(DayAdvance {
            day: self.day,
            season_change,
        })
    }

    /// Current day index.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Configured number of days per season.
    pub const fn days_per_season(&self) -> u32 {
        self.days_per_season
    }

    /// The complete season list.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    /// Index of the current season within the season list.
    ///
    /// The index is `(day / days_per_season) % season_count`.
    pub fn season_index(&self) -> usize {
        let raw = self.day.checked_div(self.days_per_season).unwrap_or(0);
        let raw = usize::try_from(raw).unwrap_or(0);
        raw.checked_rem(self.seasons.len()).unwrap_or(0)
    }

    /// Season active on the current day.
    pub fn season(&self) -> Season {
        // The constructor guarantees a non-empty season list.
        self.seasons
            .get(self.season_index())
            .copied()
            .unwrap_or(Season::Spring)
    }

    /// Day offset within the current season (0-based).
    pub fn day_within_season(&self) -> u32 {
        self.day.checked_rem(self.days_per_season).unwrap_or(0)
    }

    /// Days until the next season begins.
    pub fn days_until_season_change(&self) -> u32 {
        self.days_per_season
            .saturating_sub(self.day_within_season())
    }
}

impl Clock for GameClock {
    fn current_day(&self) -> u32 {
        self.day
    }

    fn current_season(&self) -> Season {
        self.season()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_clock(days_per_season: u32) -> GameClock {
        GameClock::from_parts(0, days_per_season, Season::ALL.to_vec()).unwrap()
    }

    #[test]
    fn clock_starts_at_configured_day() {
        let config = TimeConfig {
            starting_day: 30,
            ..TimeConfig::default()
        };
        let clock = GameClock::new(&config).unwrap();
        assert_eq!(clock.day(), 30);
        assert_eq!(clock.season(), Season::Summer);
    }

    #[test]
    fn season_cycles_through_year() {
        let mut clock = make_clock(2);
        let mut seen = vec![clock.season()];
        for _ in 0..8 {
            clock.advance_day().unwrap();
            seen.push(clock.season());
        }
        assert_eq!(
            seen,
            vec![
                Season::Spring,
                Season::Spring,
                Season::Summer,
                Season::Summer,
                Season::Autumn,
                Season::Autumn,
                Season::Winter,
                Season::Winter,
                Season::Spring,
            ]
        );
    }

    #[test]
    fn advance_reports_season_boundary() {
        let mut clock = make_clock(28);
        for day in 1..28 {
            let step = clock.advance_day().unwrap();
            assert_eq!(step.day, day);
            assert!(step.season_change.is_none());
        }
        let step = clock.advance_day().unwrap();
        assert_eq!(step.day, 28);
        assert_eq!(
            step.season_change,
            Some(SeasonChange {
                ended: Season::Spring,
                started: Season::Summer,
            })
        );
        assert_eq!(clock.days_until_season_change(), 28);
    }

    #[test]
    fn winter_wraps_to_spring() {
        let mut clock = GameClock::from_parts(111, 28, Season::ALL.to_vec()).unwrap();
        assert_eq!(clock.season(), Season::Winter);
        let step = clock.advance_day().unwrap();
        assert_eq!(
            step.season_change,
            Some(SeasonChange {
                ended: Season::Winter,
                started: Season::Spring,
            })
        );
    }

    #[test]
    fn single_season_year_still_reports_boundary() {
        let mut clock = GameClock::from_parts(0, 1, vec![Season::Summer]).unwrap();
        let step = clock.advance_day().unwrap();
        assert_eq!(
            step.season_change,
            Some(SeasonChange {
                ended: Season::Summer,
                started: Season::Summer,
            })
        );
    }

    #[test]
    fn fall_alias_is_accepted() {
        let config = TimeConfig {
            seasons: vec!["fall".to_owned(), "winter".to_owned()],
            ..TimeConfig::default()
        };
        let clock = GameClock::new(&config).unwrap();
        assert_eq!(clock.seasons(), &[Season::Autumn, Season::Winter]);
    }

    #[test]
    fn invalid_configs_rejected() {
        assert!(matches!(
            GameClock::from_parts(0, 0, Season::ALL.to_vec()),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(matches!(
            GameClock::from_parts(0, 28, Vec::new()),
            Err(ClockError::InvalidConfig { .. })
        ));
        let config = TimeConfig {
            seasons: vec!["monsoon".to_owned()],
            ..TimeConfig::default()
        };
        assert!(matches!(
            GameClock::new(&config),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn day_overflow_is_an_error() {
        let mut clock = GameClock::from_parts(u32::MAX, 28, Season::ALL.to_vec()).unwrap();
        assert!(matches!(clock.advance_day(), Err(ClockError::DayOverflow)));
        assert_eq!(clock.day(), u32::MAX);
    }
}
