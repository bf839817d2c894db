//! Configuration loading and typed config structures for a Homestead game.
//!
//! The canonical configuration lives in `homestead-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads the file. Every field
//! has a default, so an empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use homestead_types::Season;
use homestead_world::{GrowthSettings, SpoilageThresholds};

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "HOMESTEAD_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `homestead-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Calendar settings.
    #[serde(default)]
    pub time: TimeConfig,

    /// World geometry.
    #[serde(default)]
    pub world: WorldConfig,

    /// Ground-resource lifetimes.
    #[serde(default)]
    pub spoilage: SpoilageConfig,

    /// Plant growth timer.
    #[serde(default)]
    pub growth: GrowthConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HOMESTEAD_LOG` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.logging.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Spoilage thresholds for the sweep.
    pub const fn spoilage_thresholds(&self) -> SpoilageThresholds {
        SpoilageThresholds {
            fast: self.spoilage.fast,
            medium: self.spoilage.medium,
            slow: self.spoilage.slow,
        }
    }

    /// Growth timer settings with dormant season names resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a dormant season name is not a
    /// known season.
    pub fn growth_settings(&self) -> Result<GrowthSettings, ConfigError> {
        let dormant_seasons = parse_seasons(&self.growth.dormant_seasons)?;
        Ok(GrowthSettings {
            days_per_stage_default: self.growth.days_per_stage_default,
            dormant_seasons,
            dormancy_exempt_sub_categories: self.growth.dormancy_exempt_sub_categories.clone(),
        })
    }
}

/// Parse season names, accepting `fall` as an alias for autumn.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first unknown season.
pub fn parse_seasons(names: &[String]) -> Result<Vec<Season>, ConfigError> {
    names
        .iter()
        .map(|name| {
            Season::parse(name).ok_or_else(|| ConfigError::Invalid {
                reason: format!("unknown season: {name}"),
            })
        })
        .collect()
}

/// Calendar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Number of days in one season.
    #[serde(default = "default_days_per_season")]
    pub days_per_season: u32,

    /// Ordered list of season names forming the annual cycle.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<String>,

    /// Day index a new game starts on.
    #[serde(default)]
    pub starting_day: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            days_per_season: default_days_per_season(),
            seasons: default_seasons(),
            starting_day: 0,
        }
    }
}

/// World geometry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Tile edge length in pixels, used to compute shed positions.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
        }
    }
}

/// Day thresholds per spoilage category. `never` has no threshold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpoilageConfig {
    /// Lifetime of `fast` resources.
    #[serde(default = "default_fast")]
    pub fast: u32,

    /// Lifetime of `medium` resources.
    #[serde(default = "default_medium")]
    pub medium: u32,

    /// Lifetime of `slow` resources.
    #[serde(default = "default_slow")]
    pub slow: u32,
}

impl Default for SpoilageConfig {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            medium: default_medium(),
            slow: default_slow(),
        }
    }
}

/// Plant growth configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrowthConfig {
    /// Days per stage for species that do not set their own.
    #[serde(default = "default_days_per_stage")]
    pub days_per_stage_default: u32,

    /// Seasons in which plants stop growing.
    #[serde(default = "default_dormant_seasons")]
    pub dormant_seasons: Vec<String>,

    /// Sub-categories that keep growing through dormant seasons.
    #[serde(default = "default_exempt_sub_categories")]
    pub dormancy_exempt_sub_categories: Vec<String>,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            days_per_stage_default: default_days_per_stage(),
            dormant_seasons: default_dormant_seasons(),
            dormancy_exempt_sub_categories: default_exempt_sub_categories(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Apply the `HOMESTEAD_LOG` override if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LOG_LEVEL_ENV) {
            if !val.trim().is_empty() {
                self.level = val;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_days_per_season() -> u32 {
    28
}

fn default_seasons() -> Vec<String> {
    Season::ALL.iter().map(|s| s.as_str().to_owned()).collect()
}

const fn default_tile_size() -> u32 {
    32
}

const fn default_fast() -> u32 {
    homestead_world::spoilage::DEFAULT_FAST_DAYS
}

const fn default_medium() -> u32 {
    homestead_world::spoilage::DEFAULT_MEDIUM_DAYS
}

const fn default_slow() -> u32 {
    homestead_world::spoilage::DEFAULT_SLOW_DAYS
}

const fn default_days_per_stage() -> u32 {
    homestead_world::growth::DEFAULT_DAYS_PER_STAGE
}

fn default_dormant_seasons() -> Vec<String> {
    vec!["winter".to_owned()]
}

fn default_exempt_sub_categories() -> Vec<String> {
    vec!["tree".to_owned()]
}

fn default_log_level() -> String {
    "info".to_owned()
}
