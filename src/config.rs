//! Configuration System
//!
//! Hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (WHEREDB_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [timeline]
//! accuracy_filter = 300.0
//! new_point_distance = 100.0
//! new_point_duration_secs = 10800
//! accurate_date_cutoff = "2020-01-01"
//! previous_accurate_for_days = 7
//!
//! [sources]
//! sample_files = ["~/data/gpslogger.json"]
//! home_file = "~/data/home.json"
//!
//! [storage]
//! database_location = "~/data/where_db.json"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! WHEREDB_STORAGE__DATABASE_LOCATION=/custom/where_db.json
//! WHEREDB_TIMELINE__ACCURACY_FILTER=150.0
//! ```

use chrono::{Duration, NaiveDate};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compact::{
    DEFAULT_ACCURACY_FILTER, DEFAULT_NEW_POINT_DISTANCE, DEFAULT_NEW_POINT_DURATION_SECS,
};
use crate::timeline::TimelineParams;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compaction thresholds and fallback heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Meters of reported accuracy a sample must beat to be used
    #[serde(default = "default_accuracy_filter")]
    pub accuracy_filter: f64,

    /// How far from the last point (meters) before we keep a new one
    #[serde(default = "default_new_point_distance")]
    pub new_point_distance: f64,

    /// How long since the last point before we keep a new one anyway
    #[serde(default = "default_new_point_duration_secs")]
    pub new_point_duration_secs: u64,

    /// Date after which accurate locations are trusted over fallbacks.
    /// Both this and `previous_accurate_for_days` must be set for the
    /// continuation heuristic to apply at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accurate_date_cutoff: Option<NaiveDate>,

    /// How many days a stale accurate point keeps standing in for missing
    /// data before the cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_accurate_for_days: Option<i64>,
}

/// Input file locations
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourcesConfig {
    /// Sample source exports, each a JSON array of raw samples
    #[serde(default)]
    pub sample_files: Vec<PathBuf>,

    /// Home history export, a JSON array of home entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_file: Option<PathBuf>,
}

/// Database file location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Where `query` reads by default (`generate` writes to stdout unless
    /// given `--out`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_location: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_accuracy_filter() -> f64 {
    DEFAULT_ACCURACY_FILTER
}
fn default_new_point_distance() -> f64 {
    DEFAULT_NEW_POINT_DISTANCE
}
fn default_new_point_duration_secs() -> u64 {
    DEFAULT_NEW_POINT_DURATION_SECS
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (WHEREDB_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("WHEREDB_").split("__"))
            .extract()
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("WHEREDB_").split("__"))
            .extract()
    }
}

impl TimelineConfig {
    pub fn new_point_duration(&self) -> Duration {
        Duration::seconds(self.new_point_duration_secs as i64)
    }

    pub fn params(&self) -> TimelineParams {
        TimelineParams {
            accurate_date_cutoff: self.accurate_date_cutoff,
            previous_accurate_for_days: self.previous_accurate_for_days,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            accuracy_filter: default_accuracy_filter(),
            new_point_distance: default_new_point_distance(),
            new_point_duration_secs: default_new_point_duration_secs(),
            accurate_date_cutoff: None,
            previous_accurate_for_days: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeline.accuracy_filter, 300.0);
        assert_eq!(config.timeline.new_point_distance, 100.0);
        assert_eq!(config.timeline.new_point_duration_secs, 10_800);
        assert!(config.timeline.accurate_date_cutoff.is_none());
        assert!(config.timeline.previous_accurate_for_days.is_none());
        assert!(config.storage.database_location.is_none());
    }

    #[test]
    fn test_default_heuristics_disabled() {
        let params = Config::default().timeline.params();
        assert!(params.accurate_date_cutoff.is_none());
        assert!(params.previous_accurate_for_days.is_none());
    }

    #[test]
    fn test_default_logging_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_new_point_duration() {
        let config = Config::default();
        assert_eq!(config.timeline.new_point_duration(), Duration::hours(3));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.timeline.accurate_date_cutoff = NaiveDate::from_ymd_opt(2020, 1, 1);
        config.storage.database_location = Some(PathBuf::from("/tmp/where_db.json"));

        let toml_str = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            back.timeline.accurate_date_cutoff,
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(
            back.storage.database_location,
            Some(PathBuf::from("/tmp/where_db.json"))
        );
    }

    #[test]
    fn test_cutoff_parses_from_toml() {
        let config: Config = toml::from_str(
            r#"
            [timeline]
            accurate_date_cutoff = "2020-06-15"
            previous_accurate_for_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(
            config.timeline.accurate_date_cutoff,
            NaiveDate::from_ymd_opt(2020, 6, 15)
        );
        assert_eq!(config.timeline.previous_accurate_for_days, Some(7));
    }
}
