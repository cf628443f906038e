//! Configuration loading
//!
//! Configuration is read from `$XDG_CONFIG_HOME/habit-streaks/config.toml`
//! (or the platform config directory) when present, or from an explicit
//! `--config` path. Every setting has a default, so a missing default file is
//! not an error.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite database file; overridden by `--database`
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Windows and calendar policy used by the dashboard rollups
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// First day of the week used for weekly targets
    #[serde(deserialize_with = "deserialize_weekday")]
    pub week_start: Weekday,
    /// Days covered by the weekly completion rate
    pub weekly_window_days: u32,
    /// Days covered by the monthly completion rate
    pub monthly_window_days: u32,
    /// Days shown on the calendar heatmap
    pub heatmap_days: u32,
    /// Days of history on a habit's detail view
    pub detail_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            weekly_window_days: 7,
            monthly_window_days: 30,
            heatmap_days: 84,
            detail_days: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

fn deserialize_weekday<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| serde::de::Error::custom(format!("unknown weekday '{}'", raw)))
}

impl Config {
    /// Path of the default config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)?;
        Some(base.join("habit-streaks").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one the default path is used if
    /// the file is there, and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })?;

        tracing::info!("Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let analytics = &self.analytics;
        for (name, value) in [
            ("weekly_window_days", analytics.weekly_window_days),
            ("monthly_window_days", analytics.monthly_window_days),
            ("heatmap_days", analytics.heatmap_days),
            ("detail_days", analytics.detail_days),
        ] {
            if !(1..=366).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "analytics.{} must be between 1 and 366, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
