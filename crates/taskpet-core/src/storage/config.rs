//! TOML-based application configuration.
//!
//! Stores the tunables that differ between deployments:
//! - Starting score values for a first run
//! - Deadline sweep cadence
//!
//! Configuration is stored at `~/.config/taskpet/config.toml`.

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError};

/// Scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points on first run, before any persisted state exists.
    #[serde(default = "default_initial_points")]
    pub initial_points: i64,
    /// Health on first run. Full health by default.
    #[serde(default = "default_initial_health")]
    pub initial_health: i64,
}

/// Deadline monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/taskpet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

fn default_initial_points() -> i64 {
    50
}
fn default_initial_health() -> i64 {
    100
}
fn default_sweep_interval_secs() -> u64 {
    1
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            initial_points: default_initial_points(),
            initial_health: default_initial_health(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when no file
    /// exists yet.
    pub fn load() -> Result<Self, CoreError> {
        let path = data_dir()?.join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| {
            ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Write the configuration back to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = data_dir()?.join("config.toml");
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.scoring.initial_points, 50);
        assert_eq!(config.scoring.initial_health, 100);
        assert_eq!(config.monitor.sweep_interval_secs, 1);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str("[scoring]\ninitial_health = 50\n").unwrap();
        assert_eq!(config.scoring.initial_health, 50);
        assert_eq!(config.scoring.initial_points, 50);
        assert_eq!(config.monitor.sweep_interval_secs, 1);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scoring.initial_health, 100);
    }
}
