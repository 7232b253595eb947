//! TOML-based application configuration.
//!
//! Stores the tunable parts of the engagement rules:
//! - Streak milestone ladder and weekly freeze grant
//! - Prediction milestone threshold
//!
//! Configuration is stored at `~/.config/skystreak/config.toml`. Scoring
//! constants are deliberately not configurable; they are part of the game
//! contract.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Streak-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Ascending milestone ladder, in days.
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,
    /// Freezes granted at the start of each ISO week.
    #[serde(default = "default_weekly_freezes")]
    pub weekly_freezes: u32,
}

/// Prediction game configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Lifetime prediction count after which milestone events fire.
    #[serde(default = "default_milestone_threshold")]
    pub milestone_threshold: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/skystreak/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub predictions: PredictionConfig,
}

fn default_milestones() -> Vec<u32> {
    vec![7, 14, 30, 60, 100, 200, 365]
}
fn default_weekly_freezes() -> u32 {
    1
}
fn default_milestone_threshold() -> u32 {
    10
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            milestones: default_milestones(),
            weekly_freezes: default_weekly_freezes(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            milestone_threshold: default_milestone_threshold(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            streak: StreakConfig::default(),
            predictions: PredictionConfig::default(),
        }
    }
}

impl Config {
    /// Path to the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    /// Returns an error if an existing file fails to parse or the default
    /// cannot be written.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.streak.milestones, cfg.streak.milestones);
        assert_eq!(parsed.streak.weekly_freezes, 1);
        assert_eq!(parsed.predictions.milestone_threshold, 10);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.streak.milestones, vec![7, 14, 30, 60, 100, 200, 365]);
    }

    #[test]
    fn partial_section_fills_remaining_fields() {
        let parsed: Config = toml::from_str("[streak]\nweekly_freezes = 2\n").unwrap();
        assert_eq!(parsed.streak.weekly_freezes, 2);
        assert_eq!(parsed.streak.milestones.len(), 7);
    }
}
