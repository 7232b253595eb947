mod config;
pub mod store;

pub use config::{Config, PredictionConfig, StreakConfig};
pub use store::Store;

use std::path::PathBuf;

/// Returns `~/.config/skystreak[-dev]/` based on SKYSTREAK_ENV.
///
/// Set SKYSTREAK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SKYSTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("skystreak-dev")
    } else {
        base_dir.join("skystreak")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
