mod config;
mod store;

pub use config::{Config, MonitorConfig, ScoringConfig};
pub use store::{keys, Store};

use std::path::PathBuf;

/// Returns `~/.config/taskpet[-dev]/` based on TASKPET_ENV.
///
/// Set TASKPET_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKPET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskpet-dev")
    } else {
        base_dir.join("taskpet")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
