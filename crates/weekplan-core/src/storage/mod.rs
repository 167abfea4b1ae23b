mod config;
pub mod database;
pub mod migrations;

pub use config::{CatalogSection, Config, SchedulerSection};
pub use database::{Database, NewItem};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the weekplan data directory, creating it if needed.
///
/// `WEEKPLAN_DATA_DIR` overrides the location outright. Otherwise it is
/// `~/.config/weekplan/`, or `~/.config/weekplan-dev/` when
/// `WEEKPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("WEEKPLAN_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("weekplan-dev")
            } else {
                base_dir.join("weekplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
