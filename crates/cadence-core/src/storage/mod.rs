mod config;

pub use config::CONFIG_FILE;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Overrides the data directory when set.
pub const HOME_ENV: &str = "CADENCE_HOME";
/// `dev` selects the development data directory.
pub const ENV_ENV: &str = "CADENCE_ENV";

/// Returns `$CADENCE_HOME`, else `~/.config/cadence[-dev]/` based on
/// `CADENCE_ENV`. The directory is created if missing.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var(ENV_ENV).unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("cadence-dev")
            } else {
                base_dir.join("cadence")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
