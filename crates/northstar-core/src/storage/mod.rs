mod config;

pub use config::{Config, OutputConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/northstar[-dev]/` based on NORTHSTAR_ENV.
///
/// Set NORTHSTAR_ENV=dev to use the development data directory.
/// NORTHSTAR_HOME replaces `~/.config` as the base directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = match std::env::var_os("NORTHSTAR_HOME") {
        Some(home) => PathBuf::from(home),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("NORTHSTAR_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("northstar-dev")
    } else {
        base_dir.join("northstar")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
