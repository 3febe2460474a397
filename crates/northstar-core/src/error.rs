//! Core error types for northstar-core.
//!
//! The scheduler itself never fails: missing data is defaulted and an
//! unsatisfiable query is just an empty answer. Errors only come from the
//! edges, i.e. configuration files and input snapshots.

use std::path::PathBuf;
use thiserror::Error;

use crate::rules::ParseError;

/// Core error type for northstar-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Clause text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not locate or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Hour outside 0-23
    #[error("Hour {hour} out of range for '{field}' (expected 0-23)")]
    HourOutOfRange { field: String, hour: u32 },

    /// Window whose start is after its end
    #[error("Invalid window '{field}': start ({start}) must not be after end ({end})")]
    InvalidWindow { field: String, start: u32, end: u32 },

    /// Two windows sharing an hour
    #[error("Windows '{first}' and '{second}' overlap")]
    OverlappingWindows { first: String, second: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
