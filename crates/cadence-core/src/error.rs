//! Core error types for cadence-core.
//!
//! This module defines the error hierarchy using thiserror. Scheduling
//! itself is partial-success: unplaceable tasks become warnings, not errors.
//! Errors are reserved for precondition violations (malformed times, invalid
//! inputs or coefficients) and for config persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed `HH:MM` or `HH:MM-HH:MM` string
    #[error("Invalid time '{input}': expected {expected}")]
    TimeFormat {
        input: String,
        expected: &'static str,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl CoreError {
    pub(crate) fn time_format(input: &str, expected: &'static str) -> Self {
        CoreError::TimeFormat {
            input: input.to_string(),
            expected,
        }
    }
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown or read-only configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not locate the data directory
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Value outside its allowed range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Empty string where content is required
    #[error("Field '{0}' must not be empty")]
    Empty(String),
}

impl ValidationError {
    pub(crate) fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
