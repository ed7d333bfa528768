//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading configuration or building a run context.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the config file.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },

    /// No target labels were configured, so no issue could ever match.
    #[error("At least one target label is required")]
    EmptyTargetLabels,

    /// The per-run issue quota must be positive.
    #[error("Max issues per run must be positive, got {value}")]
    InvalidQuota { value: usize },
}
