//! Core error types for setflow-core.
//!
//! The hierarchy uses thiserror: one top-level [`CoreError`] with
//! per-subsystem enums folded in via `#[from]`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Routine validation errors
    #[error("routine error: {0}")]
    Routine(#[from] RoutineError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Routine store errors
    #[error("routine store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors rejected before any session state exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutineError {
    /// A session cannot start on a routine with no exercises.
    #[error("routine has no exercises")]
    Empty,

    /// Every exercise needs at least one set.
    #[error("exercise {index} has zero sets")]
    ZeroSets { index: usize },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Routine store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No stored routine matches the id or name prefix.
    #[error("no routine matching '{0}'")]
    NotFound(String),

    /// A name prefix resolved to more than one routine.
    #[error("'{0}' matches more than one routine")]
    AmbiguousName(String),

    /// The file is neither a stored routine nor a bare exercise array.
    #[error("not a routine file: {0}")]
    InvalidFormat(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
