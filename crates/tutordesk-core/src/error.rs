//! Core error types for tutordesk-core.
//!
//! This module defines the error hierarchy using thiserror. Mutating
//! operations validate before touching state, so a `Validation` error
//! always means the call was a no-op.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tutordesk-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backup bundle errors
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the snapshot file
    #[error("Failed to read snapshot at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the snapshot file
    #[error("Failed to write snapshot at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file exists but is not a JSON key map
    #[error("Snapshot at {path} is not valid JSON: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Snapshot map failed to serialize
    #[error("Failed to encode snapshot: {0}")]
    EncodeFailed(String),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors raised at mutation boundaries.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid field value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Malformed HH:MM time string
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Day-of-week outside 0..=6
    #[error("Invalid day {0}: expected 0 (Sunday) through 6 (Saturday)")]
    InvalidDay(u8),

    /// Two weekly slots share the same day
    #[error("Duplicate schedule entry for day {0}")]
    DuplicateSlotDay(u8),

    /// A school class intersects another entry on the same day
    #[error("Conflicts with class '{name}' at {time}")]
    OverlappingSchoolSession { name: String, time: String },
}

/// Backup bundle errors. An import that fails applies nothing.
#[derive(Error, Debug)]
pub enum BackupError {
    /// Bundle has no top-level version marker
    #[error("Bundle has no version marker")]
    MissingVersion,

    /// Version marker present but not a supported schema
    #[error("Unsupported bundle version: {0}")]
    UnsupportedVersion(String),

    /// Bundle is missing the students/sessions collections
    #[error("Bundle is missing required collections (students, sessions)")]
    MissingCollections,

    /// Integrity hash does not match the payload
    #[error("Bundle integrity hash mismatch")]
    HashMismatch,

    /// Bundle payload failed to deserialize
    #[error("Malformed bundle: {0}")]
    Malformed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
