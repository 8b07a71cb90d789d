//! Unified error handling for Browserprint
//!
//! This crate provides a single error type used across all Browserprint components.
//! Probe-level capability failures never reach this type: they are recovered
//! inside the probe and recorded as sentinel values. What remains here are
//! configuration, I/O, payload and transport faults, plus collection defects.

use std::io;
use std::path::PathBuf;

/// Result type alias using BrowserprintError
pub type Result<T> = std::result::Result<T, BrowserprintError>;

/// Unified error type for all Browserprint operations
#[derive(thiserror::Error, Debug)]
pub enum BrowserprintError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ============================================================================
    // Configuration and Settings Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Collection Defects
    // ============================================================================
    #[error("Duplicate signal key in record: {0}")]
    DuplicateSignal(String),

    #[error("Invalid signal key {key:?}: {reason}")]
    InvalidSignalKey {
        key: String,
        reason: String,
    },

    // ============================================================================
    // Payload and Transport Errors
    // ============================================================================
    #[error("Payload too large: {size} bytes (max {max_size} bytes)")]
    PayloadTooLarge {
        size: usize,
        max_size: usize,
    },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Output sink failed: {0}")]
    Sink(String),
}

impl BrowserprintError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an upload error from a string
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create a sink error from a string
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// True for errors that indicate a bug in collection itself
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::DuplicateSignal(_) | Self::InvalidSignalKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_classification() {
        assert!(BrowserprintError::DuplicateSignal("language".into()).is_defect());
        let invalid = BrowserprintError::InvalidSignalKey {
            key: "bad key".into(),
            reason: "space".into(),
        };
        assert!(invalid.is_defect());
        assert!(!BrowserprintError::config("bad").is_defect());
        assert!(!BrowserprintError::upload("refused").is_defect());
    }

    #[test]
    fn test_display_messages() {
        let err = BrowserprintError::PayloadTooLarge { size: 10, max_size: 5 };
        assert_eq!(err.to_string(), "Payload too large: 10 bytes (max 5 bytes)");

        let err = BrowserprintError::invalid_config("upload.endpoint", "must be http or https");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for upload.endpoint: must be http or https"
        );
    }
}
