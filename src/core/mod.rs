use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error types for the wavecontrol application.
///
/// Covers configuration loading and validation, and transport script
/// handling. Player failures have their own type,
/// [`WaveformError`](crate::services::waveform::WaveformError).
#[derive(Error, Debug)]
pub enum WavecontrolError {
    /// Configuration field missing or invalid
    #[error("invalid config field '{field}' in {component}: {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Component containing the field
        component: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error (for compatibility)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// TOML serialisation error
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialisation error
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Player could not be created
    #[error(transparent)]
    Waveform(#[from] crate::services::waveform::WaveformError),

    /// Transport script step failed
    #[error("script step {step} ({action}) failed: {reason}")]
    Script {
        /// One-based step number
        step: usize,
        /// Action of the failing step
        action: String,
        /// What went wrong
        reason: String,
    },
}

/// A specialized `Result` type for wavecontrol operations.
pub type Result<T> = std::result::Result<T, WavecontrolError>;

impl WavecontrolError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        WavecontrolError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error carrying the path that failed.
    pub fn io_at(error: impl std::fmt::Display, path: &Path) -> Self {
        WavecontrolError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates an invalid-field error.
    pub fn invalid_field(component: &str, field: &str, reason: impl Into<String>) -> Self {
        WavecontrolError::InvalidConfigField {
            field: field.to_string(),
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}
