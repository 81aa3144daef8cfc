//! Error handling types for formatter-arbiter
//!
//! Stale settings and user cancellation are ordinary outcomes, not errors.
//! What remains here are configuration I/O failures.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration and persistence operations
#[derive(Debug, Error)]
pub enum ArbiterError {
    /// Settings file exists but could not be read
    #[error("Failed to read settings from {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    /// Settings file is not valid TOML for the expected shape
    #[error("Failed to parse settings in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The store rejected a write of the default formatter
    #[error("Failed to write default formatter: {message}")]
    ConfigWrite { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for arbiter operations
pub type ArbiterResult<T> = Result<T, ArbiterError>;

/// Helper functions for common error patterns
impl ArbiterError {
    /// Create a read error for a settings file
    pub fn config_read(path: &Path, message: impl Into<String>) -> Self {
        ArbiterError::ConfigRead {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a parse error for a settings file
    pub fn config_parse(path: &Path, message: impl Into<String>) -> Self {
        ArbiterError::ConfigParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn config_write(message: impl Into<String>) -> Self {
        ArbiterError::ConfigWrite {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ArbiterError::Internal(message.into())
    }
}
