//! Error types for SuffixCopy
//!
//! This module defines all error types used throughout the application,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SuffixCopy operations
#[derive(Error, Debug)]
pub enum SuffixCopyError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Source root is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Every candidate name for a destination is taken
    #[error("Rename limit of {limit} reached for '{base}'")]
    RenameLimitExceeded {
        /// Destination path without the numeric suffix
        base: PathBuf,
        /// Configured limit
        limit: u32,
    },

    /// Run operation called in the wrong state
    #[error("Cannot {operation} while run is {state}")]
    InvalidState {
        /// Attempted operation
        operation: &'static str,
        /// Current state name
        state: &'static str,
    },

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

impl SuffixCopyError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) | Self::NotADirectory(path) => Some(path),
            Self::RenameLimitExceeded { base, .. } => Some(base),
            _ => None,
        }
    }
}

/// Result type alias for SuffixCopy operations
pub type Result<T> = std::result::Result<T, SuffixCopyError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SuffixCopyError::io(path, e))
    }
}
