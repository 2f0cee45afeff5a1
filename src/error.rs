//! Error types for SynfulCircuit
//!
//! One error enum covers configuration, backing-store and argument failures.
//! Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SynfulCircuit operations
pub type Result<T> = std::result::Result<T, SynfulError>;

/// Error type for SynfulCircuit operations
#[derive(Error, Debug)]
pub enum SynfulError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backing store could not be opened
    #[error("Failed to open link store {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A query against the backing store failed
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A caller violated an operation precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SynfulError {
    /// Whether retrying the same call could succeed
    ///
    /// Store errors leave the cache untouched, so the fetch can be reattempted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SynfulError::Store(_) | SynfulError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = SynfulError::InvalidArgument("input_site or output_site".to_string());
        assert_eq!(err.to_string(), "Invalid argument: input_site or output_site");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_store_error_is_retryable() {
        let err: SynfulError = rusqlite::Error::InvalidQuery.into();
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("Store error"));
    }
}
