//! Error types for the feedback portal
//!
//! Structured errors are defined with thiserror; anyhow is accepted at the
//! glue edges and folded into [`PortalError::Other`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for feedback portal operations
#[derive(Error, Debug)]
pub enum PortalError {
    /// Caller supplied empty or malformed input; nothing was mutated
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted file header does not match the expected schema
    #[error("Schema mismatch in {}: expected [{expected}], found [{found}]", .path.display())]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A persisted row could not be decoded under the current schema
    #[error("Malformed row {row} in {}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    /// Classification or generation backend unreachable
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Write could not complete; the previously persisted file is untouched
    #[error("Persistence failure for {}: {source}", .path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl PortalError {
    /// True for errors that reject the input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, PortalError::Validation(_))
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PortalError::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for feedback portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Convert anyhow::Error to PortalError
impl From<anyhow::Error> for PortalError {
    fn from(err: anyhow::Error) -> Self {
        PortalError::Other(err.to_string())
    }
}
