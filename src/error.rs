//! Error types for the term-vector construction engine
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.
//!
//! The taxonomy is deliberately small: configuration errors and index-access
//! errors are fatal for the whole run and are raised before any partial
//! vector store can be observed. Per-term anomalies (a malformed posting, a
//! term failing a filter) are never errors; they are logged with `tracing`
//! and skipped.

use crate::index::IndexAccessError;
use crate::vector::VectorError;
use thiserror::Error;

/// Main error type for vector-building runs
#[derive(Error, Debug)]
pub enum BuildError {
    /// Invalid parameter combinations, caught before accumulation starts
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// The text index collaborator could not be read
    #[error(transparent)]
    IndexAccess(#[from] IndexAccessError),

    /// Vector arithmetic rejected an operand (dimension or type mismatch)
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl BuildError {
    /// Convenience constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::IndexAccess(_) => "INDEX_ACCESS_ERROR",
            Self::Vector(_) => "VECTOR_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Config { .. } => vec![
                "Check the run configuration against the recognized options",
                "seed_length must not exceed dimension, and truncated_left_radius must not exceed the window radius",
            ],
            Self::IndexAccess(_) => vec![
                "Verify the index path and that the content fields were indexed with positions",
                "Rebuild the text index if it appears corrupted",
            ],
            Self::Vector(_) => vec![
                "Ensure all vectors in a run share the configured dimension and type",
                "Initial term vectors must be built with the same configuration as the run",
            ],
            Self::General(_) => vec![],
        }
    }
}

/// Result type alias for vector-building operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, BuildError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, BuildError> {
        self.map_err(|e| BuildError::General(format!("{msg}: {e}")))
    }
}
