//! Directory error types.

use thiserror::Error;

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Unique constraint violation.
    #[error("Duplicate user: {field} '{value}' already exists")]
    Duplicate {
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Invalid data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Backend not reachable.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// Internal error.
    #[error("Internal directory error: {0}")]
    Internal(String),
}

impl DirectoryError {
    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field,
            value: value.into(),
        }
    }

    /// Checks if this is a duplicate error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
