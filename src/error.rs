//! Error types for quirks operations.

use crate::types::ArrowTypeId;

/// Result type for quirks operations.
pub type Result<T> = std::result::Result<T, QuirksError>;

/// Errors that can occur while bootstrapping or driving a backend.
#[derive(Debug, thiserror::Error)]
pub enum QuirksError {
    /// The backend is not configured in this environment. Callers skip the
    /// backend instead of failing.
    #[error("{backend} unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },

    #[error("Database error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No SQL type name for Arrow type {0}")]
    UnsupportedType(ArrowTypeId),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl QuirksError {
    /// True for the "skip this backend" signal.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, QuirksError::Unavailable { .. })
    }
}
