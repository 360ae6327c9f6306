//! Error types for SQLite introspection.

use oxide_fluent_core::FluentError;

/// Errors that can occur while reading SQLite schema metadata.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    /// Database error while querying metadata.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<IntrospectError> for FluentError {
    fn from(err: IntrospectError) -> Self {
        Self::introspection(err)
    }
}

/// Result type for SQLite introspection.
pub type Result<T> = std::result::Result<T, IntrospectError>;
