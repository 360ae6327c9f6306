//! Error types for migration authoring and schema checks.

/// Errors that can occur while authoring a migration.
#[derive(Debug, thiserror::Error)]
pub enum FluentError {
    /// A builder was requested without a collaborator it cannot work without.
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The schema introspection collaborator failed.
    #[error("Schema introspection failed: {0}")]
    Introspection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A provider identifier could not be recognised.
    #[error("Unknown database provider: {0}")]
    UnknownProvider(String),

    /// A migration body returned an error of its own.
    #[error("Migration '{migration}' failed: {message}")]
    Migration {
        /// Name of the migration.
        migration: String,
        /// Error message.
        message: String,
    },
}

impl FluentError {
    /// Wraps an error raised by a schema introspection collaborator.
    pub fn introspection(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Introspection(err.into())
    }
}

/// Result type for migration authoring.
pub type Result<T> = std::result::Result<T, FluentError>;
