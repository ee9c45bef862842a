//! Error types for the connector core.

/// Core error type for connector configuration and identifiers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A table identifier contains a character that cannot be quoted.
    #[error("invalid identifier {0:?}: double quotes are not allowed")]
    InvalidIdentifier(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
