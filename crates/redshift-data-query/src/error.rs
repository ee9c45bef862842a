//! Query compilation errors.

/// Errors raised while preparing a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No columns were requested.
    #[error("no columns requested")]
    NoColumns,

    /// A requested or filtered field is not part of the table schema.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Convenience result type for query preparation.
pub type QueryResult<T> = Result<T, QueryError>;
