//! Client error types.
//!
//! Every failure carries a short message for the end user; the variants that
//! involved a round trip also carry a verbose debug payload (the signed
//! request with secrets redacted, and the raw response body).

use redshift_data_auth::AuthError;
use redshift_data_model::StatementStatus;

/// Errors raised by the Redshift Data API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required identifier is missing, or the credential exchange failed.
    /// No Data API call was made.
    #[error("{message}")]
    Configuration {
        /// Short text for the end user.
        message: String,
        /// Raw response body when a remote call was involved.
        debug: Option<String>,
    },

    /// The service answered with a non-2xx status.
    #[error("failed to {action}({status}): {}", format_code_message(.code.as_deref(), .message))]
    Api {
        /// Operation name, e.g. `DescribeTable`.
        action: String,
        /// HTTP status code.
        status: u16,
        /// Service error code, e.g. `ValidationException`.
        code: Option<String>,
        /// Service error message, or the raw body when it was not JSON.
        message: String,
        /// Redacted request followed by the raw response body.
        debug: String,
    },

    /// The statement reached `FAILED` or `ABORTED`.
    #[error("Query({}) failed: {error}", format_query_id(.query_id.as_ref()))]
    StatementFailed {
        /// Data API statement identifier.
        statement_id: String,
        /// Redshift query identifier, when the statement reached the engine.
        query_id: Option<i64>,
        /// `FAILED` or `ABORTED`.
        status: StatementStatus,
        /// Error text reported by Redshift.
        error: String,
        /// The final `DescribeStatement` output as JSON.
        debug: String,
    },

    /// `DescribeTable` returned no columns on its first page: the table does
    /// not exist or the caller cannot see it.
    #[error("You may not have access to table {table}: the column list is empty")]
    SchemaAccess {
        /// `database.schema.table`.
        table: String,
    },

    /// The request could not be signed.
    #[error("signing failed: {0}")]
    Auth(#[from] AuthError),

    /// The HTTP exchange itself failed (DNS, TLS, timeout, ...).
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// A request or response body did not match the expected shape.
    #[error("serialization error: {message}")]
    Serialization {
        /// What failed to (de)serialize.
        message: String,
        /// The offending body, for responses.
        debug: Option<String>,
    },
}

impl ClientError {
    /// Build a configuration error without debug payload.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            debug: None,
        }
    }

    /// The verbose payload accompanying the short message, if any.
    #[must_use]
    pub fn debug_text(&self) -> Option<&str> {
        match self {
            Self::Configuration { debug, .. } | Self::Serialization { debug, .. } => {
                debug.as_deref()
            }
            Self::Api { debug, .. } | Self::StatementFailed { debug, .. } => Some(debug),
            Self::SchemaAccess { .. } | Self::Auth(_) | Self::Http(_) => None,
        }
    }

    /// Whether the error is one the end user has to fix (configuration or
    /// permissions), as opposed to an infrastructure failure.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::SchemaAccess { .. } | Self::StatementFailed { .. }
        )
    }
}

fn format_code_message(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{code} {message}"),
        None => message.to_owned(),
    }
}

fn format_query_id(query_id: Option<&i64>) -> String {
    query_id.map_or_else(|| "unknown".to_owned(), ToString::to_string)
}

/// Convenience result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_api_error() {
        let err = ClientError::Api {
            action: "DescribeTable".to_owned(),
            status: 400,
            code: Some("ValidationException".to_owned()),
            message: "Database is required".to_owned(),
            debug: "POST / ...".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to DescribeTable(400): ValidationException Database is required"
        );
        assert_eq!(err.debug_text(), Some("POST / ..."));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_should_format_statement_failure() {
        let err = ClientError::StatementFailed {
            statement_id: "abc".to_owned(),
            query_id: Some(42),
            status: StatementStatus::Failed,
            error: "division by zero".to_owned(),
            debug: "{}".to_owned(),
        };
        assert_eq!(err.to_string(), "Query(42) failed: division by zero");
        assert!(err.is_user_error());

        let err = ClientError::StatementFailed {
            statement_id: "abc".to_owned(),
            query_id: None,
            status: StatementStatus::Aborted,
            error: String::new(),
            debug: "{}".to_owned(),
        };
        assert_eq!(err.to_string(), "Query(unknown) failed: ");
    }

    #[test]
    fn test_should_expose_missing_debug_text() {
        let err = ClientError::configuration("RoleArn is undefined");
        assert_eq!(err.to_string(), "RoleArn is undefined");
        assert_eq!(err.debug_text(), None);
        let err = ClientError::SchemaAccess {
            table: "dev.public.users".to_owned(),
        };
        assert!(err.to_string().contains("dev.public.users"));
    }
}
