//! Redshift Data API error types.
//!
//! Errors arrive as JSON with a `__type` member holding the (possibly
//! namespace-qualified) error code and a `message`/`Message` member. Some
//! front-end failures use `code`/`Code` instead; anything that is not JSON
//! is kept verbatim as the message.

use std::fmt;

/// Well-known Redshift Data API error codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RedshiftDataErrorCode {
    /// Invalid request parameters.
    ValidationException,
    /// The statement or table does not exist.
    ResourceNotFoundException,
    /// Too many statements are running.
    ActiveStatementsExceededException,
    /// The statement could not be submitted.
    ExecuteStatementException,
    /// The database connection failed.
    DatabaseConnectionException,
    /// The query exceeded its time limit.
    QueryTimeoutException,
    /// Service-side failure.
    InternalServerException,
    /// The caller lacks permission.
    AccessDeniedException,
    /// Request rate exceeded.
    ThrottlingException,
    /// The access key is unknown.
    UnrecognizedClientException,
    /// The request signature is wrong.
    InvalidSignatureException,
    /// The session token has expired.
    ExpiredTokenException,
    /// Any other code.
    Unknown(String),
}

impl RedshiftDataErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ValidationException => "ValidationException",
            Self::ResourceNotFoundException => "ResourceNotFoundException",
            Self::ActiveStatementsExceededException => "ActiveStatementsExceededException",
            Self::ExecuteStatementException => "ExecuteStatementException",
            Self::DatabaseConnectionException => "DatabaseConnectionException",
            Self::QueryTimeoutException => "QueryTimeoutException",
            Self::InternalServerException => "InternalServerException",
            Self::AccessDeniedException => "AccessDeniedException",
            Self::ThrottlingException => "ThrottlingException",
            Self::UnrecognizedClientException => "UnrecognizedClientException",
            Self::InvalidSignatureException => "InvalidSignatureException",
            Self::ExpiredTokenException => "ExpiredTokenException",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Parse a code, accepting the `namespace#Code` form of `__type`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let short = code.rsplit('#').next().unwrap_or(code);
        // Some front ends append `:http://internal.amazon.com/...`.
        let short = short.split(':').next().unwrap_or(short);
        match short {
            "ValidationException" => Self::ValidationException,
            "ResourceNotFoundException" => Self::ResourceNotFoundException,
            "ActiveStatementsExceededException" => Self::ActiveStatementsExceededException,
            "ExecuteStatementException" => Self::ExecuteStatementException,
            "DatabaseConnectionException" => Self::DatabaseConnectionException,
            "QueryTimeoutException" => Self::QueryTimeoutException,
            "InternalServerException" => Self::InternalServerException,
            "AccessDeniedException" => Self::AccessDeniedException,
            "ThrottlingException" => Self::ThrottlingException,
            "UnrecognizedClientException" => Self::UnrecognizedClientException,
            "InvalidSignatureException" => Self::InvalidSignatureException,
            "ExpiredTokenException" => Self::ExpiredTokenException,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Whether the failure is about who is calling rather than what was asked.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AccessDeniedException
                | Self::UnrecognizedClientException
                | Self::InvalidSignatureException
                | Self::ExpiredTokenException
        )
    }
}

impl fmt::Display for RedshiftDataErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed Redshift Data API error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedshiftDataError {
    /// The error code, when the body carried one.
    pub code: Option<RedshiftDataErrorCode>,
    /// The error message, or the raw body when it could not be parsed.
    pub message: String,
}

impl fmt::Display for RedshiftDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RedshiftDataError {}

impl RedshiftDataError {
    /// Parse an error response body.
    #[must_use]
    pub fn from_response_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self::raw(body);
        };
        if !value.is_object() {
            return Self::raw(body);
        }

        let code = ["__type", "code", "Code"]
            .iter()
            .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
            .map(RedshiftDataErrorCode::from_code);
        let message = ["message", "Message", "errorMessage"]
            .iter()
            .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
            .map_or_else(|| value.to_string(), ToOwned::to_owned);

        Self { code, message }
    }

    fn raw(body: &str) -> Self {
        Self {
            code: None,
            message: body.trim().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_qualified_type() {
        let err = RedshiftDataError::from_response_body(
            r#"{"__type":"com.amazonaws.redshiftdata#ValidationException","message":"Database is required"}"#,
        );
        assert_eq!(err.code, Some(RedshiftDataErrorCode::ValidationException));
        assert_eq!(err.message, "Database is required");
        assert_eq!(err.to_string(), "ValidationException: Database is required");
    }

    #[test]
    fn test_should_parse_code_and_capitalized_message() {
        let err = RedshiftDataError::from_response_body(
            r#"{"Code":"ExpiredTokenException","Message":"The security token included in the request is expired"}"#,
        );
        assert_eq!(err.code, Some(RedshiftDataErrorCode::ExpiredTokenException));
        assert!(err.code.as_ref().is_some_and(RedshiftDataErrorCode::is_auth_error));
        assert!(err.message.contains("expired"));
    }

    #[test]
    fn test_should_strip_type_suffix() {
        assert_eq!(
            RedshiftDataErrorCode::from_code(
                "UnrecognizedClientException:http://internal.amazon.com/coral/com.amazon.coral.service/"
            ),
            RedshiftDataErrorCode::UnrecognizedClientException
        );
    }

    #[test]
    fn test_should_keep_unknown_codes() {
        let err = RedshiftDataError::from_response_body(r#"{"__type":"SomethingNewException"}"#);
        assert_eq!(
            err.code,
            Some(RedshiftDataErrorCode::Unknown("SomethingNewException".to_owned()))
        );
        assert_eq!(err.message, r#"{"__type":"SomethingNewException"}"#);
    }

    #[test]
    fn test_should_fall_back_to_raw_text() {
        let err = RedshiftDataError::from_response_body("<html>502 Bad Gateway</html>\n");
        assert_eq!(err.code, None);
        assert_eq!(err.message, "<html>502 Bad Gateway</html>");
        assert_eq!(err.to_string(), "<html>502 Bad Gateway</html>");
    }
}
