//! Redshift Data API operation enum.

use std::fmt;

/// Prefix of the `X-Amz-Target` header for every Data API call.
pub const TARGET_PREFIX: &str = "RedshiftData.";

/// Supported Redshift Data API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedshiftDataOperation {
    /// Page through a table's column metadata.
    DescribeTable,
    /// Submit a SQL statement for asynchronous execution.
    ExecuteStatement,
    /// Poll the status of a submitted statement.
    DescribeStatement,
    /// Fetch one page of a finished statement's result set.
    GetStatementResult,
}

impl RedshiftDataOperation {
    /// Returns the AWS operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DescribeTable => "DescribeTable",
            Self::ExecuteStatement => "ExecuteStatement",
            Self::DescribeStatement => "DescribeStatement",
            Self::GetStatementResult => "GetStatementResult",
        }
    }

    /// Parse an operation name string into a `RedshiftDataOperation`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DescribeTable" => Some(Self::DescribeTable),
            "ExecuteStatement" => Some(Self::ExecuteStatement),
            "DescribeStatement" => Some(Self::DescribeStatement),
            "GetStatementResult" => Some(Self::GetStatementResult),
            _ => None,
        }
    }

    /// The `X-Amz-Target` header value, e.g. `RedshiftData.DescribeTable`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{TARGET_PREFIX}{}", self.as_str())
    }

    /// Resolve an operation from an `X-Amz-Target` header value.
    #[must_use]
    pub fn from_target(target: &str) -> Option<Self> {
        target.strip_prefix(TARGET_PREFIX).and_then(Self::from_name)
    }
}

impl fmt::Display for RedshiftDataOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
