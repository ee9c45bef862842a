//! Shared Redshift Data API types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Statement status
// ---------------------------------------------------------------------------

/// Lifecycle status of a submitted statement.
///
/// `Submitted`, `Picked` and `Started` are transient; `Finished`, `Failed`
/// and `Aborted` are terminal and never change once observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatementStatus {
    /// Accepted by the service.
    Submitted,
    /// Picked up by the query runner.
    Picked,
    /// Executing.
    Started,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    Failed,
    /// Cancelled before completion.
    Aborted,
    /// A status this client does not know about.
    Unknown(String),
}

impl StatementStatus {
    /// Returns the wire-format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Picked => "PICKED",
            Self::Started => "STARTED",
            Self::Finished => "FINISHED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Whether polling can stop.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Aborted)
    }

    /// Whether the statement ended without producing a result.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Aborted)
    }
}

impl From<&str> for StatementStatus {
    fn from(s: &str) -> Self {
        match s {
            "SUBMITTED" => Self::Submitted,
            "PICKED" => Self::Picked,
            "STARTED" => Self::Started,
            "FINISHED" => Self::Finished,
            "FAILED" => Self::Failed,
            "ABORTED" => Self::Aborted,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl Serialize for StatementStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatementStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

impl std::fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parameters and metadata
// ---------------------------------------------------------------------------

/// A named SQL parameter (`:name` placeholders in the statement text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlParameter {
    /// Parameter name without the leading colon.
    pub name: String,
    /// Parameter value as text; the service casts it.
    pub value: String,
}

impl SqlParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Catalog metadata for one column, as returned by `DescribeTable` and
/// `GetStatementResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    /// Column name.
    #[serde(default)]
    pub name: String,
    /// Database type name, e.g. `integer` or `character varying`.
    #[serde(default)]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_case_sensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_currency: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_signed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    /// `0` not nullable, `1` nullable, `2` unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl ColumnMetadata {
    /// Metadata carrying only a name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}
