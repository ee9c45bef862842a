//! Common identifier types shared across the connector crates.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Default region used when none is configured.
    pub const DEFAULT: &str = "ap-northeast-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hostname of a regional AWS service endpoint, e.g.
    /// `redshift-data.ap-northeast-1.amazonaws.com`.
    #[must_use]
    pub fn service_host(&self, service: &str) -> String {
        format!("{service}.{}.amazonaws.com", self.0)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully-qualified Redshift table: database, schema and table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TableRef {
    /// Database name.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub table: String,
}

impl TableRef {
    /// Create a table reference.
    ///
    /// # Errors
    /// Returns an error if any part is empty or contains a double quote.
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> CoreResult<Self> {
        let table_ref = Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        };
        for (label, part) in [
            ("database", &table_ref.database),
            ("schema", &table_ref.schema),
            ("table", &table_ref.table),
        ] {
            if part.is_empty() {
                return Err(CoreError::Config(format!("{label} name is empty")));
            }
            if part.contains('"') {
                return Err(CoreError::InvalidIdentifier(part.clone()));
            }
        }
        Ok(table_ref)
    }

    /// Render as `"database"."schema"."table"`.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!(r#""{}"."{}"."{}""#, self.database, self.schema, self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}
