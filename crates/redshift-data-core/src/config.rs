//! Connector configuration.
//!
//! All configuration is driven by environment variables. Empty values are
//! treated exactly like unset ones: a blank workgroup name means "not a
//! serverless target", not "a workgroup called ''".

use std::env;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::types::{AwsRegion, TableRef};

/// Connection settings for a Redshift Data API target.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// IAM role assumed through the web identity token exchange.
    pub role_arn: Option<String>,
    /// Region of the Redshift Data API endpoint.
    pub region: AwsRegion,
    /// Redshift Serverless workgroup name.
    pub workgroup_name: Option<String>,
    /// Provisioned cluster identifier.
    pub cluster_identifier: Option<String>,
    /// Database user (provisioned clusters only).
    pub db_user: Option<String>,
    /// Database name.
    pub database: Option<String>,
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: Option<String>,
    /// File holding the OIDC token exchanged for temporary credentials.
    pub web_identity_token_file: Option<PathBuf>,
    /// Poll interval override in milliseconds.
    pub poll_interval_ms: Option<u64>,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl ConnectorConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            role_arn: get("REDSHIFT_ROLE_ARN"),
            region: get("AWS_REGION").map(AwsRegion::new).unwrap_or_default(),
            workgroup_name: get("REDSHIFT_WORKGROUP_NAME"),
            cluster_identifier: get("REDSHIFT_CLUSTER_IDENTIFIER"),
            db_user: get("REDSHIFT_DB_USER"),
            database: get("REDSHIFT_DATABASE"),
            schema: get("REDSHIFT_SCHEMA"),
            table: get("REDSHIFT_TABLE"),
            web_identity_token_file: get("AWS_WEB_IDENTITY_TOKEN_FILE").map(PathBuf::from),
            poll_interval_ms: get("REDSHIFT_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()),
            log_level: get("LOG_LEVEL"),
        }
    }

    /// Resolve the configured target table.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] naming the first missing part.
    pub fn table_ref(&self) -> CoreResult<TableRef> {
        let database = required(self.database.as_deref(), "REDSHIFT_DATABASE")?;
        let schema = required(self.schema.as_deref(), "REDSHIFT_SCHEMA")?;
        let table = required(self.table.as_deref(), "REDSHIFT_TABLE")?;
        TableRef::new(database, schema, table)
    }

    /// Check that the configuration names a table and a compute target.
    pub fn validate(&self) -> CoreResult<()> {
        self.table_ref()?;
        if self.workgroup_name.is_none() && self.cluster_identifier.is_none() {
            return Err(CoreError::Config(
                "one of REDSHIFT_WORKGROUP_NAME or REDSHIFT_CLUSTER_IDENTIFIER is required"
                    .to_owned(),
            ));
        }
        if self.workgroup_name.is_some() && self.cluster_identifier.is_some() {
            tracing::warn!(
                "both workgroup and cluster identifier are set, the Data API will reject the request"
            );
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> CoreResult<&'a str> {
    value.ok_or_else(|| CoreError::Config(format!("{key} is not set")))
}

/// Read an environment variable, treating an empty value as unset.
#[must_use]
pub fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
