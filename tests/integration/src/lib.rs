//! Integration tests against a live Redshift Data API endpoint.
//!
//! These tests need AWS credentials with access to a Redshift workgroup or
//! cluster, configured through the same environment variables as the
//! connector (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
//! `AWS_SESSION_TOKEN`, `AWS_REGION`, `REDSHIFT_WORKGROUP_NAME` or
//! `REDSHIFT_CLUSTER_IDENTIFIER`, `REDSHIFT_DATABASE`, `REDSHIFT_SCHEMA`,
//! `REDSHIFT_TABLE`). They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p redshift-data-integration -- --ignored
//! ```

use std::sync::Once;

use anyhow::{Context, Result};
use redshift_data_auth::Credentials;
use redshift_data_client::{ClientConfig, RedshiftDataClient};
use redshift_data_core::{ConnectorConfig, env_non_empty};
use redshift_data_model::input::ExecuteStatementInput;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Connector configuration from the environment, validated.
pub fn test_config() -> Result<ConnectorConfig> {
    init_tracing();
    let config = ConnectorConfig::from_env();
    config.validate()?;
    Ok(config)
}

/// Client using static credentials from the environment.
pub fn test_client(config: &ConnectorConfig) -> Result<RedshiftDataClient> {
    let access_key_id = env_non_empty("AWS_ACCESS_KEY_ID").context("AWS_ACCESS_KEY_ID is not set")?;
    let secret_access_key =
        env_non_empty("AWS_SECRET_ACCESS_KEY").context("AWS_SECRET_ACCESS_KEY is not set")?;
    let mut credentials = Credentials::new(access_key_id, secret_access_key);
    if let Some(token) = env_non_empty("AWS_SESSION_TOKEN") {
        credentials = credentials.with_session_token(token);
    }
    Ok(RedshiftDataClient::new(
        credentials,
        ClientConfig::from_connector(config),
    )?)
}

/// Statement input targeting the configured workgroup or cluster.
#[must_use]
pub fn statement(config: &ConnectorConfig, sql: impl Into<String>) -> ExecuteStatementInput {
    ExecuteStatementInput {
        cluster_identifier: config.cluster_identifier.clone(),
        database: config.database.clone().unwrap_or_default(),
        db_user: config.db_user.clone(),
        sql: sql.into(),
        workgroup_name: config.workgroup_name.clone(),
        ..ExecuteStatementInput::default()
    }
}

/// A unique marker to keep statements from colliding on their client token.
#[must_use]
pub fn unique_tag() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod test_schema;
#[cfg(test)]
mod test_statement;
