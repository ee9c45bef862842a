//! Credential resolution.
//!
//! Preference order: web identity exchange (`REDSHIFT_ROLE_ARN` plus
//! `AWS_WEB_IDENTITY_TOKEN_FILE`), then static keys from
//! `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
//! Credentials are resolved once per run and never refreshed.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use redshift_data_auth::Credentials;
use redshift_data_client::{AssumeRoleWithWebIdentityRequest, StsClient};
use redshift_data_core::ConnectorConfig;

/// Resolve credentials for one run.
pub async fn resolve_credentials(
    config: &ConnectorConfig,
    lookup: impl Fn(&str) -> Option<String>,
    timeout: Duration,
) -> Result<Credentials> {
    if let (Some(role_arn), Some(token_file)) =
        (config.role_arn.as_deref(), config.web_identity_token_file.as_ref())
    {
        let token = tokio::fs::read_to_string(token_file)
            .await
            .with_context(|| format!("failed to read web identity token {}", token_file.display()))?;
        let request = AssumeRoleWithWebIdentityRequest::new(role_arn, token.trim());
        let result = StsClient::new(timeout)?
            .assume_role_with_web_identity(&request)
            .await?;
        info!(
            role_arn,
            expiration = ?result.credentials.expiration(),
            "using web identity credentials"
        );
        return Ok(result.credentials);
    }

    if config.role_arn.is_some() {
        warn!("REDSHIFT_ROLE_ARN is set but AWS_WEB_IDENTITY_TOKEN_FILE is not, falling back to static keys");
    }

    let Some(credentials) = static_credentials(lookup) else {
        bail!(
            "no credentials: set REDSHIFT_ROLE_ARN and AWS_WEB_IDENTITY_TOKEN_FILE, \
             or AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"
        );
    };
    if credentials.is_expired(Utc::now()) {
        warn!("static credentials are already expired");
    }
    info!(access_key_id = %credentials.access_key_id(), "using static credentials");
    Ok(credentials)
}

/// Static keys from the standard AWS variables; blank values count as unset.
fn static_credentials(lookup: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let access_key_id = get("AWS_ACCESS_KEY_ID")?;
    let secret_access_key = get("AWS_SECRET_ACCESS_KEY")?;
    let credentials = Credentials::new(access_key_id, secret_access_key);
    Some(match get("AWS_SESSION_TOKEN") {
        Some(token) => credentials.with_session_token(token),
        None => credentials,
    })
}
