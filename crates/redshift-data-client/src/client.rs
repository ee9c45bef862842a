//! Signed Redshift Data API transport and single-shot operations.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use redshift_data_auth::{Credentials, SigV4Signer, SignableRequest, hash_payload};
use redshift_data_model::RedshiftDataError;
use redshift_data_model::RedshiftDataOperation;
use redshift_data_model::input::{
    DescribeStatementInput, DescribeTableInput, ExecuteStatementInput, GetStatementResultInput,
};
use redshift_data_model::operations::TARGET_PREFIX;
use redshift_data_model::output::{
    DescribeStatementOutput, DescribeTableOutput, ExecuteStatementOutput,
    GetStatementResultOutput,
};

use crate::config::{ClientConfig, SERVICE_NAME};
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, HttpSend, ReqwestSender};

/// Content type of every `awsJson1_1` request.
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Client for the Redshift Data API.
///
/// Holds an immutable credential snapshot; cloning is cheap and clones share
/// the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RedshiftDataClient {
    config: ClientConfig,
    signer: SigV4Signer,
    sender: Arc<dyn HttpSend>,
}

impl RedshiftDataClient {
    /// Create a client that talks to AWS over `reqwest`.
    pub fn new(credentials: Credentials, config: ClientConfig) -> ClientResult<Self> {
        let sender = ReqwestSender::new(config.timeout)?;
        Ok(Self::with_sender(credentials, config, Arc::new(sender)))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_sender(
        credentials: Credentials,
        config: ClientConfig,
        sender: Arc<dyn HttpSend>,
    ) -> Self {
        let signer = SigV4Signer::new(SERVICE_NAME, config.region.as_str(), credentials);
        Self {
            config,
            signer,
            sender,
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Serialize `payload` to JSON and send it as `action`.
    pub async fn send<T: Serialize + ?Sized>(&self, action: &str, payload: &T) -> ClientResult<Bytes> {
        let body = serde_json::to_string(payload).map_err(|e| ClientError::Serialization {
            message: format!("failed to serialize {action} request: {e}"),
            debug: None,
        })?;
        self.send_text(action, body).await
    }

    /// Send an already-serialized JSON body as `action`.
    ///
    /// Makes exactly one HTTP call. A non-2xx answer becomes
    /// [`ClientError::Api`] carrying the parsed error code and message, or
    /// the raw body when it is not a JSON error object.
    pub async fn send_text(&self, action: &str, body: String) -> ClientResult<Bytes> {
        if action.trim().is_empty() {
            return Err(ClientError::configuration("Action undefined"));
        }

        let base_url = self.config.base_url();
        let host = host_of(&base_url)?;
        let body = Bytes::from(body);

        let unsigned = SignableRequest::new("POST", "/")
            .header("host", host)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}{action}"))
            .header("X-Amz-Content-Sha256", hash_payload(&body))
            .unsigned_header("User-Agent", self.config.user_agent.as_str());
        let signed = self.signer.sign(Utc::now(), unsigned)?;

        let request = HttpRequest {
            method: http::Method::POST,
            url: format!("{base_url}/"),
            headers: signed.headers,
            body,
        };

        let started = Instant::now();
        let response = self.sender.send(request.clone()).await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(action, status = %response.status, elapsed_ms, "redshift data call completed");

        if !response.status.is_success() {
            let text = response.text();
            let parsed = RedshiftDataError::from_response_body(&text);
            warn!(
                action,
                status = %response.status,
                code = ?parsed.code,
                message = %parsed.message,
                "redshift data call failed"
            );
            return Err(ClientError::Api {
                action: action.to_owned(),
                status: response.status.as_u16(),
                code: parsed.code.map(|c| c.as_str().to_owned()),
                message: parsed.message,
                debug: format!("{}\n\n{text}", request.redacted()),
            });
        }

        Ok(response.body)
    }

    async fn call<I, O>(&self, op: RedshiftDataOperation, input: &I) -> ClientResult<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let body = self.send(op.as_str(), input).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Serialization {
            message: format!("failed to deserialize {op} response: {e}"),
            debug: Some(String::from_utf8_lossy(&body).into_owned()),
        })
    }

    /// Fetch one page of column metadata. Callers loop on `next_token`;
    /// see [`RedshiftDataClient::describe_table_columns`].
    pub async fn describe_table(
        &self,
        input: &DescribeTableInput,
    ) -> ClientResult<DescribeTableOutput> {
        self.call(RedshiftDataOperation::DescribeTable, input).await
    }

    /// Submit a statement. Without an explicit `client_token` one is derived
    /// from the SQL text, so resubmitting identical SQL reuses the token.
    pub async fn execute_statement(
        &self,
        mut input: ExecuteStatementInput,
    ) -> ClientResult<ExecuteStatementOutput> {
        if input.sql.trim().is_empty() {
            return Err(ClientError::configuration("Sql undefined"));
        }
        if input.client_token.is_none() {
            input.client_token = Some(client_token_for(&input.sql));
        }
        let output: ExecuteStatementOutput = self
            .call(RedshiftDataOperation::ExecuteStatement, &input)
            .await?;
        debug!(statement_id = %output.id, "statement submitted");
        Ok(output)
    }

    /// Observe a statement's status once.
    pub async fn describe_statement(
        &self,
        input: &DescribeStatementInput,
    ) -> ClientResult<DescribeStatementOutput> {
        if input.id.is_empty() {
            return Err(ClientError::configuration("statement Id undefined"));
        }
        self.call(RedshiftDataOperation::DescribeStatement, input)
            .await
    }

    /// Fetch one page of a finished statement's rows.
    pub async fn get_statement_result(
        &self,
        input: &GetStatementResultInput,
    ) -> ClientResult<GetStatementResultOutput> {
        if input.id.is_empty() {
            return Err(ClientError::configuration("statement Id undefined"));
        }
        self.call(RedshiftDataOperation::GetStatementResult, input)
            .await
    }
}

/// Idempotency token for a statement: hex SHA-256 of its SQL text.
#[must_use]
pub fn client_token_for(sql: &str) -> String {
    hash_payload(sql.as_bytes())
}

fn host_of(base_url: &str) -> ClientResult<String> {
    let uri: http::Uri = base_url
        .parse()
        .map_err(|e| ClientError::configuration(format!("invalid endpoint {base_url}: {e}")))?;
    uri.authority()
        .map(|a| a.as_str().to_owned())
        .ok_or_else(|| ClientError::configuration(format!("endpoint {base_url} has no host")))
}
