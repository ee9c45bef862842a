//! HTTP transport seam.
//!
//! The client never talks to `reqwest` directly: it hands a fully signed
//! [`HttpRequest`] to an [`HttpSend`] implementation. Production code uses
//! [`ReqwestSender`]; tests substitute a scripted sender.
//!
//! The trait uses `#[async_trait]` so it stays object-safe behind
//! `Arc<dyn HttpSend>`.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;

use crate::error::{ClientError, ClientResult};

/// A request ready to be put on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Absolute URL including any query string.
    pub url: String,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Body bytes, exactly as hashed for signing.
    pub body: Bytes,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// A printable summary of the request with credentials redacted.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut out = format!("{} {}\n", self.method, self.url);
        for (name, value) in &self.headers {
            let shown = if name.eq_ignore_ascii_case("authorization") {
                redact_signature(value)
            } else if name.eq_ignore_ascii_case("x-amz-security-token") {
                "** redacted **".to_owned()
            } else {
                value.clone()
            };
            out.push_str(name);
            out.push_str(": ");
            out.push_str(&shown);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&String::from_utf8_lossy(&self.body));
        out
    }
}

fn redact_signature(authorization: &str) -> String {
    match authorization.find("Signature=") {
        Some(idx) => format!("{}Signature=** redacted **", &authorization[..idx]),
        None => authorization.to_owned(),
    }
}

/// A response as seen by the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: http::StatusCode,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: http::StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The body as (lossy) UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs exactly one HTTP exchange per call. Implementations must not
/// retry.
#[async_trait::async_trait]
pub trait HttpSend: Send + Sync + fmt::Debug {
    /// Send `request` and return the response, whatever its status.
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

/// [`HttpSend`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    /// Build a sender whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
