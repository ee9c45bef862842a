//! Web identity credential exchange (`sts:AssumeRoleWithWebIdentity`).
//!
//! The call is an unsigned query-protocol `GET`; the web identity token is
//! the proof of identity. Any failure is a configuration problem for the end
//! user and is never retried.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

use redshift_data_auth::Credentials;

use crate::config::DEFAULT_USER_AGENT;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, HttpSend, ReqwestSender};

/// Global STS endpoint.
pub const STS_ENDPOINT: &str = "https://sts.amazonaws.com";

/// Session name used when the request leaves it unset.
pub const DEFAULT_ROLE_SESSION_NAME: &str = "redshift-data-connector";

/// Lifetime requested when the request leaves it unset (the STS minimum).
pub const DEFAULT_DURATION_SECONDS: u32 = 900;

const STS_VERSION: &str = "2011-06-15";
const ACTION: &str = "AssumeRoleWithWebIdentity";

/// Parameters of one credential exchange.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AssumeRoleWithWebIdentityRequest {
    /// ARN of the role to assume. Required.
    pub role_arn: String,
    /// Defaults to [`DEFAULT_ROLE_SESSION_NAME`].
    pub role_session_name: Option<String>,
    /// Defaults to [`DEFAULT_DURATION_SECONDS`].
    pub duration_seconds: Option<u32>,
    /// OIDC token issued by the identity provider.
    pub web_identity_token: String,
}

impl AssumeRoleWithWebIdentityRequest {
    /// Create a request with default session name and duration.
    #[must_use]
    pub fn new(role_arn: impl Into<String>, web_identity_token: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            web_identity_token: web_identity_token.into(),
            ..Self::default()
        }
    }

    fn query_string(&self) -> String {
        let duration = self
            .duration_seconds
            .unwrap_or(DEFAULT_DURATION_SECONDS)
            .to_string();
        let session_name = self
            .role_session_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ROLE_SESSION_NAME);
        form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", ACTION)
            .append_pair("RoleArn", &self.role_arn)
            .append_pair("DurationSeconds", &duration)
            .append_pair("RoleSessionName", session_name)
            .append_pair("WebIdentityToken", &self.web_identity_token)
            .append_pair("Version", STS_VERSION)
            .finish()
    }
}

impl std::fmt::Debug for AssumeRoleWithWebIdentityRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssumeRoleWithWebIdentityRequest")
            .field("role_arn", &self.role_arn)
            .field("role_session_name", &self.role_session_name)
            .field("duration_seconds", &self.duration_seconds)
            .field("web_identity_token", &"** redacted **")
            .finish()
    }
}

/// The role the temporary credentials belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumedRoleUser {
    /// ARN of the assumed-role session.
    pub arn: String,
    /// `{role id}:{session name}`.
    pub assumed_role_id: String,
}

/// Outcome of a successful exchange.
#[derive(Debug, Clone)]
pub struct AssumeRoleWithWebIdentityResult {
    /// Temporary credentials, including session token and expiration.
    pub credentials: Credentials,
    /// The assumed-role session.
    pub assumed_role_user: Option<AssumedRoleUser>,
    /// `sub` claim of the web identity token.
    pub subject_from_web_identity_token: Option<String>,
    /// `aud` claim of the web identity token.
    pub audience: Option<String>,
    /// Source identity set on the role session, if any.
    pub source_identity: Option<String>,
    /// Issuer of the web identity token.
    pub provider: Option<String>,
}

/// Minimal STS client for the web identity exchange.
#[derive(Debug, Clone)]
pub struct StsClient {
    sender: Arc<dyn HttpSend>,
    endpoint: String,
    user_agent: String,
}

impl StsClient {
    /// Create a client that talks to the global endpoint over `reqwest`.
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        Ok(Self::with_sender(Arc::new(ReqwestSender::new(timeout)?)))
    }

    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_sender(sender: Arc<dyn HttpSend>) -> Self {
        Self {
            sender,
            endpoint: STS_ENDPOINT.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Override the endpoint base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Exchange a web identity token for temporary credentials.
    pub async fn assume_role_with_web_identity(
        &self,
        request: &AssumeRoleWithWebIdentityRequest,
    ) -> ClientResult<AssumeRoleWithWebIdentityResult> {
        if request.role_arn.trim().is_empty() {
            return Err(ClientError::configuration("RoleArn is undefined"));
        }
        if request.web_identity_token.trim().is_empty() {
            return Err(ClientError::configuration("WebIdentityToken is undefined"));
        }

        let http_request = HttpRequest {
            method: http::Method::GET,
            url: format!(
                "{}/?{}",
                self.endpoint.trim_end_matches('/'),
                request.query_string()
            ),
            headers: vec![("User-Agent".to_owned(), self.user_agent.clone())],
            body: Bytes::new(),
        };

        let response = self.sender.send(http_request).await?;
        let text = response.text();

        if response.status != http::StatusCode::OK {
            let (code, message) = parse_error_response(&text);
            warn!(status = %response.status, code = %code, "web identity exchange rejected");
            return Err(ClientError::Configuration {
                message: format!(
                    "failed to {ACTION}({}): {code} {message}",
                    response.status.as_u16()
                ),
                debug: Some(text),
            });
        }

        let result = parse_result(&text).map_err(|message| ClientError::Configuration {
            message,
            debug: Some(text.clone()),
        })?;
        debug!(
            role = ?result.assumed_role_user.as_ref().map(|u| u.arn.as_str()),
            expiration = ?result.credentials.expiration(),
            "assumed role with web identity"
        );
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// XML parsing
// ---------------------------------------------------------------------------

/// A parsed XML element: local name, concatenated text, child elements.
#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim().to_owned())
            .filter(|t| !t.is_empty())
    }
}

/// Parse a document into its root element. Namespaces are ignored.
fn parse_document(xml: &str) -> Result<XmlNode, String> {
    // Untrimmed: entity references split text into several events.
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlNode> = Vec::new();
    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        match event {
            Event::Start(e) => stack.push(XmlNode {
                name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                ..XmlNode::default()
            }),
            Event::Empty(e) => {
                let node = XmlNode {
                    name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                    ..XmlNode::default()
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Text(e) => {
                let decoded = e.decode().map_err(|e| e.to_string())?;
                let unescaped = quick_xml::escape::unescape(&decoded).map_err(|e| e.to_string())?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(|e| e.to_string())?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&resolve_entity(&name));
                }
            }
            Event::End(_) => {
                let Some(node) = stack.pop() else {
                    return Err("unbalanced end tag".to_owned());
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Eof => return Err("no root element".to_owned()),
            _ => {}
        }
    }
}

fn resolve_entity(name: &str) -> String {
    if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(name) {
        return resolved.to_owned();
    }
    let code = name
        .strip_prefix("#x")
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()));
    code.and_then(char::from_u32)
        .map_or_else(|| format!("&{name};"), String::from)
}

/// Extract `Error/Code` and `Error/Message`; non-XML bodies are returned as
/// the message.
fn parse_error_response(body: &str) -> (String, String) {
    match parse_document(body) {
        Ok(root) => {
            let error = root.child("Error").unwrap_or(&root);
            (
                error.child_text("Code").unwrap_or_default(),
                error.child_text("Message").unwrap_or_default(),
            )
        }
        Err(_) => (String::new(), body.trim().to_owned()),
    }
}

fn parse_result(body: &str) -> Result<AssumeRoleWithWebIdentityResult, String> {
    let root = parse_document(body).map_err(|e| format!("invalid {ACTION} response: {e}"))?;
    let result = root
        .child("AssumeRoleWithWebIdentityResult")
        .ok_or_else(|| "AssumeRoleWithWebIdentityResult is null".to_owned())?;
    let creds = result
        .child("Credentials")
        .ok_or_else(|| "AssumeRoleWithWebIdentityResult.Credentials is null".to_owned())?;

    let access_key_id = creds
        .child_text("AccessKeyId")
        .ok_or_else(|| "Credentials.AccessKeyId is missing".to_owned())?;
    let secret_access_key = creds
        .child_text("SecretAccessKey")
        .ok_or_else(|| "Credentials.SecretAccessKey is missing".to_owned())?;

    let mut credentials = Credentials::new(access_key_id, secret_access_key);
    if let Some(token) = creds.child_text("SessionToken") {
        credentials = credentials.with_session_token(token);
    }
    if let Some(expiration) = creds.child_text("Expiration") {
        credentials = credentials.with_expiration(parse_timestamp(&expiration)?);
    }

    let assumed_role_user = result.child("AssumedRoleUser").map(|user| AssumedRoleUser {
        arn: user.child_text("Arn").unwrap_or_default(),
        assumed_role_id: user.child_text("AssumedRoleId").unwrap_or_default(),
    });

    Ok(AssumeRoleWithWebIdentityResult {
        credentials,
        assumed_role_user,
        subject_from_web_identity_token: result.child_text("SubjectFromWebIdentityToken"),
        audience: result.child_text("Audience"),
        source_identity: result.child_text("SourceIdentity"),
        provider: result.child_text("Provider"),
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid Credentials.Expiration '{s}': {e}"))
}
