//! AWS Signature Version 4 request signing.
//!
//! 1. Stamp the request with `X-Amz-Date` (and the session token, if any).
//! 2. Build the canonical request from method, path, query, headers and the
//!    payload hash carried in `X-Amz-Content-Sha256`.
//! 3. Build the string to sign from the timestamp, credential scope and
//!    canonical request hash.
//! 4. Derive the signing key through the HMAC-SHA256 chain.
//! 5. Emit the `Authorization` header, then merge unsigned headers and drop
//!    `host`, which the HTTP transport sets from the URL.
//!
//! The main entry point is [`SigV4Signer::sign`].

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::canonical::{build_canonical_query_string, build_canonical_request};
use crate::credentials::Credentials;
use crate::error::AuthError;

/// The only algorithm supported by this implementation.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header carrying the hex SHA-256 of the payload.
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";

const DATE_HEADER: &str = "X-Amz-Date";
const SECURITY_TOKEN_HEADER: &str = "X-Amz-Security-Token";

type HmacSha256 = Hmac<Sha256>;

/// An outgoing request before signing.
///
/// Header names keep the caller's spelling on the wire; canonicalization
/// case-folds them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignableRequest {
    /// HTTP method.
    pub method: String,
    /// Request path, e.g. `/`.
    pub path: String,
    /// Query parameters, unencoded.
    pub query: Vec<(String, String)>,
    /// Headers that participate in the signature.
    pub headers: Vec<(String, String)>,
    /// Headers merged after signing (e.g. `User-Agent`).
    pub unsigned_headers: Vec<(String, String)>,
}

impl SignableRequest {
    /// Create a request with no headers or query parameters.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a signed header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a header that is sent but never signed.
    #[must_use]
    pub fn unsigned_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.unsigned_headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The request after signing, ready to hand to an HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Canonical (sorted, encoded) query string, empty when there is none.
    pub query: String,
    /// Outgoing headers, including `X-Amz-Date` and `Authorization`,
    /// excluding `host`.
    pub headers: Vec<(String, String)>,
    /// The `host` value that was signed, if one was supplied.
    pub host: Option<String>,
    /// Signed header names as they appear in the `Authorization` header.
    pub signed_headers: String,
    /// Hex signature.
    pub signature: String,
}

impl SignedRequest {
    /// Look up an outgoing header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Signs requests for one service in one region with one set of credentials.
///
/// The signer holds no mutable state; it can be shared freely or built per
/// call.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    service: String,
    region: String,
    credentials: Credentials,
}

impl SigV4Signer {
    /// Create a signer.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        region: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            credentials,
        }
    }

    /// The service name used in the credential scope.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The region used in the credential scope.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The credentials this signer signs with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign `request` as of `signing_date`.
    ///
    /// The payload hash is taken from the request's `X-Amz-Content-Sha256`
    /// header, never recomputed here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingHeader`] if the payload hash header is
    /// absent, [`AuthError::MissingMethod`] for an empty method, and
    /// [`AuthError::InvalidCredentials`] for an empty key pair.
    pub fn sign(
        &self,
        signing_date: DateTime<Utc>,
        request: SignableRequest,
    ) -> Result<SignedRequest, AuthError> {
        if request.method.is_empty() {
            return Err(AuthError::MissingMethod);
        }
        if self.credentials.access_key_id().is_empty() {
            return Err(AuthError::InvalidCredentials("access key id is empty"));
        }
        if self.credentials.secret_access_key().is_empty() {
            return Err(AuthError::InvalidCredentials("secret access key is empty"));
        }

        let amz_date = signing_date.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = signing_date.format("%Y%m%d").to_string();

        let SignableRequest {
            method,
            path,
            query,
            mut headers,
            unsigned_headers,
        } = request;

        headers.retain(|(name, _)| !name.eq_ignore_ascii_case(DATE_HEADER));
        headers.push((DATE_HEADER.to_owned(), amz_date.clone()));
        if let Some(token) = self.credentials.session_token() {
            if find_header(&headers, SECURITY_TOKEN_HEADER).is_none() {
                headers.push((SECURITY_TOKEN_HEADER.to_owned(), token.to_owned()));
            }
        }

        let payload_hash = find_header(&headers, CONTENT_SHA256_HEADER)
            .ok_or_else(|| AuthError::MissingHeader(CONTENT_SHA256_HEADER.to_owned()))?
            .to_owned();

        let header_refs: Vec<(&str, &str)> = headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let query_refs: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let canonical =
            build_canonical_request(&method, &path, &query_refs, &header_refs, &payload_hash);
        trace!(canonical_request = %canonical.text, "built canonical request");
        let canonical_hash = hex::encode(Sha256::digest(canonical.text.as_bytes()));

        let credential_scope = format!(
            "{date_stamp}/{}/{}/aws4_request",
            self.region, self.service
        );
        let string_to_sign = build_string_to_sign(&amz_date, &credential_scope, &canonical_hash);

        let signing_key = derive_signing_key(
            self.credentials.secret_access_key(),
            &date_stamp,
            &self.region,
            &self.service,
        );
        let signature = compute_signature(&signing_key, &string_to_sign);

        debug!(
            service = %self.service,
            region = %self.region,
            signed_headers = %canonical.signed_headers,
            canonical_hash = %canonical_hash,
            "signed request"
        );

        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={}, Signature={signature}",
            self.credentials.access_key_id(),
            canonical.signed_headers,
        );

        let host = find_header(&headers, "host").map(ToOwned::to_owned);
        headers.retain(|(name, _)| !name.eq_ignore_ascii_case("host"));
        headers.push(("Authorization".to_owned(), authorization));
        headers.extend(unsigned_headers);

        Ok(SignedRequest {
            method,
            path,
            query: build_canonical_query_string(&query_refs),
            headers,
            host,
            signed_headers: canonical.signed_headers,
            signature,
        })
    }
}

/// Build the SigV4 string to sign.
///
/// ```
/// use redshift_data_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using the HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Compute the hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of a payload, as carried in `X-Amz-Content-Sha256`.
///
/// ```
/// use redshift_data_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
