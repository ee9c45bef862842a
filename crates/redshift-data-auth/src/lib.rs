//! AWS Signature Version 4 request signing.
//!
//! This crate implements the client side of SigV4: given credentials, a
//! region, a service name and an outgoing HTTP request, it produces the
//! `X-Amz-Date` and `Authorization` headers AWS expects. Signing is a pure
//! function of its inputs, so the same request signed at the same instant
//! always yields the same signature.
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use redshift_data_auth::{Credentials, SigV4Signer, SignableRequest, hash_payload};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret");
//! let signer = SigV4Signer::new("redshift-data", "ap-northeast-1", credentials);
//!
//! let body = br#"{"Id":"abc"}"#;
//! let request = SignableRequest::new("POST", "/")
//!     .header("host", "redshift-data.ap-northeast-1.amazonaws.com")
//!     .header("X-Amz-Content-Sha256", hash_payload(body));
//!
//! let signing_date = Utc.with_ymd_and_hms(2023, 6, 28, 0, 0, 0).unwrap();
//! let signed = signer.sign(signing_date, request).unwrap();
//! assert!(signed.header("authorization").is_some());
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Temporary or long-lived AWS credentials
//! - [`error`] - Signing error types
//! - [`sigv4`] - Signing key derivation and request signing

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod sigv4;

pub use credentials::Credentials;
pub use error::AuthError;
pub use sigv4::{SigV4Signer, SignableRequest, SignedRequest, hash_payload};
