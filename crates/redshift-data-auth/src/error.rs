//! Error types for SigV4 signing.

/// Errors that can occur while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A header the signer relies on is absent from the request.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The credentials cannot be used for signing.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    /// The HTTP method is empty.
    #[error("Missing HTTP method")]
    MissingMethod,
}
