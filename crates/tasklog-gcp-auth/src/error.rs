//! Auth-specific error types.

use std::path::PathBuf;

/// Result type alias for service-account operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while obtaining a Google access token.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The key file could not be read.
    #[error("cannot read service account file {}: {source}", path.display())]
    KeyFile {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The key file is not a usable service-account key.
    #[error("invalid service account key: {0}")]
    InvalidKey(String),

    /// The JWT assertion could not be signed.
    #[error("failed to sign token assertion: {0}")]
    Signing(String),

    /// The token endpoint could not be reached.
    #[error("token request failed: {0}")]
    TokenRequest(#[from] reqwest::Error),

    /// The token endpoint refused the assertion.
    #[error("token endpoint returned HTTP {status}: {body}")]
    TokenRejected {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The token endpoint's response could not be parsed.
    #[error("unexpected token response: {0}")]
    Decode(String),
}

impl AuthError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::TokenRequest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AuthError::TokenRejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<AuthError> for tasklog_core::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenRejected { status, body } if status == 429 || status >= 500 => {
                tasklog_core::Error::api("oauth2", status, body)
            }
            AuthError::TokenRequest(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                tasklog_core::Error::http_with_source("token request failed", e)
            }
            other => tasklog_core::Error::auth_with_source("service account token", other),
        }
    }
}
