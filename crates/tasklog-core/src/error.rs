//! Error types for tasklog core library.

/// Errors that can occur while syncing tasks into a sheet.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration error (missing token, sheet ID, etc.)
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Input validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// No Todoist project carries the configured name
    #[error("Project '{name}' not found")]
    ProjectNotFound {
        /// Project name that was looked up
        name: String,
    },

    /// A remote API answered with a non-success status
    #[error("{service} API returned HTTP {status}: {body}")]
    Api {
        /// Which service answered ("todoist", "sheets", "oauth2")
        service: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Transport-level HTTP failure (connect, timeout, reset)
    #[error("HTTP error: {message}")]
    Http {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response body could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// What failed to decode
        message: String,
    },

    /// Credential or token failure
    #[error("Authentication error: {message}")]
    Auth {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O error (key files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for tasklog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Retryable errors are transport failures, rate limits (HTTP 429),
    /// and server-side errors (HTTP 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http { .. } => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Config { .. } => false,
            Error::Validation { .. } => false,
            Error::ProjectNotFound { .. } => false,
            Error::Decode { .. } => false,
            Error::Auth { .. } => false,
            Error::Io(_) => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new API error from a status code and response body.
    pub fn api<S: Into<String>>(service: &'static str, status: u16, body: S) -> Self {
        Error::Api {
            service,
            status,
            body: body.into(),
        }
    }

    /// Creates a new HTTP transport error with a message and source error.
    pub fn http_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Http {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    /// Creates a new authentication error.
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Error::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new authentication error with a message and source error.
    pub fn auth_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Auth {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
