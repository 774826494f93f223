//! Service-account key files.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{AuthError, Result};

/// Google's OAuth2 token endpoint, used when the key omits `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The JSON key Google issues for a service account.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Always `service_account` for usable keys.
    #[serde(rename = "type")]
    pub key_type: String,

    /// GCP project the account belongs to.
    #[serde(default)]
    pub project_id: Option<String>,

    /// ID of the private key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// PEM-encoded RSA private key.
    pub private_key: String,

    /// The account's email, the JWT issuer.
    pub client_email: String,

    /// Token endpoint, the JWT audience.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parses and validates a key from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self =
            serde_json::from_str(json).map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        key.validate()?;
        Ok(key)
    }

    /// Reads, parses, and validates the key file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AuthError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded service account key file");
        Self::from_json(&json)
    }

    /// Resolves a configured key path against the working directory.
    ///
    /// Relative paths (e.g. `creds/sa.json`) are joined onto `cwd`;
    /// absolute paths are returned unchanged.
    pub fn resolve_path(cwd: &Path, configured: impl AsRef<Path>) -> PathBuf {
        cwd.join(configured)
    }

    fn validate(&self) -> Result<()> {
        if self.key_type != "service_account" {
            return Err(AuthError::InvalidKey(format!(
                "expected type 'service_account', got '{}'",
                self.key_type
            )));
        }
        if self.client_email.trim().is_empty() {
            return Err(AuthError::InvalidKey("client_email is empty".to_string()));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(AuthError::InvalidKey(
                "private_key is not a PEM private key".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
