//! Access tokens via the OAuth2 JWT bearer grant.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{AuthError, Result};
use crate::key::ServiceAccountKey;

/// Read/write access to spreadsheets.
pub const SCOPE_SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Read-only access to spreadsheets.
pub const SCOPE_SPREADSHEETS_READONLY: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion, in seconds (Google's maximum).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Cached tokens closer than this many seconds to expiry are refreshed.
const EXPIRY_MARGIN_SECS: i64 = 60;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies bearer tokens for Google API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A valid access token carrying `scope`.
    async fn access_token(&self, scope: &str) -> Result<String>;
}

/// Hands out the same token for every scope (for tests and pre-minted tokens).
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self, _scope: &str) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges signed service-account assertions for access tokens.
///
/// Tokens are cached per scope and reused until they are within a minute
/// of expiring.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cache: RwLock<HashMap<String, CachedToken>>,
}

impl ServiceAccountTokenProvider {
    /// Creates a provider for `key`, parsing its private key up front.
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::InvalidKey(format!("private_key: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            key,
            encoding_key,
            http,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// The service account's email.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    async fn cached(&self, scope: &str, now: DateTime<Utc>) -> Option<String> {
        let cache = self.cache.read().await;
        cache
            .get(scope)
            .filter(|cached| cached.expires_at - TimeDelta::seconds(EXPIRY_MARGIN_SECS) > now)
            .map(|cached| cached.token.clone())
    }

    fn sign_assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        encode(&header, &claims, &self.encoding_key).map_err(|e| AuthError::Signing(e.to_string()))
    }

    async fn exchange(&self, assertion: &str) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self, scope: &str) -> Result<String> {
        let now = Utc::now();
        if let Some(token) = self.cached(scope, now).await {
            return Ok(token);
        }

        let assertion = self.sign_assertion(scope, now)?;
        let response = self.exchange(&assertion).await?;
        let lifetime = TimeDelta::seconds(
            response
                .expires_in
                .unwrap_or(ASSERTION_LIFETIME_SECS)
                .clamp(0, ASSERTION_LIFETIME_SECS),
        );

        tracing::debug!(
            client_email = %self.key.client_email,
            scope,
            expires_in = lifetime.num_seconds(),
            "Obtained access token"
        );

        self.cache.write().await.insert(
            scope.to_string(),
            CachedToken {
                token: response.access_token.clone(),
                expires_at: now + lifetime,
            },
        );
        Ok(response.access_token)
    }
}

impl fmt::Debug for ServiceAccountTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountTokenProvider")
            .field("client_email", &self.key.client_email)
            .field("token_uri", &self.key.token_uri)
            .finish_non_exhaustive()
    }
}
