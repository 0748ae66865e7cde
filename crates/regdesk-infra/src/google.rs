//! Google service-account access tokens
//!
//! A signed RS256 assertion is exchanged for a short-lived OAuth access token
//! at the key's `token_uri`. Tokens are cached until shortly before they
//! expire, so concurrent requests share one exchange.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::retry::{is_transient_status, Retryable};

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to read credentials: {0}")]
    Credentials(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl Retryable for TokenError {
    fn is_transient(&self) -> bool {
        match self {
            TokenError::Transport(e) => is_transient_transport(e),
            TokenError::Status { status, .. } => is_transient_status(*status),
            TokenError::Credentials(_) | TokenError::Signing(_) => false,
        }
    }
}

/// Connection, timeout and request-level failures from the HTTP client.
pub fn is_transient_transport(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        return true;
    }
    err.status()
        .map(|s| is_transient_status(s.as_u16()))
        .unwrap_or(false)
}

/// Failures where the request provably never reached the server.
///
/// Non-idempotent calls may only be repeated on these; a timeout can land
/// after the server has already applied the request.
pub fn is_unsent_transport(err: &reqwest::Error) -> bool {
    err.is_connect()
}

/// Supplies bearer tokens for Google API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, TokenError>;
}

/// Fixed token, for tests and for tokens minted outside the service.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(pub String);

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        Ok(self.0.clone())
    }
}

/// The subset of a service-account JSON key file used for token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TokenError::Credentials(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| TokenError::Credentials(format!("{}: {}", path.display(), e)))
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
    expires_in: i64,
}

/// Cached access token with expiration
#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    scope: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, scope: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            key,
            scope: scope.into(),
            client,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_file(
        path: impl AsRef<Path>,
        scope: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, TokenError> {
        Ok(Self::new(ServiceAccountKey::from_file(path)?, scope, client))
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }

    async fn exchange(&self) -> Result<CachedToken, TokenError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TokenError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        tracing::debug!(
            scope = %self.scope,
            expires_in = body.expires_in,
            "Obtained service-account access token"
        );

        Ok(CachedToken {
            token: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in),
        })
    }

    fn is_fresh(cached: &CachedToken) -> bool {
        cached.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now()
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| Self::is_fresh(c)) {
                return Ok(cached.token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref().filter(|c| Self::is_fresh(c)) {
            return Ok(cached.token.clone());
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}
