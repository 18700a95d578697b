//! Token provider implementation
//!
//! Resolves the access token for a run and caches client-credentials tokens
//! until shortly before they expire.

use super::types::{AuthConfig, AuthMode, CachedToken, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Resolves bearer tokens, exchanging client credentials when needed
///
/// The cache belongs to this instance only. Cloning the provider shares the
/// cache; create a new provider for an independent one.
#[derive(Clone)]
pub struct TokenProvider {
    /// Token from the last client-credentials exchange
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl TokenProvider {
    /// Create a provider with its own HTTP client
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a provider that reuses an existing HTTP client
    pub fn with_client(http_client: Client) -> Self {
        Self {
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Resolve the access token for `auth`
    pub async fn resolve(&self, auth: &AuthConfig) -> Result<String> {
        let (client_id, client_secret, token_endpoint) = match auth.mode() {
            AuthMode::Bearer(token) => return Ok(token.to_string()),
            AuthMode::ClientCredentials {
                client_id,
                client_secret,
                token_endpoint,
            } => (client_id, client_secret, token_endpoint),
            AuthMode::Incomplete => {
                return Err(Error::missing_field(format!(
                    "missing credentials: provide a bearer token or {}",
                    auth.missing_credentials().join(", ")
                )));
            }
        };

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self
            .fetch_client_credentials(token_endpoint, client_id, client_secret)
            .await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a token using the client credentials flow
    async fn fetch_client_credentials(
        &self,
        token_endpoint: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<CachedToken> {
        debug!(endpoint = token_endpoint, "Requesting client-credentials token");

        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http_client
            .post(token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::oauth2(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let body = response.text().await.map_err(Error::Http)?;
        let token_response: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::oauth2(format!("Invalid token response received: {e}")))?;

        if token_response.access_token.is_empty() {
            return Err(Error::oauth2("Invalid token response received: empty access_token"));
        }

        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token, forcing the next resolve to re-authenticate
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Whether a non-expired token is currently cached
    pub async fn has_valid_token(&self) -> bool {
        self.cached_token
            .read()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_expired())
    }
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider").finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    /// Number or numeric string, depending on the identity provider
    #[serde(default)]
    expires_in: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn lifetime_seconds(&self) -> i64 {
        parse_expires_in(self.expires_in.as_ref()).unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
    }

    fn into_cached_token(self) -> CachedToken {
        let lifetime = self.lifetime_seconds();
        CachedToken::expires_in(self.access_token, lifetime)
    }
}

/// Read `expires_in` as seconds, accepting numbers and numeric strings
pub(crate) fn parse_expires_in(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
