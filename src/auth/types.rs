//! Auth configuration types
//!
//! `AuthConfig` is what the caller fills in; `AuthMode` is the
//! interpretation the token provider acts on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds shaved off a token's reported lifetime so it is never used
/// right at the edge of expiry
pub const EARLY_REFRESH_MARGIN_SECS: i64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Longest lifetime honoured from a token response (one year)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 3600;

/// Authentication settings for a query run
///
/// Either `bearer_token` is set, or all of `client_id`, `client_secret` and
/// `token_endpoint` are. When both are populated the bearer token wins.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Static bearer token
    #[serde(default, alias = "bearer_token")]
    pub bearer_token: Option<String>,
    /// OAuth2 client id
    #[serde(default, alias = "client_id")]
    pub client_id: Option<String>,
    /// OAuth2 client secret
    #[serde(default, alias = "client_secret")]
    pub client_secret: Option<String>,
    /// OAuth2 token endpoint URL
    #[serde(default, alias = "token_endpoint")]
    pub token_endpoint: Option<String>,
}

/// The authentication mode an `AuthConfig` resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode<'a> {
    /// Use this token as-is
    Bearer(&'a str),
    /// Exchange client credentials for a token
    ClientCredentials {
        /// Client id
        client_id: &'a str,
        /// Client secret
        client_secret: &'a str,
        /// Token endpoint URL
        token_endpoint: &'a str,
    },
    /// Neither mode is fully configured
    Incomplete,
}

impl AuthConfig {
    /// Bearer-token configuration
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Client-credentials configuration
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            bearer_token: None,
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            token_endpoint: Some(token_endpoint.into()),
        }
    }

    /// Resolve which mode is active
    pub fn mode(&self) -> AuthMode<'_> {
        if let Some(token) = non_empty(self.bearer_token.as_deref()) {
            return AuthMode::Bearer(token);
        }

        match (
            non_empty(self.client_id.as_deref()),
            non_empty(self.client_secret.as_deref()),
            non_empty(self.token_endpoint.as_deref()),
        ) {
            (Some(client_id), Some(client_secret), Some(token_endpoint)) => {
                AuthMode::ClientCredentials {
                    client_id,
                    client_secret,
                    token_endpoint,
                }
            }
            _ => AuthMode::Incomplete,
        }
    }

    /// True when any client-credentials field has been filled in
    pub fn prefers_client_credentials(&self) -> bool {
        non_empty(self.client_id.as_deref()).is_some()
            || non_empty(self.client_secret.as_deref()).is_some()
            || non_empty(self.token_endpoint.as_deref()).is_some()
    }

    /// Names of the client-credentials fields that are missing
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if non_empty(self.client_id.as_deref()).is_none() {
            missing.push("client_id");
        }
        if non_empty(self.client_secret.as_deref()).is_none() {
            missing.push("client_secret");
        }
        if non_empty(self.token_endpoint.as_deref()).is_none() {
            missing.push("token_endpoint");
        }
        missing
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("AuthConfig")
            .field("bearer_token", &redact(&self.bearer_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// Cached token with expiration
#[derive(Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token must no longer be used
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token from a reported lifetime, applying the early-refresh margin
    ///
    /// Lifetimes are clamped to `0..=MAX_TOKEN_LIFETIME_SECS`.
    pub fn expires_in(token: String, lifetime_seconds: i64) -> Self {
        let usable = lifetime_seconds
            .clamp(0, MAX_TOKEN_LIFETIME_SECS)
            .saturating_sub(EARLY_REFRESH_MARGIN_SECS);
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(Duration::seconds(usable))
            .unwrap_or(now);
        Self { token, expires_at }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_cached_token_not_expired() {
        let token = CachedToken::expires_in("test".to_string(), 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cached_token_margin_applied() {
        // 60s lifetime minus the 60s margin is already stale
        let token = CachedToken::expires_in("test".to_string(), 60);
        assert!(token.is_expired());

        let token = CachedToken::expires_in("test".to_string(), 3600);
        let remaining = token.expires_at - Utc::now();
        assert!(remaining <= Duration::seconds(3540));
        assert!(remaining > Duration::seconds(3530));
    }

    #[test]
    fn test_cached_token_out_of_range_lifetimes() {
        let token = CachedToken::expires_in("test".to_string(), 99_999_999_999_999);
        assert!(!token.is_expired());
        let remaining = token.expires_at - Utc::now();
        assert!(remaining <= Duration::seconds(MAX_TOKEN_LIFETIME_SECS));

        let token = CachedToken::expires_in("test".to_string(), i64::MAX);
        assert!(!token.is_expired());

        let token = CachedToken::expires_in("test".to_string(), -5);
        assert!(token.is_expired());

        let token = CachedToken::expires_in("test".to_string(), i64::MIN);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::new("test".to_string(), Utc::now() - Duration::seconds(1));
        assert!(token.is_expired());
    }

    #[test]
    fn test_mode_bearer_wins() {
        let mut config = AuthConfig::client_credentials("id", "secret", "https://t");
        config.bearer_token = Some("direct".to_string());
        assert_eq!(config.mode(), AuthMode::Bearer("direct"));
    }

    #[test]
    fn test_mode_empty_bearer_falls_through() {
        let mut config = AuthConfig::client_credentials("id", "secret", "https://t");
        config.bearer_token = Some(String::new());
        assert!(matches!(
            config.mode(),
            AuthMode::ClientCredentials { client_id: "id", .. }
        ));
    }

    #[test]
    fn test_mode_incomplete() {
        assert_eq!(AuthConfig::default().mode(), AuthMode::Incomplete);

        let config = AuthConfig {
            client_id: Some("id".to_string()),
            client_secret: Some(String::new()),
            ..AuthConfig::default()
        };
        assert_eq!(config.mode(), AuthMode::Incomplete);
        assert!(config.prefers_client_credentials());
        assert_eq!(
            config.missing_credentials(),
            vec!["client_secret", "token_endpoint"]
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = AuthConfig::client_credentials("id", "s3cr3t", "https://t");
        config.bearer_token = Some("tok3n".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("tok3n"));
        assert!(debug.contains("id"));

        let cached = CachedToken::expires_in("tok3n".to_string(), 3600);
        assert!(!format!("{cached:?}").contains("tok3n"));
    }
}
