//! Authentication module
//!
//! Supports: static Bearer token, OAuth2 Client Credentials
//!
//! The `TokenProvider` resolves the token for each page request and caches
//! client-credentials tokens until the early-refresh margin is reached.

mod provider;
mod types;

pub use provider::TokenProvider;
pub use types::{
    AuthConfig, AuthMode, CachedToken, DEFAULT_TOKEN_LIFETIME_SECS, EARLY_REFRESH_MARGIN_SECS,
    MAX_TOKEN_LIFETIME_SECS,
};
