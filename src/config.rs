//! Query configuration
//!
//! `ApiQueryConfig` is everything one run needs: where to read from, which
//! tenant to read as, how large each page is and how to authenticate.
//! It can be built in code or loaded from a YAML/JSON file.

use crate::auth::{AuthConfig, AuthMode};
use crate::error::{Error, Result};
use crate::types::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one paginated query run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQueryConfig {
    /// Endpoint returning `{ value, nextLink }` pages
    #[serde(alias = "api_url")]
    pub api_url: String,

    /// Tenant sent in the `x-raet-tenant-id` header
    #[serde(alias = "tenant_id")]
    pub tenant_id: String,

    /// Records requested per page (`take` parameter)
    #[serde(default = "default_page_size", alias = "page_size")]
    pub page_size: u32,

    /// Authentication settings
    #[serde(default, alias = "authentication")]
    pub auth: AuthConfig,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ApiQueryConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            tenant_id: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            auth: AuthConfig::default(),
        }
    }
}

impl ApiQueryConfig {
    /// Create a config with the default page size
    pub fn new(api_url: impl Into<String>, tenant_id: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            api_url: api_url.into(),
            tenant_id: tenant_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            auth,
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Load a config from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_str(&contents)
    }

    /// Parse a config from a YAML or JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        // JSON is a subset of YAML, one parser covers both
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Check the config the way a form would, reporting every problem at once
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<&str> = Vec::new();

        if self.api_url.trim().is_empty() {
            errors.push("API URL is required");
        }
        if self.tenant_id.trim().is_empty() {
            errors.push("Tenant ID is required");
        }
        if self.page_size == 0 {
            errors.push("Page size must be greater than zero");
        }

        match self.auth.mode() {
            AuthMode::Bearer(_) => {}
            AuthMode::ClientCredentials { .. } => {}
            AuthMode::Incomplete => {
                if self.auth.prefers_client_credentials() {
                    if is_blank(self.auth.token_endpoint.as_deref()) {
                        errors.push("Token Endpoint is required");
                    }
                    if is_blank(self.auth.client_id.as_deref()) {
                        errors.push("Client ID is required");
                    }
                    if is_blank(self.auth.client_secret.as_deref()) {
                        errors.push("Client Secret is required");
                    }
                } else {
                    errors.push("Bearer Token is required");
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::config(errors.join(", ")))
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
