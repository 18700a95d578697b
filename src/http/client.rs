//! Page fetcher
//!
//! Issues one authenticated GET against a paginated endpoint and parses the
//! `{ value, nextLink }` envelope. No retries: a failed page is a failed run.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, Record, TENANT_HEADER};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all page requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("pagination-tool/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Build a reqwest client from this config
    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(Error::Http)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records on this page, in server order
    pub items: Vec<Record>,
    /// Link to the next page, if the server sent one
    pub next_link: Option<String>,
}

impl Page {
    /// Parse a page envelope, matching property names case-insensitively
    ///
    /// A missing or null `value` is an empty page. An empty body is too.
    pub fn from_body(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let json: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Response is not valid JSON: {e}")))?;

        let JsonValue::Object(envelope) = json else {
            return Err(Error::decode("Response is not a JSON object"));
        };

        let items = match get_ignore_case(&envelope, "value") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items.clone(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "Expected 'value' to be an array, found {}",
                    json_kind(other)
                )));
            }
        };

        let next_link = match get_ignore_case(&envelope, "nextLink") {
            Some(JsonValue::String(link)) if !link.is_empty() => Some(link.clone()),
            _ => None,
        };

        Ok(Self { items, next_link })
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the page carries no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Exact match first, then the first key equal ignoring ASCII case
fn get_ignore_case<'a>(object: &'a JsonObject, key: &str) -> Option<&'a JsonValue> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Fetches single pages from the upstream API
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl PageFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            config: HttpClientConfig::default(),
        }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// GET one page with bearer and tenant headers
    pub async fn fetch_page(&self, url: &str, tenant_id: &str, token: &str) -> Result<Page> {
        let mut req = self.client.get(url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        req = req.bearer_auth(token).header(TENANT_HEADER, tenant_id);

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        let page = Page::from_body(&body)?;

        debug!(
            url,
            records = page.len(),
            has_next = page.next_link.is_some(),
            "Fetched page"
        );
        Ok(page)
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
