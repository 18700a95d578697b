//! Connection probe
//!
//! One page of one record: proves the URL, tenant and credentials work.

use crate::auth::TokenProvider;
use crate::config::ApiQueryConfig;
use crate::error::Result;
use crate::http::PageFetcher;
use crate::pagination::build_initial_url;
use tracing::debug;

/// Single-request reachability check
#[derive(Debug, Clone, Copy)]
pub struct ConnectionProbe<'a> {
    tokens: &'a TokenProvider,
    fetcher: &'a PageFetcher,
}

impl<'a> ConnectionProbe<'a> {
    /// Page size used for the probe request
    pub const PAGE_SIZE: u32 = 1;

    /// Create a probe over an existing provider and fetcher
    pub fn new(tokens: &'a TokenProvider, fetcher: &'a PageFetcher) -> Self {
        Self { tokens, fetcher }
    }

    /// Fetch the first page with `take=1` and return its record count
    ///
    /// The page's `nextLink` is not looked at.
    pub async fn probe(&self, config: &ApiQueryConfig) -> Result<usize> {
        let url = build_initial_url(&config.api_url, Self::PAGE_SIZE)?;
        let token = self.tokens.resolve(&config.auth).await?;
        let page = self
            .fetcher
            .fetch_page(&url, &config.tenant_id, &token)
            .await?;

        debug!(records = page.len(), "Connection probe succeeded");
        Ok(page.len())
    }
}
