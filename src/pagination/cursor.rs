//! Cursor resolution
//!
//! Turns the `nextLink` of one page into the request URL of the next.
//!
//! Root-relative links only contribute their `nextToken`; the request always
//! goes back to the configured API URL because the authority in relative
//! links is not reliable across environments. Absolute links are followed
//! as-is.

use crate::error::Result;
use crate::types::{NEXT_TOKEN_PARAM, TAKE_PARAM};
use tracing::warn;
use url::Url;

/// Computes request URLs for a paginated endpoint
#[derive(Debug, Clone)]
pub struct CursorResolver {
    base_url: String,
    page_size: u32,
}

impl CursorResolver {
    /// Create a resolver, rejecting base URLs that cannot be parsed
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;
        Ok(Self {
            base_url,
            page_size,
        })
    }

    /// The configured API URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page size sent as `take`
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// URL of the first page
    pub fn initial_url(&self) -> Result<String> {
        build_initial_url(&self.base_url, self.page_size)
    }

    /// URL of the page after the one that returned `next_link`
    pub fn next_url(&self, next_link: Option<&str>) -> Result<Option<String>> {
        next_url(&self.base_url, self.page_size, next_link)
    }
}

/// Append `take=<page_size>` to `base_url`, keeping any existing query
pub fn build_initial_url(base_url: &str, page_size: u32) -> Result<String> {
    build_url_with_parameters(base_url, Some(page_size), None)
}

/// Compute the next request URL, or `None` when pagination is finished
pub fn next_url(base_url: &str, page_size: u32, next_link: Option<&str>) -> Result<Option<String>> {
    let Some(link) = next_link.filter(|l| !l.is_empty()) else {
        return Ok(None);
    };

    if !link.starts_with('/') {
        return Ok(Some(link.to_string()));
    }

    match extract_next_token(link) {
        Some(token) => build_url_with_parameters(base_url, Some(page_size), Some(&token)).map(Some),
        None => {
            warn!(
                next_link = link,
                "Relative nextLink has no nextToken, stopping pagination"
            );
            Ok(None)
        }
    }
}

/// Merge `take` and `nextToken` into the query string of `base_url`
///
/// Existing parameters are kept in front; the token is percent-encoded with
/// the RFC 3986 unreserved set.
pub fn build_url_with_parameters(
    base_url: &str,
    take: Option<u32>,
    next_token: Option<&str>,
) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    let mut params: Vec<String> = Vec::new();

    if let Some(existing) = url.query().filter(|q| !q.is_empty()) {
        params.push(existing.to_string());
    }

    if let Some(take) = take {
        params.push(format!("{TAKE_PARAM}={take}"));
    }

    if let Some(token) = next_token.filter(|t| !t.is_empty()) {
        params.push(format!(
            "{NEXT_TOKEN_PARAM}={}",
            urlencoding::encode(token)
        ));
    }

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&params.join("&")));
    }

    Ok(url.to_string())
}

/// Pull the decoded `nextToken` out of a link without parsing it as a URL
///
/// An empty value counts as no token.
///
/// The link may be relative or otherwise malformed, so the query string is
/// split by hand.
pub fn extract_next_token(next_link: &str) -> Option<String> {
    let (_, query) = next_link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == NEXT_TOKEN_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(std::borrow::Cow::into_owned)
        .filter(|token| !token.is_empty())
}
