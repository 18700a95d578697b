//! Tests for pagination module

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

// ============================================================================
// Initial URL Tests
// ============================================================================

#[test_case("https://host/api/items", 100, "https://host/api/items?take=100" ; "plain url")]
#[test_case("https://host/api/items?status=open", 25, "https://host/api/items?status=open&take=25" ; "existing query kept")]
#[test_case("https://host:8443/v2/people", 1, "https://host:8443/v2/people?take=1" ; "explicit port")]
#[test_case("https://host", 10, "https://host/?take=10" ; "bare host")]
fn test_build_initial_url(base: &str, page_size: u32, expected: &str) {
    assert_eq!(build_initial_url(base, page_size).unwrap(), expected);
}

#[test]
fn test_build_initial_url_invalid_base() {
    let err = build_initial_url("not a url", 10).unwrap_err();
    assert!(matches!(err, crate::Error::InvalidUrl(_)));
}

#[test]
fn test_build_url_without_parameters() {
    assert_eq!(
        build_url_with_parameters("https://host/api", None, None).unwrap(),
        "https://host/api"
    );
    assert_eq!(
        build_url_with_parameters("https://host/api", None, Some("")).unwrap(),
        "https://host/api"
    );
}

// ============================================================================
// Next URL Tests
// ============================================================================

#[test]
fn test_next_url_relative_uses_configured_base() {
    let next = next_url(
        "https://host/api/items",
        50,
        Some("/foo?nextToken=abc123"),
    )
    .unwrap();
    assert_eq!(
        next.as_deref(),
        Some("https://host/api/items?take=50&nextToken=abc123")
    );
}

#[test]
fn test_next_url_relative_ignores_link_path_and_other_params() {
    let next = next_url(
        "https://tenant.example.com/v1/employees?active=true",
        20,
        Some("/internal/v9/employees?take=999&nextToken=xyz&foo=bar"),
    )
    .unwrap();
    assert_eq!(
        next.as_deref(),
        Some("https://tenant.example.com/v1/employees?active=true&take=20&nextToken=xyz")
    );
}

#[test]
fn test_next_url_absolute_verbatim() {
    let next = next_url(
        "https://host/api/items",
        50,
        Some("https://other-host/page2"),
    )
    .unwrap();
    assert_eq!(next.as_deref(), Some("https://other-host/page2"));
}

#[test_case(None ; "absent")]
#[test_case(Some("") ; "empty")]
#[test_case(Some("/foo") ; "relative without query")]
#[test_case(Some("/foo?take=50") ; "relative without token")]
#[test_case(Some("/foo?nextToken") ; "token without value")]
#[test_case(Some("/foo?nextToken=") ; "token with empty value")]
#[test_case(Some("/api/items?take=50&nextToken=#top") ; "empty token before fragment")]
fn test_next_url_done(link: Option<&str>) {
    assert_eq!(next_url("https://host/api/items", 50, link).unwrap(), None);
}

#[test]
fn test_next_url_invalid_base_only_matters_for_relative_links() {
    assert!(next_url("::bad::", 5, Some("/x?nextToken=a")).is_err());
    assert_eq!(
        next_url("::bad::", 5, Some("https://h/p")).unwrap().as_deref(),
        Some("https://h/p")
    );
}

// ============================================================================
// Token Extraction Tests
// ============================================================================

#[test_case("/items?nextToken=abc", Some("abc") ; "simple")]
#[test_case("/items?a=1&nextToken=abc&b=2", Some("abc") ; "middle parameter")]
#[test_case("/items?nextToken=a%26b%3Dc", Some("a&b=c") ; "escaped delimiters")]
#[test_case("/items?nextToken=a+b", Some("a+b") ; "plus kept literally")]
#[test_case("/items?nextToken=abc#frag", Some("abc") ; "fragment dropped")]
#[test_case("/items?NextToken=abc", None ; "key is case sensitive")]
#[test_case("/items", None ; "no query")]
#[test_case("/items?nextToken=%FF", None ; "invalid utf8")]
#[test_case("/items?nextToken=", None ; "empty value")]
fn test_extract_next_token(link: &str, expected: Option<&str>) {
    assert_eq!(extract_next_token(link).as_deref(), expected);
}

#[test_case("abc123" ; "plain")]
#[test_case("a&b=c" ; "query delimiters")]
#[test_case("100%done" ; "percent")]
#[test_case("x=&=&%25%%" ; "mixed")]
#[test_case("eyJwYWdlIjoyfQ==" ; "base64 padding")]
#[test_case("spaces and + plus / slash ? mark" ; "reserved characters")]
fn test_token_round_trip(token: &str) {
    let url = build_url_with_parameters("https://host/api/items", Some(10), Some(token)).unwrap();
    assert_eq!(extract_next_token(&url).as_deref(), Some(token));

    // The server echoing the encoded token in a relative link is followed the same way
    let (_, query) = url.split_once('?').unwrap();
    let relative = format!("/api/items?{query}");
    assert_eq!(
        next_url("https://host/api/items", 10, Some(&relative)).unwrap(),
        Some(url)
    );
}

// ============================================================================
// Resolver Tests
// ============================================================================

#[test]
fn test_cursor_resolver() {
    let resolver = CursorResolver::new("https://host/api/items", 50).unwrap();
    assert_eq!(resolver.base_url(), "https://host/api/items");
    assert_eq!(resolver.page_size(), 50);
    assert_eq!(
        resolver.initial_url().unwrap(),
        "https://host/api/items?take=50"
    );
    assert_eq!(
        resolver.next_url(Some("/x?nextToken=t1")).unwrap().as_deref(),
        Some("https://host/api/items?take=50&nextToken=t1")
    );
    assert_eq!(resolver.next_url(None).unwrap(), None);
}

#[test]
fn test_cursor_resolver_rejects_bad_url() {
    assert!(CursorResolver::new("", 10).is_err());
    assert!(CursorResolver::new("host/without/scheme", 10).is_err());
}
