//! Common types used throughout the pagination tool
//!
//! Type aliases shared by the fetcher, the engine and the output sink.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One item of a page. The tool never looks inside records.
pub type Record = JsonValue;

// ============================================================================
// Wire constants
// ============================================================================

/// Header carrying the tenant identifier on every page request
pub const TENANT_HEADER: &str = "x-raet-tenant-id";

/// Query parameter holding the page size
pub const TAKE_PARAM: &str = "take";

/// Query parameter holding the server-issued cursor
pub const NEXT_TOKEN_PARAM: &str = "nextToken";

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;
