// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Pagination Tool
//!
//! Fetches every page of a cursor-paginated REST API and saves the records
//! as one JSON array.
//!
//! ## Features
//!
//! - **Two auth modes**: static bearer token or OAuth2 client credentials,
//!   with the exchanged token cached until shortly before it expires
//! - **Cursor pagination**: follows `nextLink`, rebuilding relative links
//!   against the configured endpoint
//! - **Cancellation**: stops between pages or mid-request
//! - **Never panics on failure**: every run ends in a `QueryResult`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagination_tool::{ApiQueryConfig, AuthConfig, QueryEngine};
//! use pagination_tool::engine::TracingProgress;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> pagination_tool::Result<()> {
//!     let config = ApiQueryConfig::new(
//!         "https://api.example.com/v1/employees",
//!         "tenant-42",
//!         AuthConfig::bearer("eyJ..."),
//!     )
//!     .with_page_size(500);
//!
//!     let engine = QueryEngine::with_defaults()?;
//!     let result = engine
//!         .run_all(&config, &TracingProgress, &CancellationToken::new())
//!         .await;
//!
//!     println!("{} records in {:?}", result.total_count, result.file_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       QueryEngine                        │
//! │   run_all(config, progress, cancel)   test_connection()  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──┬────────────────┬─────────────┐
//! │     Auth     │      HTTP      │   Pagination   │   Output    │
//! ├──────────────┼────────────────┼────────────────┼─────────────┤
//! │ Bearer       │ PageFetcher    │ CursorResolver │ ResultSink  │
//! │ OAuth2 (cc)  │ {value,        │ take=N         │ JsonFileSink│
//! │ Token cache  │  nextLink}     │ nextToken=...  │             │
//! └──────────────┴────────────────┴────────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pagination tool
pub mod error;

/// Common types and constants
pub mod types;

/// Query configuration
pub mod config;

/// Token resolution and caching
pub mod auth;

/// Single-page HTTP fetches
pub mod http;

/// Cursor handling
pub mod pagination;

/// Pagination loop and connection test
pub mod engine;

/// Result persistence
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use config::ApiQueryConfig;
pub use engine::{QueryEngine, QueryResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
