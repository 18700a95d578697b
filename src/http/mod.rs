//! HTTP module
//!
//! Provides the page fetcher used by the query engine.
//!
//! # Features
//!
//! - **Auth headers**: `Authorization: Bearer` plus the tenant header
//! - **Envelope parsing**: case-insensitive `{ value, nextLink }`
//! - **Error classification**: non-2xx responses carry status and body

mod client;

pub use client::{HttpClientConfig, HttpClientConfigBuilder, Page, PageFetcher};
