//! Pagination module
//!
//! Supports: `nextLink` envelopes carrying either an absolute URL or a
//! root-relative link with a `nextToken` cursor.
//!
//! # Overview
//!
//! `CursorResolver` builds the first page URL (`take=<page size>`) and
//! derives every following URL from the previous page's `nextLink`.

mod cursor;

pub use cursor::{
    build_initial_url, build_url_with_parameters, extract_next_token, next_url, CursorResolver,
};

#[cfg(test)]
mod tests;
