//! Output module
//!
//! Persists the records of a finished run.
//!
//! # Overview
//!
//! - `ResultSink` is the seam the engine saves through
//! - `JsonFileSink` writes `api_data_<timestamp>.json` files
//! - `suggested_file_name` builds the timestamped name

mod sink;

pub use sink::{suggested_file_name, JsonFileSink, ResultSink, TOOL_DIR_NAME};
