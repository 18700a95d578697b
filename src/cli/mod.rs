//! CLI module
//!
//! Command-line interface for running paginated queries.
//!
//! # Commands
//!
//! - `check` - Fetch one record to test the configuration
//! - `run` - Fetch every page and save the records

mod commands;
mod runner;

pub use commands::{Cli, Commands, ConfigOverrides, HttpOptions, OutputFormat};
pub use runner::Runner;
