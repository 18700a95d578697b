//! Result sinks
//!
//! Where a finished run's records go. The engine only knows the
//! `ResultSink` trait; `JsonFileSink` writes a pretty-printed JSON array.

use crate::error::{Error, Result};
use crate::types::Record;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subfolder created under the user's Downloads/Documents directory
pub const TOOL_DIR_NAME: &str = "PaginationTool";

/// Persists the aggregated records of a run
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store `data` under (a name derived from) `suggested_file_name`
    /// and return where it ended up
    async fn save(&self, data: &[Record], suggested_file_name: &str) -> Result<PathBuf>;
}

/// File name for a run finished at `at`: `api_data_<YYYYMMDD_HHmmss>.json`
pub fn suggested_file_name(at: NaiveDateTime) -> String {
    format!("api_data_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Writes records as one pretty-printed JSON array per run
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Write into `dir`, creating it on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write into `PaginationTool` under Downloads, falling back to Documents
    pub fn default_location() -> Self {
        Self::new(default_output_dir())
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ResultSink for JsonFileSink {
    async fn save(&self, data: &[Record], suggested_file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::output(format!(
                "Failed to create output directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let contents = serde_json::to_string_pretty(data)
            .map_err(|e| Error::output(format!("Failed to serialize records: {e}")))?;

        // Write to temp file first, then rename for atomicity
        let path = self.dir.join(suggested_file_name);
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::output(format!("Failed to write {}: {e}", temp_path.display())))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::output(format!("Failed to rename {}: {e}", temp_path.display())))?;

        debug!(path = %path.display(), records = data.len(), "Saved records");
        Ok(path)
    }
}

/// Downloads if it exists, else Documents, else the working directory
fn default_output_dir() -> PathBuf {
    let base = dirs::download_dir()
        .filter(|d| d.is_dir())
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")).filter(|d| d.is_dir()))
        .or_else(dirs::document_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(TOOL_DIR_NAME)
}
