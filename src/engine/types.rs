//! Engine types
//!
//! The result value returned by every engine operation.

use crate::error::Error;
use crate::types::Record;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a query run or connection test
///
/// Built once at the end of an operation and handed to the caller.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Aggregated records (kept out of the printed summary)
    #[serde(skip)]
    pub items: Vec<Record>,
    /// Number of records retrieved
    pub total_count: usize,
    /// Number of pages fetched
    pub pages_processed: usize,
    /// Wall time of the operation
    #[serde(rename = "durationSeconds", serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Whether the operation completed
    pub success: bool,
    /// Why the operation did not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Where the records were saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl QueryResult {
    /// A run that fetched every page and saved them
    pub fn completed(
        items: Vec<Record>,
        pages_processed: usize,
        duration: Duration,
        file_path: PathBuf,
    ) -> Self {
        Self {
            total_count: items.len(),
            items,
            pages_processed,
            duration,
            success: true,
            error_message: None,
            file_path: Some(file_path),
        }
    }

    /// A run stopped by the user; collected records are kept but not saved
    pub fn cancelled(items: Vec<Record>, pages_processed: usize, duration: Duration) -> Self {
        Self {
            total_count: items.len(),
            items,
            pages_processed,
            duration,
            success: false,
            error_message: Some(Error::Cancelled.to_string()),
            file_path: None,
        }
    }

    /// A run or test that failed; nothing is kept
    pub fn failed(error: &Error, duration: Duration) -> Self {
        Self {
            duration,
            error_message: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// A successful single-page connection test
    pub fn connection_ok(records: usize, duration: Duration) -> Self {
        Self {
            total_count: records,
            pages_processed: 1,
            duration,
            success: true,
            ..Self::default()
        }
    }

    /// True when the run ended because the user cancelled it
    pub fn is_cancelled(&self) -> bool {
        !self.success && self.error_message.as_deref() == Some(CANCELLED_MESSAGE)
    }
}

const CANCELLED_MESSAGE: &str = "Operation was cancelled by user";

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed() {
        let result = QueryResult::completed(
            vec![json!({"id": 1}), json!({"id": 2})],
            1,
            Duration::from_millis(1500),
            PathBuf::from("/tmp/api_data.json"),
        );
        assert!(result.success);
        assert_eq!(result.total_count, 2);
        assert!(result.error_message.is_none());
        assert!(!result.is_cancelled());
    }

    #[test]
    fn test_cancelled() {
        let result = QueryResult::cancelled(vec![json!(1)], 1, Duration::from_secs(1));
        assert!(!result.success);
        assert!(result.is_cancelled());
        assert_eq!(result.total_count, 1);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Operation was cancelled by user")
        );
        assert!(result.file_path.is_none());
    }

    #[test]
    fn test_failed() {
        let result = QueryResult::failed(&Error::http_status(500, "boom"), Duration::from_secs(2));
        assert!(!result.success);
        assert!(!result.is_cancelled());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.duration, Duration::from_secs(2));
        assert!(result.error_message.unwrap().contains("500"));
    }

    #[test]
    fn test_serialize_summary() {
        let result = QueryResult::completed(
            vec![json!({"id": 1})],
            1,
            Duration::from_millis(250),
            PathBuf::from("out.json"),
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "totalCount": 1,
                "pagesProcessed": 1,
                "durationSeconds": 0.25,
                "success": true,
                "filePath": "out.json"
            })
        );
    }
}
