//! Progress reporting
//!
//! A run reports human-readable status lines through a `ProgressSink`.
//! Reporting never blocks and never fails the run.

use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// Receives progress messages in emission order
pub trait ProgressSink: Send + Sync {
    /// Deliver one status line
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message);
    }
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _message: &str) {}
}

/// Logs every message at INFO
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str) {
        info!(target: "pagination_tool::progress", "{message}");
    }
}

/// Forwards messages to an unbounded channel
///
/// A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: UnboundedSender<String>,
}

impl ChannelProgress {
    /// Wrap a channel sender
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, message: &str) {
        let _ = self.tx.send(message.to_string());
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod progress_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_: &str| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        sink.report("one");
        sink.report("two");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingProgress::new();
        sink.report("first");
        sink.report("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelProgress::new(tx);
        sink.report("hello");
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));

        // Receiver gone: reporting is still fine
        drop(rx);
        sink.report("nobody listening");
    }

    #[test]
    fn test_no_progress() {
        NoProgress.report("ignored");
        TracingProgress.report("logged");
    }
}
