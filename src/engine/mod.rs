//! Execution engine module
//!
//! Main pagination loop and connection testing.
//!
//! # Overview
//!
//! The engine module provides:
//! - `QueryEngine` - follows `nextLink` cursors until the last page, then
//!   hands every record to a `ResultSink`
//! - `ConnectionProbe` - one-record request to check a configuration
//! - `ProgressSink` - status lines emitted while a run is in progress
//! - `QueryResult` - what every operation returns, success or not
//!
//! A run moves through `fetching page N` → `fetching page N+1` | `saving`
//! → `done`. It can be cancelled while fetching and can fail while fetching
//! or saving; both end in a `QueryResult` with `success == false`.

mod probe;
mod progress;
mod types;

pub use probe::ConnectionProbe;
pub use progress::{ChannelProgress, NoProgress, ProgressSink, RecordingProgress, TracingProgress};
pub use types::QueryResult;

use crate::auth::TokenProvider;
use crate::config::ApiQueryConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, PageFetcher};
use crate::output::{suggested_file_name, JsonFileSink, ResultSink};
use crate::pagination::CursorResolver;
use crate::types::Record;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Pause between page requests
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Drives paginated queries
pub struct QueryEngine {
    /// Token resolution and caching
    tokens: TokenProvider,
    /// Single-page HTTP fetches
    fetcher: PageFetcher,
    /// Destination for completed runs
    sink: Arc<dyn ResultSink>,
    /// Delay between consecutive page requests
    pacing: Duration,
}

/// Records collected so far in one run
#[derive(Debug, Default)]
struct RunProgress {
    items: Vec<Record>,
    pages: usize,
}

impl QueryEngine {
    /// Create an engine from its parts
    pub fn new(tokens: TokenProvider, fetcher: PageFetcher, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            tokens,
            fetcher,
            sink,
            pacing: DEFAULT_PACING,
        }
    }

    /// Create an engine whose token provider and fetcher share one HTTP client
    pub fn with_http_config(config: HttpClientConfig, sink: Arc<dyn ResultSink>) -> Result<Self> {
        let fetcher = PageFetcher::with_config(config)?;
        let tokens = TokenProvider::with_client(fetcher.inner().clone());
        Ok(Self::new(tokens, fetcher, sink))
    }

    /// Create an engine with default HTTP settings that saves to the default location
    pub fn with_defaults() -> Result<Self> {
        Self::with_http_config(
            HttpClientConfig::default(),
            Arc::new(JsonFileSink::default_location()),
        )
    }

    /// Set the delay between page requests
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replace the result sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The token provider, e.g. to force re-authentication
    pub fn token_provider(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Delay between page requests
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Fetch every page, save the records and report the outcome
    ///
    /// Never fails: errors and cancellation come back as a `QueryResult`
    /// with `success == false`.
    pub async fn run_all(
        &self,
        config: &ApiQueryConfig,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> QueryResult {
        let start = Instant::now();
        progress.report("Starting data retrieval...");
        info!(
            api_url = %config.api_url,
            tenant_id = %config.tenant_id,
            page_size = config.page_size,
            "Starting paginated query"
        );

        let mut run = RunProgress::default();
        match self.collect_pages(config, progress, cancel, &mut run).await {
            Ok(()) => {}
            Err(Error::Cancelled) => {
                progress.report("Operation was cancelled.");
                info!(pages = run.pages, records = run.items.len(), "Query cancelled");
                return QueryResult::cancelled(run.items, run.pages, start.elapsed());
            }
            Err(e) => return fail(&e, start, progress),
        }

        progress.report("Data retrieval completed. Saving to file...");
        let file_name = suggested_file_name(chrono::Local::now().naive_local());

        let path = match self.sink.save(&run.items, &file_name).await {
            Ok(path) => path,
            Err(e) => return fail(&e, start, progress),
        };

        let duration = start.elapsed();
        progress.report(&format!(
            "Successfully retrieved {} records from {} pages in {:.2} seconds. Saved to: {file_name}",
            run.items.len(),
            run.pages,
            duration.as_secs_f64(),
        ));
        info!(
            pages = run.pages,
            records = run.items.len(),
            path = %path.display(),
            "Query completed"
        );

        QueryResult::completed(run.items, run.pages, duration, path)
    }

    /// Fetch the first page with a page size of one
    ///
    /// No pagination, no persistence, no cancellation.
    pub async fn test_connection(&self, config: &ApiQueryConfig) -> QueryResult {
        let start = Instant::now();
        let probe = ConnectionProbe::new(&self.tokens, &self.fetcher);

        match probe.probe(config).await {
            Ok(records) => QueryResult::connection_ok(records, start.elapsed()),
            Err(e) => {
                warn!(error = %e, "Connection test failed");
                QueryResult::failed(&e, start.elapsed())
            }
        }
    }

    /// The fetch → next cursor → pace loop
    async fn collect_pages(
        &self,
        config: &ApiQueryConfig,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
        run: &mut RunProgress,
    ) -> Result<()> {
        let resolver = CursorResolver::new(&config.api_url, config.page_size)?;
        let mut current = Some(resolver.initial_url()?);

        while let Some(url) = current.take() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let page_number = run.pages + 1;
            progress.report(&format!("Processing page {page_number}..."));

            let token = until_cancelled(cancel, self.tokens.resolve(&config.auth)).await?;
            let page = until_cancelled(
                cancel,
                self.fetcher.fetch_page(&url, &config.tenant_id, &token),
            )
            .await?;

            run.pages = page_number;
            let page_len = page.items.len();
            run.items.extend(page.items);
            progress.report(&format!(
                "Retrieved {page_len} records from page {page_number}. Total: {}",
                run.items.len()
            ));

            current = resolver.next_url(page.next_link.as_deref())?;

            if current.is_some() {
                pace(cancel, self.pacing).await?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("fetcher", &self.fetcher)
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}

fn fail(error: &Error, start: Instant, progress: &dyn ProgressSink) -> QueryResult {
    warn!(error = %error, "Query failed");
    progress.report(&format!("Error occurred: {error}"));
    QueryResult::failed(error, start.elapsed())
}

/// Run `fut` unless `cancel` fires first
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// Sleep between pages, waking early on cancellation
async fn pace(cancel: &CancellationToken, delay: Duration) -> Result<()> {
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}
