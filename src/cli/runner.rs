//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ConfigOverrides, HttpOptions, OutputFormat};
use crate::config::ApiQueryConfig;
use crate::engine::{QueryEngine, QueryResult};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::output::{JsonFileSink, ResultSink};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    ///
    /// Returns whether the operation succeeded. Configuration problems are
    /// errors; a failed or cancelled run is a printed result and `false`.
    pub async fn run(&self) -> Result<bool> {
        let config = self.load_config()?;
        config.validate()?;

        let result = match &self.cli.command {
            Commands::Check => self.check(&config).await?,
            Commands::Run {
                output_dir,
                pacing_ms,
            } => {
                self.run_all(&config, output_dir.clone(), *pacing_ms)
                    .await?
            }
        };

        self.output_result(&result);
        Ok(result.success)
    }

    /// Load the config file (if any) and apply flag/env overrides
    pub fn load_config(&self) -> Result<ApiQueryConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading config file");
                ApiQueryConfig::from_file(path)?
            }
            None => ApiQueryConfig::default(),
        };
        apply_overrides(&mut config, &self.cli.overrides);
        Ok(config)
    }

    /// HTTP client settings from the command line
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        build_http_config(&self.cli.http)
    }

    /// Check connection
    async fn check(&self, config: &ApiQueryConfig) -> Result<QueryResult> {
        info!(api_url = %config.api_url, "Checking connection");
        let engine = QueryEngine::with_http_config(
            self.http_config()?,
            Arc::new(JsonFileSink::default_location()),
        )?;
        Ok(engine.test_connection(config).await)
    }

    /// Fetch every page, cancelling on Ctrl-C
    async fn run_all(
        &self,
        config: &ApiQueryConfig,
        output_dir: Option<PathBuf>,
        pacing_ms: u64,
    ) -> Result<QueryResult> {
        let sink: Arc<dyn ResultSink> = match output_dir {
            Some(dir) => Arc::new(JsonFileSink::new(dir)),
            None => Arc::new(JsonFileSink::default_location()),
        };
        let engine = QueryEngine::with_http_config(self.http_config()?, sink)?
            .with_pacing(Duration::from_millis(pacing_ms));

        let cancel = CancellationToken::new();
        let on_ctrl_c = cancel.clone();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling");
                on_ctrl_c.cancel();
            }
        });

        let progress = |message: &str| eprintln!("{message}");
        let result = engine.run_all(config, &progress, &cancel).await;

        signal_task.abort();
        Ok(result)
    }

    fn output_result(&self, result: &QueryResult) {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(result),
            OutputFormat::Pretty => serde_json::to_string_pretty(result),
        };
        println!("{}", rendered.unwrap_or_default());
    }
}

/// Apply `--timeout-secs`, `--user-agent` and `--header` on top of the defaults
fn build_http_config(options: &HttpOptions) -> Result<HttpClientConfig> {
    let mut builder = HttpClientConfig::builder();
    if let Some(secs) = options.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(agent) = &options.user_agent {
        builder = builder.user_agent(agent);
    }
    for header in &options.headers {
        let (name, value) = header
            .split_once(':')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_else(|| {
                Error::config(format!("Invalid header '{header}', expected 'Name: value'"))
            })?;
        builder = builder.header(name.trim(), value.trim());
    }
    Ok(builder.build())
}

/// Overwrite config values with any that were given on the command line
fn apply_overrides(config: &mut ApiQueryConfig, overrides: &ConfigOverrides) {
    if let Some(api_url) = &overrides.api_url {
        config.api_url.clone_from(api_url);
    }
    if let Some(tenant_id) = &overrides.tenant_id {
        config.tenant_id.clone_from(tenant_id);
    }
    if let Some(page_size) = overrides.page_size {
        config.page_size = page_size;
    }

    let auth = &mut config.auth;
    if overrides.bearer_token.is_some() {
        auth.bearer_token.clone_from(&overrides.bearer_token);
    }
    if overrides.client_id.is_some() {
        auth.client_id.clone_from(&overrides.client_id);
    }
    if overrides.client_secret.is_some() {
        auth.client_secret.clone_from(&overrides.client_secret);
    }
    if overrides.token_endpoint.is_some() {
        auth.token_endpoint.clone_from(&overrides.token_endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use clap::Parser;
    use std::io::Write;

    /// Parse arguments with no `PAGINATION_TOOL_*` variables in the environment
    fn parse(args: &[&str]) -> Cli {
        for (key, _) in std::env::vars() {
            if key.starts_with("PAGINATION_TOOL_") {
                std::env::remove_var(key);
            }
        }
        Cli::try_parse_from(std::iter::once("pagination-tool").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "apiUrl: https://file.example.com/items\ntenantId: from-file\npageSize: 25\nauth:\n  bearerToken: file-token"
        )
        .unwrap();

        let cli = parse(&[
            "--config",
            file.path().to_str().unwrap(),
            "--tenant-id",
            "from-flag",
            "check",
        ]);

        let config = Runner::new(cli).load_config().unwrap();
        assert_eq!(config.api_url, "https://file.example.com/items");
        assert_eq!(config.tenant_id, "from-flag");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.auth.bearer_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_flags_only() {
        let cli = parse(&[
            "run",
            "--api-url",
            "https://api.example.com/items",
            "--tenant-id",
            "t1",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--token-endpoint",
            "https://auth.example.com/token",
            "--pacing-ms",
            "0",
        ]);

        assert!(matches!(cli.command, Commands::Run { pacing_ms: 0, .. }));
        let config = Runner::new(cli).load_config().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.auth,
            AuthConfig::client_credentials("id", "secret", "https://auth.example.com/token")
        );
    }

    #[test]
    fn test_http_options() {
        let cli = parse(&[
            "--timeout-secs",
            "5",
            "--user-agent",
            "exporter/2.0",
            "-H",
            "Accept-Language: nl-NL",
            "--header",
            "X-Trace:abc:def",
            "check",
        ]);

        let config = Runner::new(cli).http_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "exporter/2.0");
        assert_eq!(
            config.default_headers.get("Accept-Language").map(String::as_str),
            Some("nl-NL")
        );
        assert_eq!(
            config.default_headers.get("X-Trace").map(String::as_str),
            Some("abc:def")
        );
    }

    #[test]
    fn test_http_defaults_without_options() {
        let config = Runner::new(parse(&["check"])).http_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_malformed_header_is_a_config_error() {
        let cli = parse(&["-H", "no-colon-here", "check"]);
        let err = Runner::new(cli).http_config().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("no-colon-here"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_an_error() {
        let cli = parse(&["--api-url", "", "check"]);
        let err = Runner::new(cli).run().await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("API URL is required"));
    }
}
