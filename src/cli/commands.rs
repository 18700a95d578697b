//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fetch every page of a cursor-paginated REST API into one JSON file
#[derive(Parser, Debug)]
#[command(name = "pagination-tool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true, env = "PAGINATION_TOOL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(flatten)]
    pub http: HttpOptions,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that take precedence over the configuration file
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// API endpoint returning `{ value, nextLink }` pages
    #[arg(long, global = true, env = "PAGINATION_TOOL_API_URL")]
    pub api_url: Option<String>,

    /// Tenant id sent as `x-raet-tenant-id`
    #[arg(long, global = true, env = "PAGINATION_TOOL_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Records per page
    #[arg(long, global = true, env = "PAGINATION_TOOL_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Static bearer token
    #[arg(long, global = true, env = "PAGINATION_TOOL_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// OAuth2 client id
    #[arg(long, global = true, env = "PAGINATION_TOOL_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[arg(long, global = true, env = "PAGINATION_TOOL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth2 token endpoint
    #[arg(long, global = true, env = "PAGINATION_TOOL_TOKEN_ENDPOINT")]
    pub token_endpoint: Option<String>,
}

/// HTTP client settings shared by the token and page requests
#[derive(Args, Debug, Default, Clone)]
pub struct HttpOptions {
    /// Request timeout in seconds
    #[arg(long, global = true, env = "PAGINATION_TOOL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header
    #[arg(long, global = true, env = "PAGINATION_TOOL_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Extra header sent with every page request, as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", global = true)]
    pub headers: Vec<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single record to test the configuration
    Check,

    /// Fetch every page and save the records
    Run {
        /// Directory for the JSON file (default: Downloads/PaginationTool)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Delay between page requests in milliseconds
        #[arg(long, default_value = "100")]
        pacing_ms: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one line)
    Json,
    /// Human-readable output
    Pretty,
}
