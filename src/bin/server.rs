//! Wikipedia MCP Server
//!
//! Run with: wikipedia-mcp-server

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wikipedia_mcp::config::{DEFAULT_API_HOST, DEFAULT_USER_AGENT};
use wikipedia_mcp::mcp::{McpServer, WikipediaHandler};
use wikipedia_mcp::{HttpWikiClient, LanguageState, ServerConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "wikipedia-mcp-server")]
#[command(about = "MCP server exposing Wikipedia lookup tools", version)]
struct Args {
    /// Default Wikipedia language code
    #[arg(long, env = "WIKIPEDIA_LANGUAGE", default_value = "en")]
    language: String,

    /// User-Agent sent to Wikipedia
    #[arg(long, env = "WIKIPEDIA_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Request timeout in seconds
    #[arg(long, env = "WIKIPEDIA_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// API host template ({lang} is replaced by the language code)
    #[arg(long, env = "WIKIPEDIA_API_HOST", default_value = DEFAULT_API_HOST)]
    api_host: String,

    /// Maximum follow-up requests when paging through long lists
    #[arg(long, env = "WIKIPEDIA_MAX_CONTINUATIONS", default_value = "10")]
    max_continuations: usize,

    /// Report tool failures as plain text without the isError flag
    #[arg(long, env = "WIKIPEDIA_MCP_LEGACY_ERRORS")]
    legacy_error_envelope: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "WIKIPEDIA_MCP_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            language: self.language,
            user_agent: self.user_agent,
            timeout_secs: self.timeout_secs,
            api_host: self.api_host,
            max_continuations: self.max_continuations,
            legacy_error_envelope: self.legacy_error_envelope,
        }
    }
}

fn init_tracing(format: LogFormat) {
    // stdout is for MCP protocol
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "wikipedia_mcp=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let client = HttpWikiClient::new(config.clone())?;
    let language = LanguageState::new(wikipedia_mcp::wiki::normalize_language(&config.language)?);

    let handler = WikipediaHandler::new(Arc::new(client), language)
        .with_legacy_error_envelope(config.legacy_error_envelope);
    let server = McpServer::new(handler);

    tracing::info!(
        language = %config.language,
        "Wikipedia MCP server running on stdio"
    );
    server.run().await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.log_format);

    if let Err(e) = run(args.into_config()).await {
        tracing::error!("Fatal error in main(): {:#}", e);
        std::process::exit(1);
    }
}
