//! Argentine stock market MCP server over stdio

use anyhow::Context;
use clap::Parser;
use mercado_stock::{MarketConfig, YahooFinanceClient};
use mercado_utils::{LogFormat, LoggingConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mercado-server")]
#[command(about = "MCP server for Argentine stock quotes over stdio", long_about = None)]
struct Args {
    /// Log filter directive; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format (pretty or json), always written to stderr
    #[arg(long, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Yahoo Finance API base URL
    #[arg(long, env = "MERCADO_YAHOO_BASE_URL")]
    base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "MERCADO_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    mercado_utils::init_tracing(&LoggingConfig::new(&args.log_level, args.log_format));

    let mut builder = MarketConfig::builder();
    if let Some(url) = args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    let config = builder.build().context("invalid market data configuration")?;

    info!(base_url = %config.base_url, timeout = ?config.request_timeout, "Starting mercado-server");

    let client = YahooFinanceClient::new(&config).context("failed to create market data client")?;
    let server = mercado_server::build_server(Arc::new(client))?;

    mercado_mcp::transport::serve_stdio(&server).await?;
    Ok(())
}
