//! Daemon entry point for the asapi MCP server.
//!
//! Loads configuration from CLI arguments and the environment, starts loading
//! the API snapshot in the background, and serves the MCP protocol over stdio,
//! streamable HTTP, or both.

mod config;
mod provider;

use std::error::Error;
use std::process::ExitCode;

use asapi_core::control::SearchControlPlane;
use asapi_core::provider::SnapshotProvider;
use asapi_mcp::server::{serve_stdio, serve_streamable_http};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AsapiConfig;
use crate::provider::build_control;

type DaemonResult = Result<(), Box<dyn Error + Send + Sync>>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AsapiConfig::from_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("asapi-mcpd: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "asapi-mcpd stopped");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(config: &AsapiConfig) -> DaemonResult {
    let (control, _loader) = build_control(config);
    info!(
        stdio = config.enable_stdio,
        http = config.mcp_serve,
        concurrency = config.detail_concurrency,
        "asapi-mcpd starting"
    );

    match (config.enable_stdio, config.mcp_serve) {
        (true, true) => {
            let http = serve_http(control.clone(), config);
            tokio::select! {
                result = serve_stdio(control) => result,
                result = http => result,
            }
        }
        (true, false) => serve_stdio(control).await,
        (false, true) => serve_http(control, config).await,
        (false, false) => Ok(()),
    }
}

async fn serve_http(
    control: SearchControlPlane<SnapshotProvider>,
    config: &AsapiConfig,
) -> DaemonResult {
    serve_streamable_http(control, &config.mcp_http_config()).await
}
