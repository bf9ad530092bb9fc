//! MCP server runners for asapi-mcp.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use asapi_core::control::SearchControlPlane;
use asapi_core::provider::SymbolProvider;
use axum::Router;
use axum::routing::get;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::AngelscriptMcp;

const DEFAULT_MCP_HTTP_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 4020);

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    #[must_use]
    pub const fn with_sse_keep_alive(mut self, sse_keep_alive: Option<Duration>) -> Self {
        self.sse_keep_alive = sse_keep_alive;
        self
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MCP_HTTP_ADDR)
    }
}

/// Serves the MCP server over stdio until the peer disconnects.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<P>(
    control: SearchControlPlane<P>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    P: SymbolProvider + 'static,
{
    let service = AngelscriptMcp::new(control);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    info!("asapi-mcp serving over stdio");
    let reason = running.waiting().await?;
    info!(?reason, "stdio session ended");
    Ok(())
}

/// Builds the HTTP router: the MCP endpoint under `/mcp` plus `/health`.
#[must_use]
pub fn http_router<P>(control: SearchControlPlane<P>, config: &McpHttpServerConfig) -> Router
where
    P: SymbolProvider + 'static,
{
    let service: StreamableHttpService<AngelscriptMcp<P>, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(AngelscriptMcp::new(control.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                sse_retry: config.sse_retry,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service)
}

/// Serves the MCP server using streamable HTTP transport.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http<P>(
    control: SearchControlPlane<P>,
    config: &McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    P: SymbolProvider + 'static,
{
    let app = http_router(control, config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "asapi-mcp listening for streamable HTTP");
    axum::serve(listener, app).await?;
    Ok(())
}
