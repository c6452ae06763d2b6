//! MCP transport layer for stdio and streamable HTTP.
//!
//! Provides functions to start the MCP server with different transports.

use std::sync::Arc;

use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tracing::info;

use super::rest;
use super::server::OpenSearchMcpServer;

/// Starts the MCP server with stdio transport.
///
/// The server reads JSON-RPC messages from stdin and writes responses to stdout.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a runtime error.
pub async fn serve_stdio(server: OpenSearchMcpServer) -> anyhow::Result<()> {
    info!("MCP server listening on stdio");
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Starts the MCP server with streamable HTTP transport.
///
/// MCP clients connect at `/mcp`; the REST mirror of the tools is served on
/// the same listener.
///
/// # Errors
///
/// Returns an error if the server fails to bind or encounters a runtime error.
pub async fn serve_http(server: OpenSearchMcpServer, host: &str, port: u16) -> anyhow::Result<()> {
    let ct = tokio_util::sync::CancellationToken::new();

    let rest_routes = rest::router(server.service().clone());
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            cancellation_token: ct.child_token(),
            ..Default::default()
        },
    );

    let router = rest_routes.nest_service("/mcp", service);
    let addr = format!("{host}:{port}");
    let tcp_listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "MCP server listening on http://{addr}/mcp");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            ct.cancel();
        })
        .await?;

    Ok(())
}
