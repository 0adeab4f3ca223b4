//! Transport runners for the MCP server.

use anyhow::Context;
use rmcp::{
    ServiceExt,
    transport::streamable_http_server::{
        StreamableHttpService, session::local::LocalSessionManager,
    },
};
use std::net::SocketAddr;
use tracing::info;

use super::DriveMcpServer;

/// Path the streamable HTTP endpoint is mounted at
pub const HTTP_MCP_PATH: &str = "/mcp";

/// Serve a single session over stdin/stdout until the client disconnects.
pub async fn run_stdio(server: DriveMcpServer) -> anyhow::Result<()> {
    info!("MCP server running on stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start stdio transport")?;
    service.waiting().await?;
    info!("stdio session closed");
    Ok(())
}

/// Serve streamable HTTP on `bind` until ctrl-c.
pub async fn run_http(server: DriveMcpServer, bind: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", bind))?;

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let app = axum::Router::new().nest_service(HTTP_MCP_PATH, service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("MCP server listening on http://{}{}", addr, HTTP_MCP_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;
    Ok(())
}
