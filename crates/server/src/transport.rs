//! Transport adapters: stdio pipe and streamable HTTP listener.

use crate::error::{Result, ServerError};
use crate::server::ApexServer;
use apex_mcp_tools::ToolRegistry;
use axum::routing::get;
use axum::{Json, Router};
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::{Value, json};
use std::sync::Arc;

/// Serve MCP over stdin/stdout until the client closes the pipe.
///
/// # Errors
///
/// Returns [`ServerError::Startup`] if the MCP handshake fails or the service task panics.
pub async fn serve_stdio(server: ApexServer) -> Result<()> {
    tracing::info!("serving MCP over stdio");
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| ServerError::Startup(format!("stdio transport failed to start: {e}")))?;
    let reason = running
        .waiting()
        .await
        .map_err(|e| ServerError::Startup(format!("stdio transport task failed: {e}")))?;
    tracing::info!(?reason, "stdio transport closed");
    Ok(())
}

/// Router with the stateless MCP endpoint at `/mcp` and a liveness probe at `/health`.
pub fn router(registry: ToolRegistry) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(ApexServer::new(registry.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError::Startup`] if the address cannot be bound, or [`ServerError::Io`] if
/// the server fails while running.
pub async fn serve_http(registry: ToolRegistry, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Startup(format!("failed to bind {addr}: {e}")))?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "serving MCP over streamable HTTP at /mcp");

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("HTTP transport stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
