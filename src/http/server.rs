//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Resolve `host:port` into a socket address.
///
/// `host` may be an IP literal or a name such as `localhost`; the first
/// resolved address is used.
pub async fn listen_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    let raw = format!("{}:{}", config.host, config.port);
    let mut addrs = tokio::net::lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(|e| ServerError::Address(format!("{raw}: {e}")))?;
    addrs.next().ok_or(ServerError::Address(raw))
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config).await?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    // Setup graceful shutdown
    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
