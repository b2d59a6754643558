//! MCP server builder utilities.
//!
//! Runs any `rmcp::ServerHandler` over the configured transport until the
//! peer disconnects or a shutdown signal arrives.
//!
//! # Example
//!
//! ```ignore
//! use imagegen_mcp_common::server::McpServerBuilder;
//! use imagegen_mcp_common::transport::Transport;
//!
//! McpServerBuilder::new(handler)
//!     .with_transport(Transport::stdio())
//!     .run()
//!     .await?;
//! ```

use crate::transport::Transport;
use rmcp::{ServerHandler, ServiceExt};
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors that can occur when running an MCP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified port
    #[error("Failed to bind to port {port}: {message}")]
    BindFailed { port: u16, message: String },

    /// Transport error during communication
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring and running MCP servers.
pub struct McpServerBuilder<H> {
    handler: H,
    transport: Transport,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl<H> McpServerBuilder<H>
where
    H: ServerHandler + Clone + Send + Sync + 'static,
{
    /// Create a new server builder with the given handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            transport: Transport::default(),
            shutdown_rx: None,
        }
    }

    /// Set the transport mode for the server.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set a shutdown signal receiver for graceful shutdown.
    ///
    /// When the sender is dropped or a message is sent, the server stops.
    pub fn with_shutdown(mut self, shutdown_rx: oneshot::Receiver<()>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Run the MCP server with the configured transport.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(transport = %self.transport, "Starting MCP server");

        match self.transport.port() {
            None => self.run_stdio().await,
            Some(port) => self.run_http(port).await,
        }
    }

    async fn run_stdio(self) -> Result<(), ServerError> {
        use rmcp::transport::io::stdio;

        let shutdown = shutdown_future(self.shutdown_rx);

        let service = self
            .handler
            .serve(stdio())
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        tokio::select! {
            result = service.waiting() => {
                result.map_err(|e| ServerError::Transport(e.to_string()))?;
                tracing::info!("Client disconnected");
                Ok(())
            }
            result = shutdown => {
                result?;
                tracing::info!("Received shutdown signal, stopping server");
                Ok(())
            }
        }
    }

    async fn run_http(self, port: u16) -> Result<(), ServerError> {
        use rmcp::transport::streamable_http_server::{
            StreamableHttpService, session::local::LocalSessionManager,
        };

        let handler = self.handler.clone();
        let service = StreamableHttpService::new(
            move || Ok(handler.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        let router = axum::Router::new().nest_service("/mcp", service);

        let bind_addr = format!("0.0.0.0:{}", port);
        let tcp_listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ServerError::BindFailed {
                port,
                message: e.to_string(),
            })?;

        tracing::info!(port, "HTTP server listening");

        let shutdown = shutdown_future(self.shutdown_rx);
        axum::serve(tcp_listener, router)
            .with_graceful_shutdown(async move {
                if let Err(e) = shutdown.await {
                    tracing::error!(error = %e, "Shutdown signal handler failed");
                }
            })
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves when the explicit channel fires, or on SIGINT/SIGTERM if none was given.
async fn shutdown_future(shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<(), ServerError> {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
            Ok(())
        }
        None => wait_for_shutdown_signal().await,
    }
}

async fn wait_for_shutdown_signal() -> Result<(), ServerError> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
            _ = sigint.recv() => tracing::info!("Received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Received Ctrl+C");
    }

    Ok(())
}

/// Returns a sender to trigger shutdown programmatically and the receiver
/// to pass to [`McpServerBuilder::with_shutdown`].
pub fn shutdown_channel() -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
    oneshot::channel()
}
