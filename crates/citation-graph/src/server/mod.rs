//! Diagram server.
//!
//! Answers the diagram client's actions over a WebSocket (HTTP mode) or
//! line-delimited stdin/stdout (stdio mode).

pub mod handlers;
pub mod stdio;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::dataset;
use crate::engine::GraphGenerator;

pub use handlers::{ActionContext, ActionDispatcher, ActionHandler};

/// Citation graph diagram server.
pub struct DiagramServer {
    dispatcher: Arc<ActionDispatcher>,
    config: Config,
}

impl DiagramServer {
    /// Create a server around an existing generator.
    #[must_use]
    pub fn new(generator: Arc<GraphGenerator>, config: Config) -> Self {
        let ctx = ActionContext::new(generator, &config);
        Self { dispatcher: Arc::new(ActionDispatcher::new(ctx)), config }
    }

    /// Load the configured dataset and create a server for it.
    ///
    /// # Errors
    ///
    /// Returns error if the dataset cannot be loaded.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let tree = dataset::load_tree(&config.dataset_path)?;
        let generator = Arc::new(GraphGenerator::new(tree, &config));
        Ok(Self::new(generator, config))
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!("Starting diagram server in stdio mode");
        tracing::info!("Handling actions: {:?}", self.dispatcher.kinds());

        stdio::run_stdio(&self.dispatcher).await
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let port = self.config.port;
        tracing::info!("Starting diagram server in HTTP mode on port {}", port);
        tracing::info!("Handling actions: {:?}", self.dispatcher.kinds());

        let router = transport::create_router(self.dispatcher, &self.config);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }

    /// Action dispatcher shared by all transports.
    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<ActionDispatcher> {
        &self.dispatcher
    }
}

impl std::fmt::Debug for DiagramServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramServer")
            .field("dispatcher", &self.dispatcher)
            .field("port", &self.config.port)
            .finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for CTRL+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
