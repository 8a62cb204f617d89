//! HTTP server for the dashboard.

mod tracing;

pub use self::tracing::{tracing_middleware, RequestTrace, REQUEST_ID_HEADER};

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;

use jobscope_core::config::JobscopeConfig;
use jobscope_core::error::Result;

use crate::client::ApiClient;
use crate::dashboard::{create_router, DashboardState};

/// Serves the dashboard until Ctrl-C, SIGTERM or a send on
/// [`DashboardServer::shutdown_handle`].
pub struct DashboardServer {
    config: JobscopeConfig,
    state: DashboardState,
    shutdown_tx: broadcast::Sender<()>,
}

impl DashboardServer {
    pub fn new(config: JobscopeConfig) -> Result<Self> {
        let client = ApiClient::new(&config.upstream)?;
        let state = DashboardState::new(client, config.dashboard.clone());
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            state,
            shutdown_tx,
        })
    }

    /// Build the Axum router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone()).layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(tracing_middleware))
                .layer(CompressionLayer::new()),
        )
    }

    /// `host:port` to bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// A handle that stops the server when sent to.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Bind the configured address and serve until shut down.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr()).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shut down.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        let router = self.router();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        ::tracing::info!(
            %addr,
            upstream = %self.state.client.api_root(),
            "Dashboard listening on http://{}",
            addr
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {
                        ::tracing::info!("Received shutdown signal");
                    }
                    _ = shutdown_rx.recv() => {
                        ::tracing::info!("Received shutdown notification");
                    }
                }
            })
            .await?;

        ::tracing::info!("Dashboard stopped");
        Ok(())
    }

}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                ::tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
