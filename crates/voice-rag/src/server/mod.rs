//! HTTP server for the voice RAG system

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::Result;
use state::AppState;

/// Voice RAG HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server around prepared state
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Create a server from configuration, loading the corpus and clients
    pub fn from_config(config: RagConfig) -> Result<Self> {
        Ok(Self::new(AppState::from_config(config)?))
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server
    ///
    /// Readiness is raised once the listener is bound and lowered as soon as
    /// a shutdown signal arrives, before in-flight requests drain.
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| crate::error::Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting voice RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::Error::Config(format!("Failed to bind: {}", e)))?;

        self.state.set_ready(true);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(self.state.clone()))
            .await
            .map_err(|e| crate::error::Error::Internal(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the full router for `state`
pub fn build_router(state: AppState) -> Router {
    let server_config = state.config().server.clone();

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .merge(routes::conversation_routes(server_config.max_upload_size))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if server_config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Resolve on Ctrl-C, marking the server not ready
async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    state.set_ready(false);
    tracing::info!("Shutdown requested, draining in-flight requests");
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}
