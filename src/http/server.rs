//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one route per gateway operation
//! - Wire up middleware (tracing, request ID)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Design Decisions
//! - Handlers share only the read-only upstream client; no locking needed
//! - No gateway-enforced timeout: an upstream call takes as long as the
//!   transport allows

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::request::RequestIdLayer;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and upstream
    /// client.
    pub fn new(config: GatewayConfig, upstream: UpstreamClient) -> Self {
        let state = AppState {
            upstream: Arc::new(upstream),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all routes and middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/gateway/get/stublist", get(handlers::stublist_handler))
            .route("/gateway/delete/stubs", get(handlers::delete_stubs_handler))
            .route("/gateway/put/stub", post(handlers::put_stub_handler))
            .route("/gateway/get/response", post(handlers::get_stub_response_handler))
            .route("/gateway/get/delay_policy", get(handlers::get_delay_policy_handler))
            .route("/gateway/put/delay_policy", get(handlers::put_delay_policy_handler))
            .route("/gateway/delete/delay_policy", get(handlers::delete_delay_policy_handler))
            .route("/gateway/begin/session", get(handlers::begin_session_handler))
            .route("/gateway/end/sessions", get(handlers::end_sessions_handler))
            .route("/gateway/get/scenarios", get(handlers::get_scenarios_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_uri(),
            "Gateway starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
