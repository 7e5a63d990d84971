//! Demo HTTP server speaking Clacks Overhead.
//!
//! # Responsibilities
//! - Create Axum Router with the echo and relay handlers
//! - Wire up middleware (clacks, timeout, tracing)
//! - Share one relay between the middleware's send-on and provider slots
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ServerConfig, ValidationError};
use crate::http::middleware::ClacksLayer;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::TracingLogger;
use crate::side_channel::Relay;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Option<Arc<Relay>>,
}

/// HTTP server for the clacks demo.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    relay: Option<Arc<Relay>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, Vec<ValidationError>> {
        let mut clacks = ClacksLayer::from_config(&config.clacks)?
            .with_logger(Arc::new(TracingLogger));

        let relay = if config.clacks.relay.enabled {
            let relay = Arc::new(Relay::from_config(
                &config.clacks.messages,
                &config.clacks.relay,
            ));
            clacks = clacks
                .with_provider(relay.clone())
                .with_send_on(relay.clone());
            Some(relay)
        } else {
            None
        };

        let state = AppState {
            relay: relay.clone(),
        };
        let router = Self::build_router(&config, state, clacks);

        Ok(Self {
            router,
            config,
            relay,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState, clacks: ClacksLayer) -> Router {
        Router::new()
            .route("/relay", get(relay_handler))
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .with_state(state)
            .layer(clacks)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            relay = self.relay.is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The relay fed by `G` messages, when enabled.
    pub fn relay(&self) -> Option<&Arc<Relay>> {
        self.relay.as_ref()
    }
}

/// Answers every request with its method and path.
async fn echo_handler(method: Method, uri: Uri) -> impl IntoResponse {
    format!("{} {}\n", method, uri.path())
}

/// Lists the messages currently held by the relay.
async fn relay_handler(State(state): State<AppState>) -> impl IntoResponse {
    let messages = state
        .relay
        .as_ref()
        .map(|relay| relay.snapshot())
        .unwrap_or_default();
    Json(messages)
}
