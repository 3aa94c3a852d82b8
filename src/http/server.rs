//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Classify each request and forward it to the target or the origin
//! - Strip configured headers from proxied responses

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::request::{assign_request_id, normalize_uri, RequestIdExt};
use crate::http::response::{ForwardError, HeaderStripper};
use crate::routing::{RouteDecision, RouteTable};

/// Error type for server construction.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid response header name: {0}")]
    HeaderName(#[from] axum::http::header::InvalidHeaderName),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub stripper: Arc<HeaderStripper>,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ServerError> {
        Ok(Self {
            routes: Arc::new(RouteTable::new(config.proxy.routes.iter().cloned())),
            stripper: Arc::new(HeaderStripper::new(&config.proxy.strip_response_headers)?),
            forwarder: Forwarder::new(config)?,
        })
    }
}

/// HTTP server for the edge router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;

        if state.routes.is_empty() {
            tracing::warn!("No routes configured; every request passes through to the origin");
        }
        tracing::info!(
            target_host = %state.forwarder.target(),
            scheme = %config.proxy.scheme,
            routes = ?state.routes.prefixes().collect::<Vec<_>>(),
            strip_response_headers = ?state.stripper.names(),
            origin = %state.forwarder.origin(),
            "Routing table compiled"
        );

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(route_handler))
            .route("/", any(route_handler))
            .with_state(state)
            .layer(middleware::from_fn(assign_request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the handler without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Normalize, classify, forward, sanitize.
async fn route_handler(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let request_id = request
        .request_id()
        .map(ToString::to_string)
        .unwrap_or_default();
    let method = request.method().clone();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        url = %request.uri(),
        "Incoming request"
    );

    // Route on the same path the outbound call will carry.
    match normalize_uri(request.uri()) {
        Some(uri) => *request.uri_mut() = uri,
        None => {
            tracing::warn!(request_id = %request_id, url = %request.uri(), "Unparseable request path");
            return (StatusCode::BAD_REQUEST, "Invalid request path").into_response();
        }
    }
    let path = request.uri().path().to_string();

    let decision = state.routes.classify(&path);
    let result = match decision {
        RouteDecision::Proxy => state
            .forwarder
            .proxy(request)
            .await
            .map(|response| state.stripper.apply(response)),
        RouteDecision::Passthrough => state.forwarder.passthrough(request).await,
    };

    match result {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                decision = ?decision,
                status = %response.status(),
                "Upstream responded"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                decision = ?decision,
                path = %path,
                error = %e,
                "Upstream error"
            );
            e.into_response()
        }
    }
}
