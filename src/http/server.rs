//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (CORS, request ID, limits, timeout, tracing)
//! - Bind the server to a listener and stop on the shutdown signal
//! - Hand every request path and body to the dispatcher
//!
//! # Design Decisions
//! - The legacy client picks the endpoint by path only, so every HTTP
//!   method reaches the same handler
//! - Preflight is answered in middleware, before dispatch

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderName, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::cors::{cors_middleware, CorsState};
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{Dispatcher, Outcome, Registry};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP front end for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `dispatcher`.
    pub fn new(config: &GatewayConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
        };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let request_id_header = HeaderName::from_static(X_REQUEST_ID);
        let cors = CorsState::from_config(&config.cors);

        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            // Outside limit and timeout so their rejections carry CORS headers too
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
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
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: the request path names the endpoint.
async fn gateway_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let method = uri.path();

    tracing::debug!(
        request_id = %request_id(&headers),
        method = %method,
        bytes = body.len(),
        "Dispatching request"
    );

    match state.dispatcher.dispatch(method, &body) {
        Ok(response) => {
            if response.outcome != Outcome::Success {
                metrics::record_protocol_error(&response.endpoint, response.outcome);
            }
            metrics::record_request(&response.endpoint, 200, response.outcome.as_str(), start_time);
            response.into_response()
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!(
                    request_id = %request_id(&headers),
                    method = %method,
                    error = %err,
                    "Request failed"
                );
            } else {
                tracing::info!(method = %method, error = %err, "Request rejected");
            }
            let endpoint = endpoint_label(state.dispatcher.registry(), method);
            metrics::record_request(endpoint, status.as_u16(), "error", start_time);
            err.into_response()
        }
    }
}

/// Metrics label for a failed request: the matched pattern, else `none`.
fn endpoint_label<'a>(registry: &'a Registry, method: &str) -> &'a str {
    registry
        .select(method)
        .map(|endpoint| endpoint.path.as_str())
        .unwrap_or("none")
}
