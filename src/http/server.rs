//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing)
//! - Bind server to listener with graceful shutdown
//! - Route each request by its subdomain and forward it

use std::future::Future;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::error::Error;
use crate::http::forward::{build_client, forward, HttpClient};
use crate::http::request::{request_host, RequestId};
use crate::observability::metrics;
use crate::routing::{parse_host, BackendUrl};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: HttpClient,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with its own outbound client.
    pub fn new(config: &ProxyConfig) -> Self {
        Self::with_client(build_client(&config.client))
    }

    /// Create a server around an existing outbound client.
    pub fn with_client(client: HttpClient) -> Self {
        let router = Self::build_router(AppState { client });
        Self { router }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Derives the backend from the Host header and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = RequestId::new();
    let span = tracing::info_span!(
        "proxy",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    handle(state, request).instrument(span).await
}

async fn handle(state: AppState, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let host = request_host(&request).to_string();

    let backend = match parse_host(&host).and_then(|route| BackendUrl::try_from(&route)) {
        Ok(backend) => backend,
        Err(err) => {
            tracing::warn!(host = %host, status = %err.status(), error = %err, "Request not routable");
            metrics::record_request(&method, err.status().as_u16(), metrics::NO_BACKEND, start_time);
            return err.into_response();
        }
    };

    match forward(&state.client, request, &backend).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), backend.authority().as_str(), start_time);
            response
        }
        Err(err) => {
            match &err {
                Error::Transport(_) => {
                    tracing::error!(backend = %backend, error = %err, "Upstream error")
                }
                Error::Proxy(_) => {
                    tracing::warn!(backend = %backend, error = %err, "Request rewrite failed")
                }
            }
            metrics::record_request(&method, err.status().as_u16(), backend.authority().as_str(), start_time);
            err.into_response()
        }
    }
}
