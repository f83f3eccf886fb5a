//! Request rewriting and dispatch to the backend.
//!
//! # Responsibilities
//! - Point the inbound request at the backend URL (URI, scheme, Host header)
//! - Dispatch it on the shared client
//! - Hand the backend response to [`relay`](crate::http::response::relay)
//!
//! Method, headers and body pass through untouched. Nothing is retried.

use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Uri, Version};
use axum::response::Response;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::ClientConfig;
use crate::error::{Error, ProxyError};
use crate::http::response::relay;
use crate::routing::BackendUrl;

/// Outbound client shared by every in-flight request.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the shared outbound client.
pub fn build_client(config: &ClientConfig) -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_nodelay(config.nodelay);
    connector.set_connect_timeout(config.connect_timeout_secs.map(Duration::from_secs));

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build(connector)
}

/// Rewrite `request` so the client sends it to `backend`.
///
/// The URI becomes absolute (`http://backend/path?query`) and `Host` is set to
/// the backend authority.
pub fn rewrite_request(
    request: Request<Body>,
    backend: &BackendUrl,
) -> Result<Request<Body>, ProxyError> {
    let malformed = || ProxyError::container_url_malformed(&backend.to_string());

    let host = HeaderValue::from_str(backend.authority().as_str()).map_err(|_| malformed())?;

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(backend.authority().clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts).map_err(|_| malformed())?;

    parts.headers.insert(header::HOST, host);
    // The client speaks HTTP/1.1 to backends whatever the caller used.
    parts.version = Version::HTTP_11;

    Ok(Request::from_parts(parts, body))
}

/// Forward `request` to `backend` and relay the answer.
pub async fn forward(
    client: &HttpClient,
    request: Request<Body>,
    backend: &BackendUrl,
) -> Result<Response, Error> {
    let request = rewrite_request(request, backend)?;

    tracing::debug!(
        backend = %backend,
        uri = %request.uri(),
        "Forwarding request"
    );

    let backend_response: Response<Incoming> = client.request(request).await?;

    tracing::debug!(
        backend = %backend,
        backend_status = %backend_response.status(),
        "Backend responded"
    );

    Ok(relay(backend_response))
}
