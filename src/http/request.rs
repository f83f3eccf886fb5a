//! Inbound request inspection.
//!
//! # Responsibilities
//! - Extract the host that routing is derived from
//! - Generate a request ID for log correlation
//!
//! # Design Decisions
//! - The `Host` header wins; absolute-form request URIs are the fallback
//! - The request ID lives only in the tracing span and is never added to the
//!   forwarded headers

use std::fmt;

use axum::http::{header, Request};
use uuid::Uuid;

/// Host value used for routing, or `""` when the request carries none.
pub fn request_host<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or("")
}

/// Per-request correlation ID (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_host_header() {
        let req = Request::builder()
            .uri("/path")
            .header("Host", "web-3000.example.com")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), "web-3000.example.com");
    }

    #[test]
    fn test_absolute_uri_fallback() {
        let req = Request::builder()
            .uri("http://api.example.com/path")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), "api.example.com");
    }

    #[test]
    fn test_no_host() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_host(&req), "");
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
