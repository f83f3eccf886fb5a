//! Response relay back to the caller.
//!
//! # Design Decisions
//! - The caller always sees 200 once the backend answered, whatever the
//!   backend's own status was
//! - Backend headers are not copied
//! - The backend body is streamed through unbuffered; a broken stream aborts
//!   the caller's response and is not reported separately

use axum::body::{Body, Bytes, HttpBody};
use axum::http::StatusCode;
use axum::response::Response;
use axum::BoxError;

/// Build the caller's response from a backend response.
pub fn relay<B>(backend_response: Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let body = Body::new(backend_response.into_body());
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_and_headers_dropped() {
        let backend_response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("x-backend", "web")
            .body(Body::from("missing page"))
            .unwrap();

        let response = relay(backend_response);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-backend").is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"missing page");
    }
}
