//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (host extraction, request ID)
//!     → routing (subdomain → backend URL)
//!     → forward.rs (rewrite request, dispatch on shared client)
//!     → response.rs (200 + streamed backend body)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{forward, rewrite_request, HttpClient};
pub use request::{request_host, RequestId};
pub use server::HttpServer;
