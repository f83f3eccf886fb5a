//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Host header ("web-3000.example.com")
//!     → host.rs (subdomain → RouteIdentity { name: "web", port: Some("3000") })
//!     → backend.rs (RouteIdentity → BackendUrl "http://web:3000")
//!     → http::forward (rewrite + dispatch)
//! ```
//!
//! # Design Decisions
//! - Routes are derived from the request alone; there is no route table
//! - Pure functions, nothing cached between requests
//! - Every failure maps to a structured [`ProxyError`](crate::error::ProxyError)

pub mod backend;
pub mod host;

pub use backend::{build_backend_url, BackendUrl};
pub use host::{parse_host, RouteIdentity};
