//! Subdomain-routed reverse proxy library.
//!
//! A request for `web-3000.example.com` is forwarded to `http://web:3000`,
//! one for `web.example.com` to `http://web`. See [`routing`] for the host
//! format and [`http::forward`] for how requests are rewritten.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use error::{Error, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
