//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured log events, per-request span with request ID)
//!     → metrics.rs (request counter and latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID lives in the span, not in forwarded headers
//! - Metrics calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
