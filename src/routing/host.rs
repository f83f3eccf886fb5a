//! Host header parsing.
//!
//! The first dot-delimited label of the host names the backend. It may carry
//! a 4-digit port after a single `-`: `web-3000.example.com` routes to `web`
//! on port 3000, `web.example.com` routes to `web` on the default port.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ProxyError;

/// `<name>` or `<name>-<4 digits>`; `-` appears at most once.
static SUBDOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^-]+)(-[0-9]{4})?$").expect("subdomain pattern is a valid regex")
});

pub const NO_SUBDOMAIN_REASON: &str = "proxy: url without subdomain is not allowed";
pub const INVALID_SUBDOMAIN_REASON: &str = "proxy: invalid subdomain format";

/// Backend identity extracted from a subdomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIdentity {
    /// Backend host name. Non-empty, never contains `-`.
    pub name: String,
    /// Exactly four ASCII digits when present.
    pub port: Option<String>,
}

impl RouteIdentity {
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }
}

/// Parse a raw host value into the backend it routes to.
pub fn parse_host(host: &str) -> Result<RouteIdentity, ProxyError> {
    let mut labels = host.split('.');
    let subdomain = match (labels.next(), labels.next()) {
        (Some(first), Some(_)) => first,
        _ => return Err(ProxyError::not_found(NO_SUBDOMAIN_REASON)),
    };

    let captures = SUBDOMAIN_PATTERN
        .captures(subdomain)
        .ok_or_else(|| ProxyError::not_found(INVALID_SUBDOMAIN_REASON))?;

    let name = captures[1].to_string();
    let port = captures
        .get(2)
        .map(|m| m.as_str().trim_start_matches('-').to_string());

    Ok(RouteIdentity { name, port })
}
