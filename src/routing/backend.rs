//! Backend URL construction.
//!
//! The outbound authority is the subdomain's name token as written. `url`
//! only validates the candidate URL; its normalised host (IPv4 shorthand,
//! lowercasing, punycode) is never sent.

use std::fmt;

use axum::http::uri::Authority;
use url::Url;

use crate::error::ProxyError;
use crate::routing::host::RouteIdentity;

/// Absolute `http` URL of the backend a request is forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrl {
    authority: Authority,
}

impl BackendUrl {
    pub const SCHEME: &'static str = "http";

    /// `name[:port]`, used as the outbound URI authority and `Host` header.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn host(&self) -> &str {
        self.authority.host()
    }

    pub fn port(&self) -> Option<u16> {
        self.authority.port_u16()
    }
}

impl fmt::Display for BackendUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", Self::SCHEME, self.authority)
    }
}

impl TryFrom<&RouteIdentity> for BackendUrl {
    type Error = ProxyError;

    fn try_from(route: &RouteIdentity) -> Result<Self, Self::Error> {
        build_backend_url(&route.name, route.port())
    }
}

/// Build `http://{name}[:{port}]`.
///
/// An empty port is treated like a missing one.
pub fn build_backend_url(name: &str, port: Option<&str>) -> Result<BackendUrl, ProxyError> {
    let raw_authority = match port {
        Some(port) if !port.is_empty() => format!("{name}:{port}"),
        _ => name.to_string(),
    };
    let raw_url = format!("{}://{raw_authority}", BackendUrl::SCHEME);
    let malformed = || ProxyError::container_url_malformed(&raw_url);

    let url = Url::parse(&raw_url).map_err(|_| malformed())?;
    if !url.has_host() {
        return Err(malformed());
    }

    let authority: Authority = raw_authority.parse().map_err(|_| malformed())?;

    Ok(BackendUrl { authority })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CONTAINER_RAW_URL_FIELD;
    use axum::http::StatusCode;

    #[test]
    fn test_without_port() {
        let backend = build_backend_url("app", None).unwrap();
        assert_eq!(backend.to_string(), "http://app");
        assert_eq!(backend.authority().as_str(), "app");
        assert_eq!(backend.host(), "app");
        assert_eq!(backend.port(), None);
    }

    #[test]
    fn test_empty_port_is_no_port() {
        let backend = build_backend_url("app", Some("")).unwrap();
        assert_eq!(backend.to_string(), "http://app");
    }

    #[test]
    fn test_with_port() {
        let backend = build_backend_url("app", Some("9090")).unwrap();
        assert_eq!(backend.to_string(), "http://app:9090");
        assert_eq!(backend.authority().as_str(), "app:9090");
        assert_eq!(backend.port(), Some(9090));
    }

    #[test]
    fn test_from_route_identity() {
        let route = RouteIdentity {
            name: "web".into(),
            port: Some("3000".into()),
        };
        let backend = BackendUrl::try_from(&route).unwrap();
        assert_eq!(backend.to_string(), "http://web:3000");
    }

    #[test]
    fn test_numeric_name_kept_verbatim() {
        let backend = build_backend_url("127", Some("3000")).unwrap();
        assert_eq!(backend.to_string(), "http://127:3000");
        assert_eq!(backend.host(), "127");

        let backend = build_backend_url("0x7f000001", Some("8080")).unwrap();
        assert_eq!(backend.authority().as_str(), "0x7f000001:8080");
    }

    #[test]
    fn test_mixed_case_name_kept_verbatim() {
        let backend = build_backend_url("WEB", Some("3000")).unwrap();
        assert_eq!(backend.to_string(), "http://WEB:3000");
        assert_eq!(backend.host(), "WEB");
    }

    #[test]
    fn test_malformed_name() {
        let err = build_backend_url("a%zz", Some("1234")).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.field(CONTAINER_RAW_URL_FIELD), Some("http://a%zz:1234"));
    }

    #[test]
    fn test_out_of_range_port() {
        let err = build_backend_url("app", Some("99999")).unwrap_err();
        assert_eq!(err.field(CONTAINER_RAW_URL_FIELD), Some("http://app:99999"));
    }
}
