//! Proxy error types and their wire formats.
//!
//! # Wire Formats
//! - Routing and URL construction failures: `application/json`, the error's
//!   own status, body `{"message": "...", "status": "<code>", ...fields}`
//! - Transport failures: `text/plain`, 500, body is the failure description
//!
//! Both are reported through [`Error`], which renders the right format in its
//! `IntoResponse` impl.

use std::collections::BTreeMap;
use std::fmt;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Field key carrying the reason of a not-found error.
pub const REASON_FIELD: &str = "reason";

/// Field key carrying the backend URL that failed to parse.
pub const CONTAINER_RAW_URL_FIELD: &str = "containerRawUrl";

const MESSAGE_KEY: &str = "message";
const STATUS_KEY: &str = "status";

/// Structured proxy error, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyError {
    message: String,
    status: StatusCode,
    fields: BTreeMap<String, String>,
}

impl ProxyError {
    /// Create an error with the given message and status and no extra fields.
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
            fields: BTreeMap::new(),
        }
    }

    /// 404 for requests whose host does not name a backend.
    pub fn not_found(reason: &str) -> Self {
        let mut err = Self::new("err: not found", StatusCode::NOT_FOUND);
        if !reason.is_empty() {
            err.add_field(REASON_FIELD, reason);
        }
        err
    }

    /// 500 for a backend URL that could not be constructed.
    pub fn container_url_malformed(raw_url: &str) -> Self {
        let mut err = Self::new(
            "err: container url is malformed",
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        if !raw_url.is_empty() {
            err.add_field(CONTAINER_RAW_URL_FIELD, raw_url);
        }
        err
    }

    /// Insert a field, overwriting any previous value under `key`.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field. Missing keys are ignored.
    pub fn remove_field(&mut self, key: &str) {
        self.fields.remove(key);
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Serialize to a JSON string.
    ///
    /// Returns an empty string if serialization fails; callers treat that as
    /// "no body available".
    pub fn serialize_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for ProxyError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let status = self.status.as_u16().to_string();

        // Extra fields win over the fixed keys, so merge before writing to
        // avoid emitting duplicate keys.
        let mut merged: BTreeMap<&str, &str> = BTreeMap::new();
        merged.insert(MESSAGE_KEY, &self.message);
        merged.insert(STATUS_KEY, &status);
        for (key, value) in &self.fields {
            merged.insert(key, value);
        }

        let mut map = serializer.serialize_map(Some(merged.len()))?;
        for (key, value) in merged {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize_json())
    }
}

impl std::error::Error for ProxyError {}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.serialize_json(),
        )
            .into_response()
    }
}

/// Any failure that ends a proxied request.
#[derive(Debug, Error)]
pub enum Error {
    /// Routing or URL construction failure, reported as JSON.
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// Outbound dispatch failed, reported as plain text.
    #[error("{}", describe(.0))]
    Transport(#[from] hyper_util::client::legacy::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Proxy(err) => err.status(),
            Error::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Proxy(err) => err.into_response(),
            Error::Transport(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                self.to_string(),
            )
                .into_response(),
        }
    }
}

/// Render an error followed by its source chain, `outer: inner: root`.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
