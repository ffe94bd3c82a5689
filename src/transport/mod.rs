//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! RequestClient
//!     → Transport::send(url, options)
//!         → cache.rs (GET hit short-circuits the network)
//!         → http.rs (reqwest call bounded by a deadline)
//!     → RawOutcome (Success | Failure(kind))
//!     → normalizer
//! ```
//!
//! # Design Decisions
//! - The transport reports *what happened* with an explicit failure tag;
//!   it never interprets bodies
//! - Exactly one RawOutcome per send, never retried here
//! - Cache concurrency is the cache's own concern (concurrent map)

pub mod cache;
pub mod http;

use std::fmt;
use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;

pub use cache::ResponseCache;
pub use http::HttpTransport;

/// Options of a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).json(body)
    }

    pub fn put(body: Value) -> Self {
        Self::new(Method::PUT).json(body)
    }

    pub fn patch(body: Value) -> Self {
        Self::new(Method::PATCH).json(body)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Tag of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    NetworkFailure,
    CorsOrOpaque,
    HttpStatus,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::NetworkFailure => "network_failure",
            FailureKind::CorsOrOpaque => "cors_or_opaque",
            FailureKind::HttpStatus => "http_status",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed transport attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The attempt did not complete within the deadline.
    Timeout { message: Option<String> },
    /// The server could not be reached (offline, DNS, refused, reset).
    NetworkFailure { message: Option<String> },
    /// Any other failure below HTTP (invalid URL, redirect policy, unreadable body).
    CorsOrOpaque { message: Option<String> },
    /// The server answered with a non-2xx status.
    HttpStatus { status: u16, body: Value },
}

impl TransportFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportFailure::Timeout { .. } => FailureKind::Timeout,
            TransportFailure::NetworkFailure { .. } => FailureKind::NetworkFailure,
            TransportFailure::CorsOrOpaque { .. } => FailureKind::CorsOrOpaque,
            TransportFailure::HttpStatus { .. } => FailureKind::HttpStatus,
        }
    }

    /// Transport-provided detail, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            TransportFailure::Timeout { message }
            | TransportFailure::NetworkFailure { message }
            | TransportFailure::CorsOrOpaque { message } => message.as_deref(),
            TransportFailure::HttpStatus { .. } => None,
        }
    }
}

/// Outcome of one transport attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    Success { body: Value },
    Failure(TransportFailure),
}

impl RawOutcome {
    pub fn success(body: Value) -> Self {
        RawOutcome::Success { body }
    }

    pub fn http_status(status: u16, body: Value) -> Self {
        RawOutcome::Failure(TransportFailure::HttpStatus { status, body })
    }

    pub fn timeout() -> Self {
        RawOutcome::Failure(TransportFailure::Timeout { message: None })
    }

    pub fn network_failure() -> Self {
        RawOutcome::Failure(TransportFailure::NetworkFailure { message: None })
    }

    pub fn cors_or_opaque() -> Self {
        RawOutcome::Failure(TransportFailure::CorsOrOpaque { message: None })
    }
}

/// Sends a request and reports a tagged outcome.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = RawOutcome> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use serde_json::json;

    #[test]
    fn test_request_options_builders() {
        let opts = RequestOptions::post(json!({"a": 1}))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .query("page", "2");
        assert_eq!(opts.method, Method::POST);
        assert_eq!(opts.body, Some(json!({"a": 1})));
        assert_eq!(opts.query, vec![("page".to_string(), "2".to_string())]);
        assert!(opts.headers.contains_key(CONTENT_TYPE));
        assert_eq!(RequestOptions::default().method, Method::GET);
    }

    #[test]
    fn test_failure_kind_tags() {
        assert_eq!(RawOutcome::timeout(), RawOutcome::Failure(TransportFailure::Timeout { message: None }));
        let failure = TransportFailure::HttpStatus { status: 404, body: Value::Null };
        assert_eq!(failure.kind(), FailureKind::HttpStatus);
        assert_eq!(failure.kind().to_string(), "http_status");
        assert!(failure.message().is_none());

        let failure = TransportFailure::NetworkFailure { message: Some("refused".into()) };
        assert_eq!(failure.message(), Some("refused"));
    }
}
