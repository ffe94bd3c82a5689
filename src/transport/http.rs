//! HTTP transport over reqwest.
//!
//! # Responsibilities
//! - Issue the request with the merged headers, query and JSON body
//! - Bound the whole call (send + body read) with a deadline
//! - Tag every failure with an explicit [`FailureKind`](crate::transport::FailureKind)
//! - Serve and fill the GET response cache when enabled

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;
use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{RawOutcome, RequestOptions, ResponseCache, Transport, TransportFailure};

/// Default transport: reqwest client, deadline and optional cache.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_duration: Duration,
    cache: Option<ResponseCache>,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        let cache = config.cache.limits().map(|limits| ResponseCache::new(&limits));
        Self {
            client,
            timeout_duration: config.timeout(),
            cache,
        }
    }

    /// The response cache, when enabled.
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    fn cache_key(&self, url: &str, options: &RequestOptions) -> Option<String> {
        if self.cache.is_some() && options.method == Method::GET {
            Some(ResponseCache::key(url, options))
        } else {
            None
        }
    }

    async fn execute(&self, url: &str, options: &RequestOptions) -> Result<(u16, String), reqwest::Error> {
        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .headers(options.headers.clone());
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> RawOutcome {
        let cache_key = self.cache_key(url, options);
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(body) = cache.get(key) {
                tracing::debug!(url = %url, "Serving response from cache");
                return RawOutcome::Success { body };
            }
        }

        let outcome = match timeout(self.timeout_duration, self.execute(url, options)).await {
            Ok(Ok((status, text))) => {
                let body = parse_body(&text);
                if (200..300).contains(&status) {
                    RawOutcome::Success { body }
                } else {
                    RawOutcome::Failure(TransportFailure::HttpStatus { status, body })
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Transport error");
                RawOutcome::Failure(classify_reqwest_error(&e))
            }
            Err(_) => {
                tracing::warn!(url = %url, timeout_ms = self.timeout_duration.as_millis() as u64, "Transport timeout");
                RawOutcome::Failure(TransportFailure::Timeout {
                    message: Some(format!("timeout of {}ms exceeded", self.timeout_duration.as_millis())),
                })
            }
        };

        if let (Some(cache), Some(key), RawOutcome::Success { body }) = (&self.cache, cache_key, &outcome) {
            cache.insert(key, body.clone());
        }

        outcome
    }
}

/// Parse a response body: JSON when possible, a JSON string otherwise, `null` when empty.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Map a reqwest error onto a failure tag.
pub fn classify_reqwest_error(e: &reqwest::Error) -> TransportFailure {
    let message = Some(e.to_string());
    if e.is_timeout() {
        TransportFailure::Timeout { message }
    } else if e.is_connect() || e.is_request() {
        TransportFailure::NetworkFailure { message }
    } else {
        TransportFailure::CorsOrOpaque { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSetting;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(r#"{"code":200}"#), json!({"code": 200}));
        assert_eq!(parse_body("plain text"), json!("plain text"));
        assert_eq!(parse_body("  "), Value::Null);
    }

    #[test]
    fn test_cache_only_when_enabled() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert!(transport.cache().is_none());

        let config = ClientConfig {
            cache: CacheSetting::Toggle(true),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert!(transport.cache().is_some());
        assert!(transport.cache_key("http://h/a", &RequestOptions::get()).is_some());
        assert!(transport
            .cache_key("http://h/a", &RequestOptions::post(json!({})))
            .is_none());
    }

    #[tokio::test]
    async fn test_relative_url_is_opaque_failure() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let outcome = transport.send("/api/users", &RequestOptions::get()).await;
        match outcome {
            RawOutcome::Failure(failure) => {
                assert_eq!(failure.kind(), crate::transport::FailureKind::CorsOrOpaque)
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
