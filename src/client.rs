//! Normalized request client.
//!
//! # Responsibilities
//! - Resolve request paths against the configured prefix
//! - Merge caller headers with token headers (token wins)
//! - Attach a request ID for correlation
//! - Fire `before_request`, send through the transport, classify the outcome
//!
//! # Design Decisions
//! - Configuration is closed over once at build time and shared via Arc
//! - No retries, no cancellation beyond the transport deadline
//! - Every failure reaches the caller as a normalized [`ApiResult`]

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use uuid::Uuid;

use crate::config::{load_config, validate_config, ClientConfig, ConfigError};
use crate::error::ClientError;
use crate::normalizer::{ApiResult, NormalizeConfig, ResultNormalizer};
use crate::observability::metrics;
use crate::token::{BearerTokenProvider, TokenProvider};
use crate::transport::{HttpTransport, RequestOptions, Transport};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Entry point: a configured callable producing normalized results.
pub struct RequestClient<T = HttpTransport> {
    config: Arc<ClientConfig>,
    normalizer: Arc<ResultNormalizer>,
    transport: Arc<T>,
    token_provider: Arc<dyn TokenProvider>,
}

impl<T> Clone for RequestClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            normalizer: self.normalizer.clone(),
            transport: self.transport.clone(),
            token_provider: self.token_provider.clone(),
        }
    }
}

impl RequestClient<HttpTransport> {
    /// Build a client over the default HTTP transport.
    pub fn new(config: ClientConfig, normalize: NormalizeConfig) -> Result<Self, ClientError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(transport, config, normalize)
    }

    /// Build a client from a TOML configuration file.
    pub fn from_file(path: &std::path::Path, normalize: NormalizeConfig) -> Result<Self, ClientError> {
        let config = load_config(path)?;
        Self::new(config, normalize)
    }
}

impl<T: Transport> RequestClient<T> {
    /// Build a client over any transport.
    ///
    /// The token provider defaults to [`BearerTokenProvider`] as described
    /// by `config.token`.
    pub fn with_transport(
        transport: T,
        config: ClientConfig,
        normalize: NormalizeConfig,
    ) -> Result<Self, ClientError> {
        let token_provider = BearerTokenProvider::from_config(&config.token)?;

        tracing::debug!(
            prefix = %config.prefix,
            timeout_ms = config.timeout_ms,
            cache = config.cache.limits().is_some(),
            "Request client configured"
        );

        Ok(Self {
            config: Arc::new(config),
            normalizer: Arc::new(ResultNormalizer::new(normalize)),
            transport: Arc::new(transport),
            token_provider: Arc::new(token_provider),
        })
    }

    /// Replace the token provider.
    pub fn with_token_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.token_provider = Arc::new(provider);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Prefix and path, concatenated verbatim.
    pub fn resolve_url(&self, path: &str) -> String {
        format!("{}{}", self.config.prefix, path)
    }

    /// Issue a request and normalize its outcome.
    ///
    /// Resolves with the normalized result on success; the error channel
    /// carries the normalized error result after `on_error` has seen it.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ApiResult, ApiResult> {
        let start = Instant::now();
        self.normalizer.config().hooks.before_request();

        let url = self.resolve_url(path);
        let options = self.prepare(options);
        let request_id = options
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %options.method,
            url = %url,
            "Sending request"
        );

        let raw = self.transport.send(&url, &options).await;
        let result = self.normalizer.classify(raw);

        metrics::record_request_duration(options.method.as_str(), start);
        tracing::debug!(
            request_id = %request_id,
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        );
        result
    }

    pub async fn get(&self, path: &str) -> Result<ApiResult, ApiResult> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResult, ApiResult> {
        self.request(path, RequestOptions::post(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResult, ApiResult> {
        self.request(path, RequestOptions::put(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResult, ApiResult> {
        self.request(path, RequestOptions::delete()).await
    }

    /// Merge token headers over the caller's and attach a request ID.
    fn prepare(&self, mut options: RequestOptions) -> RequestOptions {
        let token_headers = self.token_provider.headers();
        for name in token_headers.keys() {
            options.headers.remove(name);
        }
        for (name, value) in token_headers.iter() {
            options.headers.append(name.clone(), value.clone());
        }

        let request_id_header = HeaderName::from_static(X_REQUEST_ID);
        if self.config.observability.request_id && !options.headers.contains_key(&request_id_header) {
            if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                options.headers.insert(request_id_header, value);
            }
        }

        options
    }
}

impl<T> std::fmt::Debug for RequestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("prefix", &self.config.prefix)
            .field("timeout_ms", &self.config.timeout_ms)
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
