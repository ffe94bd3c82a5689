//! Token injection.
//!
//! # Data Flow
//! ```text
//! RequestClient (before every send)
//!     → TokenProvider::headers()
//!         → BearerTokenProvider → TokenStore::get("token")
//!     → headers merged over the caller's headers
//! ```
//!
//! # Design Decisions
//! - The provider is injected; nothing reads ambient storage directly
//! - A missing token still yields `Bearer null`, matching the historical
//!   default; production callers are expected to supply their own provider

pub mod store;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{ConfigError, TokenConfig, ValidationError};
use crate::error::ClientError;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Supplies headers to attach to every request.
pub trait TokenProvider: Send + Sync {
    fn headers(&self) -> HeaderMap;
}

impl<F> TokenProvider for F
where
    F: Fn() -> HeaderMap + Send + Sync,
{
    fn headers(&self) -> HeaderMap {
        self()
    }
}

/// Reads a token from a [`TokenStore`] and emits `<header>: <scheme> <token>`.
pub struct BearerTokenProvider {
    store: Arc<dyn TokenStore>,
    key: String,
    header: HeaderName,
    scheme: String,
}

impl BearerTokenProvider {
    /// Provider with the default key (`token`), header and scheme.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            key: "token".to_string(),
            header: reqwest::header::AUTHORIZATION,
            scheme: "Bearer".to_string(),
        }
    }

    /// Provider as described by configuration.
    pub fn from_config(config: &TokenConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn TokenStore> = match &config.store_path {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(store, config)
    }

    /// Provider over `store`, using the configured key, header and scheme.
    pub fn with_store(store: Arc<dyn TokenStore>, config: &TokenConfig) -> Result<Self, ClientError> {
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidTokenHeader(config.header.clone())])
        })?;

        Ok(Self {
            store,
            key: config.key.clone(),
            header,
            scheme: config.scheme.clone(),
        })
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }
}

impl TokenProvider for BearerTokenProvider {
    fn headers(&self) -> HeaderMap {
        let token = self.store.get(&self.key);
        let value = format!("{} {}", self.scheme, token.as_deref().unwrap_or("null"));

        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&value) {
            Ok(v) => {
                headers.insert(self.header.clone(), v);
            }
            Err(e) => {
                tracing::warn!(header = %self.header, error = %e, "Token is not a valid header value, omitting it");
            }
        }
        headers
    }
}

impl std::fmt::Debug for BearerTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenProvider")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("scheme", &self.scheme)
            .finish()
    }
}
