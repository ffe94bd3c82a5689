//! Configuration schema definitions.
//!
//! This module defines the declarative part of the client configuration.
//! All types derive Serde traits for deserialization from config files.
//! Behavioral options (normalizers, message lookups, hooks) are closures
//! and live in [`crate::normalizer::NormalizeConfig`] instead.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a normalized request client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Prepended verbatim to every request path (e.g., "http://localhost:3000/api").
    pub prefix: String,

    /// Deadline for a whole transport call in milliseconds.
    pub timeout_ms: u64,

    /// Response cache setting (`false`, `true`, or a table with limits).
    pub cache: CacheSetting,

    /// Token lookup settings for the default token provider.
    pub token: TokenConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            timeout_ms: 15_000,
            cache: CacheSetting::default(),
            token: TokenConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Transport deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Cache activation.
///
/// Accepts either a boolean or a table:
///
/// ```toml
/// cache = false
/// # or
/// [cache]
/// max = 100
/// ttl_ms = 30000
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CacheSetting {
    Toggle(bool),
    Limits(CacheLimits),
}

impl Default for CacheSetting {
    fn default() -> Self {
        CacheSetting::Toggle(false)
    }
}

impl CacheSetting {
    /// Effective limits, or `None` when caching is disabled.
    pub fn limits(&self) -> Option<CacheLimits> {
        match self {
            CacheSetting::Toggle(false) => None,
            CacheSetting::Toggle(true) => Some(CacheLimits::default()),
            CacheSetting::Limits(limits) => Some(limits.clone()),
        }
    }
}

/// Cache bounds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheLimits {
    /// Maximum number of live entries (0 = unbounded).
    pub max: usize,

    /// Time-to-live of an entry in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max: 0,
            ttl_ms: 60_000,
        }
    }
}

impl CacheLimits {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Default token provider settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TokenConfig {
    /// JSON file backing the token store. In-memory store when unset.
    pub store_path: Option<PathBuf>,

    /// Key the token is stored under.
    pub key: String,

    /// Header the token is written to.
    pub header: String,

    /// Scheme placed before the token value.
    pub scheme: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            key: "token".to_string(),
            header: "Authorization".to_string(),
            scheme: "Bearer".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Attach an `x-request-id` header to outgoing requests.
    pub request_id: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_id: true,
        }
    }
}
