//! Response caching for successful GET requests.
//!
//! Entries expire lazily: an expired entry is dropped when it is looked up,
//! or when the cache is full and a new entry arrives. There is no eviction
//! policy beyond TTL; a full cache simply stops storing new entries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use url::form_urlencoded;

use crate::config::CacheLimits;
use crate::observability::metrics;
use crate::transport::RequestOptions;

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Value,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// A thread-safe cache of response bodies keyed by request.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    max: usize,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new empty cache with the given limits.
    pub fn new(limits: &CacheLimits) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            max: limits.max,
            ttl: limits.ttl(),
        }
    }

    /// Cache key of a request: method, URL, query and body.
    pub fn key(url: &str, options: &RequestOptions) -> String {
        let mut key = format!("{} {}", options.method, url);
        if !options.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&options.query)
                .finish();
            key.push('?');
            key.push_str(&query);
        }
        if let Some(body) = &options.body {
            key.push(' ');
            key.push_str(&body.to_string());
        }
        key
    }

    /// Get a live entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        let ttl = self.ttl;
        // Drop an expired entry before reading so the read guard is never held across a removal.
        self.inner.remove_if(key, |_, entry| entry.is_expired(ttl));

        let hit = self.inner.get(key).map(|entry| entry.body.clone());
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    /// Store a body. Returns false when the cache is full.
    pub fn insert(&self, key: String, body: Value) -> bool {
        if self.max > 0 && self.inner.len() >= self.max && !self.inner.contains_key(&key) {
            self.purge_expired();
            if self.inner.len() >= self.max {
                tracing::debug!(max = self.max, "Response cache full, not storing entry");
                return false;
            }
        }

        self.inner.insert(
            key,
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
        true
    }

    /// Remove every expired entry.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.inner.retain(|_, entry| !entry.is_expired(ttl));
        metrics::record_cache_size(self.inner.len());
    }

    /// Count stored entries (expired ones included until purged).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear();
        metrics::record_cache_size(0);
    }
}
