//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, cache ttl > 0)
//! - Check that an absolute prefix is a well-formed URL
//! - Check that the token header is a legal header name
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("cache.ttl_ms must be greater than zero")]
    ZeroCacheTtl,

    #[error("prefix '{prefix}' is not a valid URL: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("token.key must not be empty")]
    EmptyTokenKey,

    #[error("token.header '{0}' is not a valid header name")]
    InvalidTokenHeader(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.cache.limits().is_some_and(|limits| limits.ttl_ms == 0) {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    // Relative prefixes ("/api") are resolved by the transport, only absolute ones are checked.
    if config.prefix.starts_with("http://") || config.prefix.starts_with("https://") {
        if let Err(e) = Url::parse(&config.prefix) {
            errors.push(ValidationError::InvalidPrefix {
                prefix: config.prefix.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.token.key.is_empty() {
        errors.push(ValidationError::EmptyTokenKey);
    }

    if HeaderName::from_bytes(config.token.header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidTokenHeader(config.token.header.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{CacheLimits, CacheSetting};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.timeout_ms = 0;
        config.prefix = "http://[::1".to_string();
        config.token.key = String::new();
        config.token.header = "bad header".to_string();
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], ValidationError::ZeroTimeout);
        assert!(matches!(errors[1], ValidationError::InvalidPrefix { .. }));
        assert_eq!(errors[2], ValidationError::EmptyTokenKey);
    }

    #[test]
    fn test_zero_cache_ttl_rejected() {
        let mut config = ClientConfig::default();
        config.cache = CacheSetting::Limits(CacheLimits { max: 10, ttl_ms: 0 });
        assert_eq!(validate_config(&config).unwrap_err(), vec![ValidationError::ZeroCacheTtl]);

        // A disabled cache is not checked
        config.cache = CacheSetting::Toggle(false);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_relative_prefix_accepted() {
        let mut config = ClientConfig::default();
        config.prefix = "/v2".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
