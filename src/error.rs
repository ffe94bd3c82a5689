//! Setup-time errors.
//!
//! Request failures never surface here: they are normalized into an
//! [`ApiResult`](crate::normalizer::ApiResult) on the error channel.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token store could not be read or written.
    #[error("Token store error: {0}")]
    TokenStore(String),
}

/// Result type for client setup operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;

    #[test]
    fn test_error_display() {
        let err = ClientError::from(ConfigError::Validation(vec![ValidationError::ZeroTimeout]));
        assert_eq!(
            err.to_string(),
            "Configuration error: Validation failed: timeout_ms must be greater than zero"
        );

        let err = ClientError::TokenStore("permission denied".to_string());
        assert!(err.to_string().contains("permission denied"));
    }
}
