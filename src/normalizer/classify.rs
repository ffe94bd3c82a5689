//! Outcome classification and error normalization.
//!
//! # Decision Tree
//! ```text
//! RawOutcome::Success{body}
//!     → normalize(body)
//!     → after_response()
//!     → code outside success band or error field set?
//!         no  → Ok(candidate)                         [Success]
//!         yes → errorMsg = biz(errorCode) || errorMsg [BizError]
//!
//! RawOutcome::Failure(f)
//!     → after_response()
//!     → Timeout        → {502, timeout message}
//!     → NetworkFailure → {1000, unreachable message}
//!     → CorsOrOpaque   → {1000, cross-origin message}
//!     → HttpStatus     → normalize_http_error(resp)
//!                        errorMsg = status(code) || biz(errorCode) || errorMsg
//!                        code = raw status, data dropped
//!
//! every failure → on_error(result) → Err(result)
//! ```

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::normalizer::config::{default_normalize, HttpErrorResponse, NormalizeConfig};
use crate::normalizer::result::ApiResult;
use crate::observability::metrics;
use crate::transport::{RawOutcome, TransportFailure};

/// Final category of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Success,
    BizError,
    HttpStatus,
    Timeout,
    NetworkFailure,
    CorsOrOpaque,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Success => "success",
            Classification::BizError => "biz_error",
            Classification::HttpStatus => "http_status",
            Classification::Timeout => "timeout",
            Classification::NetworkFailure => "network_failure",
            Classification::CorsOrOpaque => "cors_or_opaque",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns raw transport outcomes into uniform results.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent calls and the same outcome always yields an equal result.
#[derive(Debug, Clone, Default)]
pub struct ResultNormalizer {
    config: NormalizeConfig,
}

impl ResultNormalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Apply the configured (or default) body normalizer.
    pub fn normalize_body(&self, body: Value, status: Option<u16>) -> ApiResult {
        match &self.config.normalize {
            Some(normalize) => normalize(body, status),
            None => default_normalize(body, status),
        }
    }

    /// Classify one outcome.
    ///
    /// Fires `after_response` exactly once, then `on_error` exactly once if
    /// the call failed. The error channel carries the fully normalized result.
    pub fn classify(&self, raw: RawOutcome) -> Result<ApiResult, ApiResult> {
        let (classification, result) = self.decide(raw);
        metrics::record_outcome(classification.as_str());

        if classification == Classification::Success {
            tracing::debug!(code = ?result.code, "Request succeeded");
            return Ok(result);
        }

        tracing::warn!(
            kind = %classification,
            code = ?result.code,
            error_code = ?result.error_code,
            error_msg = ?result.error_msg,
            "Request failed"
        );
        self.config.hooks.on_error(&result);
        Err(result)
    }

    fn decide(&self, raw: RawOutcome) -> (Classification, ApiResult) {
        match raw {
            RawOutcome::Success { body } => {
                let candidate = self.normalize_body(body, None);
                self.config.hooks.after_response();

                if candidate.has_failing_code() || candidate.has_error_fields() {
                    (Classification::BizError, self.biz_error(candidate))
                } else {
                    (Classification::Success, candidate)
                }
            }
            RawOutcome::Failure(failure) => {
                self.config.hooks.after_response();
                self.transport_error(failure)
            }
        }
    }

    fn biz_error(&self, candidate: ApiResult) -> ApiResult {
        let error_msg = self
            .msg_by_biz_code(candidate.error_code.as_deref())
            .or_else(|| candidate.error_msg.clone());
        ApiResult {
            error_msg,
            ..candidate
        }
    }

    fn transport_error(&self, failure: TransportFailure) -> (Classification, ApiResult) {
        let messages = &self.config.messages;
        match failure {
            TransportFailure::Timeout { message } => {
                tracing::debug!(detail = ?message, "Classified as timeout");
                (
                    Classification::Timeout,
                    ApiResult::error(messages.timeout_code, messages.timeout.clone()),
                )
            }
            TransportFailure::NetworkFailure { message } => {
                tracing::debug!(detail = ?message, "Classified as network failure");
                (
                    Classification::NetworkFailure,
                    ApiResult::error(messages.network_code, messages.network_unreachable.clone()),
                )
            }
            TransportFailure::CorsOrOpaque { message } => {
                tracing::debug!(detail = ?message, "Classified as cross-origin or opaque failure");
                (
                    Classification::CorsOrOpaque,
                    ApiResult::error(messages.network_code, messages.cors_or_opaque.clone()),
                )
            }
            TransportFailure::HttpStatus { status, body } => {
                (Classification::HttpStatus, self.http_status_error(status, body))
            }
        }
    }

    fn http_status_error(&self, status: u16, body: Value) -> ApiResult {
        let normalized = match &self.config.normalize_http_error {
            Some(normalize_http_error) => normalize_http_error(&HttpErrorResponse { status, body }),
            None => self.normalize_body(body, Some(status)),
        };

        let lookup_code = normalized.code.unwrap_or(i64::from(status));
        let error_msg = self
            .msg_by_http_status(lookup_code)
            .or_else(|| {
                if self.config.biz_lookup_on_http_error {
                    self.msg_by_biz_code(normalized.error_code.as_deref())
                } else {
                    None
                }
            })
            .or_else(|| normalized.error_msg.clone())
            .or_else(|| reason_phrase(status));

        // An error result never carries data alongside its message
        let data = if error_msg.is_some() { None } else { normalized.data };
        ApiResult {
            code: Some(i64::from(status)),
            data,
            error_msg,
            error_code: normalized.error_code,
        }
    }

    fn msg_by_http_status(&self, code: i64) -> Option<String> {
        self.config
            .get_msg_by_http_status
            .as_ref()
            .and_then(|lookup| non_empty(lookup(code)))
    }

    fn msg_by_biz_code(&self, error_code: Option<&str>) -> Option<String> {
        self.config
            .get_msg_by_biz_code
            .as_ref()
            .and_then(|lookup| non_empty(lookup(error_code)))
    }
}

/// An empty lookup result means "no override".
fn non_empty(msg: Option<String>) -> Option<String> {
    msg.filter(|m| !m.is_empty())
}

fn reason_phrase(status: u16) -> Option<String> {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
}
