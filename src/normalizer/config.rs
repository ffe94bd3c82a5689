//! Behavioral configuration of the normalizer.
//!
//! Every option is optional. An absent option has the documented default;
//! nothing is inspected at runtime to decide what a caller "meant".

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::normalizer::result::ApiResult;

/// Maps an arbitrary backend body (and the HTTP status when known) to an [`ApiResult`].
pub type NormalizeFn = Arc<dyn Fn(Value, Option<u16>) -> ApiResult + Send + Sync>;

/// Maps a non-2xx response to an [`ApiResult`].
pub type NormalizeHttpErrorFn = Arc<dyn Fn(&HttpErrorResponse) -> ApiResult + Send + Sync>;

/// Message lookup by HTTP-class code.
pub type StatusMessageFn = Arc<dyn Fn(i64) -> Option<String> + Send + Sync>;

/// Message lookup by business error code (`None` when the result has none).
pub type BizMessageFn = Arc<dyn Fn(Option<&str>) -> Option<String> + Send + Sync>;

pub type LifecycleHook = Arc<dyn Fn() + Send + Sync>;

pub type ErrorHook = Arc<dyn Fn(&ApiResult) + Send + Sync>;

/// A non-2xx response as seen by `normalize_http_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpErrorResponse {
    pub status: u16,
    pub body: Value,
}

/// Codes and texts of the fixed transport-failure results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessages {
    pub timeout_code: i64,
    pub timeout: String,
    pub network_code: i64,
    pub network_unreachable: String,
    pub cors_or_opaque: String,
}

impl Default for FailureMessages {
    fn default() -> Self {
        Self {
            timeout_code: 502,
            timeout: "request timed out, please retry later".to_string(),
            network_code: 1000,
            network_unreachable: "network unreachable, check connection".to_string(),
            cors_or_opaque: "network issue, possibly cross-origin".to_string(),
        }
    }
}

/// Lifecycle hooks. They observe a call, they never change its outcome.
#[derive(Clone, Default)]
pub struct Hooks {
    pub before_request: Option<LifecycleHook>,
    pub after_response: Option<LifecycleHook>,
    pub on_error: Option<ErrorHook>,
}

impl Hooks {
    pub(crate) fn before_request(&self) {
        if let Some(hook) = &self.before_request {
            hook();
        }
    }

    pub(crate) fn after_response(&self) {
        if let Some(hook) = &self.after_response {
            hook();
        }
    }

    pub(crate) fn on_error(&self, result: &ApiResult) {
        if let Some(hook) = &self.on_error {
            hook(result);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_request", &self.before_request.is_some())
            .field("after_response", &self.after_response.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Options consumed by [`crate::normalizer::ResultNormalizer`].
#[derive(Clone)]
pub struct NormalizeConfig {
    /// Defaults to [`default_normalize`].
    pub normalize: Option<NormalizeFn>,
    /// Defaults to `normalize(body, Some(status))`.
    pub normalize_http_error: Option<NormalizeHttpErrorFn>,
    /// Defaults to no override.
    pub get_msg_by_http_status: Option<StatusMessageFn>,
    /// Defaults to no override.
    pub get_msg_by_biz_code: Option<BizMessageFn>,
    /// Consult `get_msg_by_biz_code` for HTTP-status errors too.
    pub biz_lookup_on_http_error: bool,
    pub messages: FailureMessages,
    pub hooks: Hooks,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            normalize: None,
            normalize_http_error: None,
            get_msg_by_http_status: None,
            get_msg_by_biz_code: None,
            biz_lookup_on_http_error: true,
            messages: FailureMessages::default(),
            hooks: Hooks::default(),
        }
    }
}

impl NormalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalize<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, Option<u16>) -> ApiResult + Send + Sync + 'static,
    {
        self.normalize = Some(Arc::new(f));
        self
    }

    pub fn with_normalize_http_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&HttpErrorResponse) -> ApiResult + Send + Sync + 'static,
    {
        self.normalize_http_error = Some(Arc::new(f));
        self
    }

    pub fn with_msg_by_http_status<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) -> Option<String> + Send + Sync + 'static,
    {
        self.get_msg_by_http_status = Some(Arc::new(f));
        self
    }

    pub fn with_msg_by_biz_code<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<String> + Send + Sync + 'static,
    {
        self.get_msg_by_biz_code = Some(Arc::new(f));
        self
    }

    pub fn with_biz_lookup_on_http_error(mut self, enabled: bool) -> Self {
        self.biz_lookup_on_http_error = enabled;
        self
    }

    pub fn with_messages(mut self, messages: FailureMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn before_request<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.before_request = Some(Arc::new(f));
        self
    }

    pub fn after_response<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.after_response = Some(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ApiResult) + Send + Sync + 'static,
    {
        self.hooks.on_error = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for NormalizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeConfig")
            .field("normalize", &self.normalize.is_some())
            .field("normalize_http_error", &self.normalize_http_error.is_some())
            .field("get_msg_by_http_status", &self.get_msg_by_http_status.is_some())
            .field("get_msg_by_biz_code", &self.get_msg_by_biz_code.is_some())
            .field("biz_lookup_on_http_error", &self.biz_lookup_on_http_error)
            .field("messages", &self.messages)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Envelope fields recognised by [`default_normalize`].
const ENVELOPE_FIELDS: [&str; 4] = ["code", "data", "errorCode", "errorMsg"];

/// Default body normalizer.
///
/// An object carrying any envelope field is read field by field:
/// - `code` from an integer, a whole float or a numeric string
/// - `errorCode` and `errorMsg` from a string, or rendered as JSON text otherwise
/// - `data` as is
///
/// A field that is `null` or cannot be read is left unset. Any other body
/// (including objects without envelope fields, arrays and scalars) becomes
/// `data` unchanged. The status is not used.
pub fn default_normalize(body: Value, _status: Option<u16>) -> ApiResult {
    let is_envelope = body
        .as_object()
        .is_some_and(|obj| ENVELOPE_FIELDS.iter().any(|field| obj.contains_key(*field)));

    if !is_envelope {
        return ApiResult {
            data: Some(body),
            ..ApiResult::default()
        };
    }

    let Value::Object(mut obj) = body else {
        return ApiResult::default();
    };

    let code = obj.get("code").and_then(lenient_code);
    if code.is_none() && obj.get("code").is_some_and(|v| !v.is_null()) {
        tracing::debug!(code = ?obj.get("code"), "Envelope code is not numeric, ignoring it");
    }

    ApiResult {
        code,
        data: obj.remove("data").filter(|v| !v.is_null()),
        error_code: obj.get("errorCode").and_then(lenient_text),
        error_msg: obj.get("errorMsg").and_then(lenient_text),
    }
}

fn lenient_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
