//! The uniform outcome shape handed to callers.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound (exclusive) of the success band, relative to 200.
const SUCCESS_BAND_WIDTH: i64 = 100;

/// Uniform result returned on both the success and the error channel.
///
/// Field names serialize in camelCase so a conforming backend envelope
/// (`{"code":200,"data":...,"errorCode":...,"errorMsg":...}`) deserializes
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T = Value> {
    /// Semantic status: HTTP status for transport failures, application code otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Business-level error identifier (e.g. "ProductNotFound").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// Human-readable error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl<T> Default for ApiResult<T> {
    fn default() -> Self {
        Self {
            code: None,
            data: None,
            error_code: None,
            error_msg: None,
        }
    }
}

impl<T> ApiResult<T> {
    /// A successful result carrying `data`.
    pub fn success(code: i64, data: T) -> Self {
        Self {
            code: Some(code),
            data: Some(data),
            ..Self::default()
        }
    }

    /// An error result with a code and message.
    pub fn error(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            error_msg: Some(msg.into()),
            ..Self::default()
        }
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// True when `code` is present and `code - 200 >= 100`.
    ///
    /// The band is one-sided: codes below 200 count as success.
    pub fn has_failing_code(&self) -> bool {
        self.code
            .is_some_and(|code| code.saturating_sub(200) >= SUCCESS_BAND_WIDTH)
    }

    /// True when the result carries a non-empty business error field.
    pub fn has_error_fields(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.error_code) || present(&self.error_msg)
    }

    /// True when the result denotes a failure.
    pub fn is_error(&self) -> bool {
        self.has_failing_code() || self.has_error_fields()
    }
}

impl ApiResult<Value> {
    /// Deserialize `data` into a concrete type.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<ApiResult<T>, serde_json::Error> {
        let data = self.data.map(serde_json::from_value).transpose()?;
        Ok(ApiResult {
            code: self.code,
            data,
            error_code: self.error_code,
            error_msg: self.error_msg,
        })
    }
}

impl<T> fmt::Display for ApiResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}]", code)?,
            None => write!(f, "[-]")?,
        }
        if let Some(error_code) = &self.error_code {
            write!(f, " {}", error_code)?;
        }
        match &self.error_msg {
            Some(msg) => write!(f, " {}", msg),
            None => Ok(()),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for ApiResult<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_band() {
        assert!(!ApiResult::<Value>::error(200, "x").has_failing_code());
        assert!(!ApiResult::<Value>::error(299, "x").has_failing_code());
        assert!(ApiResult::<Value>::error(300, "x").has_failing_code());
        assert!(ApiResult::<Value>::error(1000, "x").has_failing_code());
        // One-sided band
        assert!(!ApiResult::<Value>::error(100, "x").has_failing_code());
        assert!(!ApiResult::<Value>::default().has_failing_code());
    }

    #[test]
    fn test_envelope_roundtrip_uses_camel_case() {
        let result: ApiResult = serde_json::from_value(json!({
            "code": 200,
            "errorCode": "ProductNotFound",
            "errorMsg": "error!"
        }))
        .unwrap();
        assert_eq!(result.error_code.as_deref(), Some("ProductNotFound"));
        assert!(result.is_error());

        let value = serde_json::to_value(ApiResult::success(200, json!({"users": [1]}))).unwrap();
        assert_eq!(value, json!({"code": 200, "data": {"users": [1]}}));
    }

    #[test]
    fn test_into_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Users {
            users: Vec<u32>,
        }

        let typed = ApiResult::success(200, json!({"users": [1, 2]}))
            .into_typed::<Users>()
            .unwrap();
        assert_eq!(typed.data, Some(Users { users: vec![1, 2] }));

        let err = ApiResult::success(200, json!("nope")).into_typed::<Users>();
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_error_fields_are_absent() {
        let result = ApiResult {
            code: Some(200),
            data: Some(json!(1)),
            error_code: Some(String::new()),
            error_msg: Some(String::new()),
        };
        assert!(!result.has_error_fields());
        assert!(!result.is_error());
    }

    #[test]
    fn test_display() {
        let result = ApiResult::<Value>::error(403, "forbidden").with_error_code("NoAccess");
        assert_eq!(result.to_string(), "[403] NoAccess forbidden");
    }
}
