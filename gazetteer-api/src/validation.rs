//! Validation Traits
//!
//! Common validation patterns extracted from route handlers.

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty strings.
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty.
    ///
    /// # Errors
    /// Returns `ApiError::missing_field` if the value is empty or
    /// whitespace-only.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::missing_field(field_name));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

impl<T: ValidateNonEmpty> ValidateNonEmpty for Option<T> {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        match self {
            Some(value) => value.validate_non_empty(field_name),
            None => Err(ApiError::missing_field(field_name)),
        }
    }
}

/// Require a JSON body to be a field mapping, and hand back the map.
///
/// Create and patch endpoints accept raw JSON so that a non-mapping body
/// (a string, a number, an array) is rejected as a validation error before
/// any typed decoding happens.
pub fn require_object(
    body: serde_json::Value,
) -> ApiResult<serde_json::Map<String, serde_json::Value>> {
    match body {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ApiError::invalid_input(format!(
            "expected a JSON object, got {}",
            match other {
                serde_json::Value::Null => "null",
                serde_json::Value::Bool(_) => "a boolean",
                serde_json::Value::Number(_) => "a number",
                serde_json::Value::String(_) => "a string",
                serde_json::Value::Array(_) => "an array",
                serde_json::Value::Object(_) => unreachable!(),
            }
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_non_empty_str() {
        assert!("hello".validate_non_empty("test").is_ok());
        assert!("".validate_non_empty("test").is_err());
        assert!("   ".validate_non_empty("test").is_err());
        assert!("  hi  ".validate_non_empty("test").is_ok());
    }

    #[test]
    fn test_validate_non_empty_option() {
        let some_str: Option<String> = Some("hello".to_string());
        let some_empty: Option<String> = Some("".to_string());
        let none_str: Option<String> = None;

        assert!(some_str.validate_non_empty("test").is_ok());
        assert!(some_empty.validate_non_empty("test").is_err());
        assert!(none_str.validate_non_empty("test").is_err());
    }

    #[test]
    fn test_require_object() {
        assert!(require_object(json!({"name": "Albany"})).is_ok());

        let err = require_object(json!("Albany")).unwrap_err();
        assert!(err.message.contains("a string"));

        let err = require_object(json!([1, 2, 3])).unwrap_err();
        assert!(err.message.contains("an array"));

        let err = require_object(json!(null)).unwrap_err();
        assert!(err.message.contains("null"));
    }
}
