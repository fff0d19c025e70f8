//! Error Types for the Gazetteer API
//!
//! This module defines error handling for the API layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes,
//! and every core error kind maps onto exactly one status: validation
//! failures are 400, missing keys 404, duplicate keys 409, an unreachable
//! store 503, and any other store failure 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gazetteer_core::{EntityKind, RefdataError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested city does not exist
    CityNotFound,

    /// Requested state does not exist
    StateNotFound,

    /// Requested country does not exist
    CountryNotFound,

    /// Requested entity does not exist (non-entity resources)
    EntityNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// Record with the same natural key already exists
    EntityAlreadyExists,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Document store operation failed
    StoreError,

    /// Document store could not be reached
    StoreUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput | ErrorCode::MissingField => StatusCode::BAD_REQUEST,

            ErrorCode::CityNotFound
            | ErrorCode::StateNotFound
            | ErrorCode::CountryNotFound
            | ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,

            ErrorCode::EntityAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError | ErrorCode::StoreError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create a not-found error for one of the entity types.
    pub fn entity_not_found(entity: EntityKind, key: impl fmt::Display) -> Self {
        let code = match entity {
            EntityKind::City => ErrorCode::CityNotFound,
            EntityKind::State => ErrorCode::StateNotFound,
            EntityKind::Country => ErrorCode::CountryNotFound,
        };
        Self::new(code, format!("{} not found: {}", entity, key))
    }

    /// Create a generic not found error with custom message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntityNotFound, message)
    }

    /// Create an EntityAlreadyExists error.
    pub fn already_exists(entity: EntityKind, key: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityAlreadyExists,
            format!("{} already exists: {}", entity, key),
        )
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a StoreError.
    pub fn store_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreError, message)
    }

    /// Create a StoreUnavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling
/// in Axum handlers.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM CORE ERRORS
// ============================================================================

/// Convert the core error taxonomy into API errors, preserving messages.
impl From<RefdataError> for ApiError {
    fn from(err: RefdataError) -> Self {
        match err {
            RefdataError::Validation { .. } => ApiError::invalid_input(err.to_string()),
            RefdataError::MissingField { ref field } => ApiError::missing_field(field),
            RefdataError::NotFound { entity, ref key } => {
                ApiError::entity_not_found(entity, key)
            }
            RefdataError::DuplicateKey { entity, ref key } => {
                ApiError::already_exists(entity, key)
            }
            RefdataError::Unavailable { ref reason } => {
                tracing::error!(reason = %reason, "document store unavailable");
                ApiError::store_unavailable(err.to_string())
            }
            RefdataError::Storage { ref reason } => {
                tracing::error!(reason = %reason, "document store failure");
                ApiError::store_error(err.to_string())
            }
        }
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::EntityAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::StoreError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_not_found_maps_per_entity() {
        let err: ApiError =
            RefdataError::not_found(EntityKind::City, "Albany, NY, US").into();
        assert_eq!(err.code, ErrorCode::CityNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.message.contains("Albany, NY, US"));

        let err: ApiError = RefdataError::not_found(EntityKind::Country, "ZZZ").into();
        assert_eq!(err.code, ErrorCode::CountryNotFound);
    }

    #[test]
    fn test_core_validation_maps_to_400() {
        let err: ApiError = RefdataError::missing_field("name").into();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("name"));

        let err: ApiError = RefdataError::validation("patch", "no update data").into();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_core_duplicate_maps_to_conflict() {
        let err: ApiError =
            RefdataError::duplicate_key(EntityKind::State, "NY, USA").into();
        assert_eq!(err.code, ErrorCode::EntityAlreadyExists);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_core_store_errors_map_to_5xx() {
        let err: ApiError = RefdataError::unavailable("connection refused").into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError = RefdataError::storage("txn aborted").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::missing_field("capital");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("MISSING_FIELD"));
        assert!(json.contains("capital"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }
}
