//! Error types for gazetteer operations

use crate::entities::EntityKind;
use thiserror::Error;

/// Errors surfaced by the query services and the document store adapter.
///
/// Every variant maps onto one kind in the service's error taxonomy:
/// validation failures are detected before any store call, not-found and
/// duplicate-key failures carry the offending natural key verbatim, and
/// store failures are re-raised unchanged rather than retried or masked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefdataError {
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    #[error("{entity} already exists: {key}")]
    DuplicateKey { entity: EntityKind, key: String },

    #[error("Document store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Document store operation failed: {reason}")]
    Storage { reason: String },
}

impl RefdataError {
    /// Create a Validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a NotFound error carrying the offending natural key.
    pub fn not_found(entity: EntityKind, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Create a DuplicateKey error carrying the conflicting natural key.
    pub fn duplicate_key(entity: EntityKind, key: impl std::fmt::Display) -> Self {
        Self::DuplicateKey {
            entity,
            key: key.to_string(),
        }
    }

    /// Create an Unavailable error (store connection could not be established).
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a Storage error (store call failed after a connection existed).
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }

    /// Whether this error means the target record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias used throughout the storage and service layers.
pub type RefdataResult<T> = Result<T, RefdataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_key() {
        let err = RefdataError::not_found(EntityKind::City, "Albany, NY, US");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Albany, NY, US"));
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = RefdataError::duplicate_key(EntityKind::State, "NY, USA");
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("NY, USA"));
    }

    #[test]
    fn test_validation_and_missing_field() {
        let err = RefdataError::validation("limit", "must be positive");
        assert!(err.to_string().contains("limit"));

        let err = RefdataError::missing_field("name");
        assert_eq!(
            err,
            RefdataError::MissingField {
                field: "name".to_string()
            }
        );
    }
}
