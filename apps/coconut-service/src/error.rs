//! # Service Error Type
//!
//! Unified error type for the service layer and its binaries.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ConfigError ──┐                                                        │
//! │  DbError ──────┼──► ServiceError ──► ErrorResponse { code, message }   │
//! │  CoreError ────┤                      (JSON for the admin frontend)    │
//! │  ValidationErrors ┘                                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use coconut_core::{CoreError, ValidationError, ValidationErrors};
use coconut_db::DbError;

use crate::config::ConfigError;

/// Errors surfaced by [`DeliveryService`](crate::DeliveryService).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Rules(#[from] CoreError),

    /// A draft failed validation. Carries every failing field.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        ServiceError::Validation(error.into())
    }
}

impl ServiceError {
    /// Machine-readable category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Config(_) => ErrorCode::ConfigError,
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::Rules(err) => match err {
                CoreError::NoMatchingRule { .. } => ErrorCode::NoMatchingRule,
                CoreError::UnknownZone { .. } => ErrorCode::UnknownZone,
                CoreError::InvalidRuleConfiguration(_) => ErrorCode::InvalidRules,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            ServiceError::Db(err) => match err {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                DbError::UniqueViolation { .. } | DbError::ConstraintViolation { .. } => {
                    ErrorCode::ValidationError
                }
                DbError::InvalidRules(_) | DbError::CorruptRow { .. } => ErrorCode::InvalidRules,
                _ => ErrorCode::DatabaseError,
            },
        }
    }
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    NoMatchingRule,
    UnknownZone,
    /// Stored rule tables are inconsistent or unreadable.
    InvalidRules,
    DatabaseError,
    ConfigError,
}

/// What the frontend receives when a call fails.
///
/// ```json
/// {
///   "code": "UNKNOWN_ZONE",
///   "message": "Unknown delivery zone: Nonexistent Zone"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    /// Field errors when `code` is `VALIDATION_ERROR` from a draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        let message = match err {
            ServiceError::Db(DbError::QueryFailed(e)) | ServiceError::Db(DbError::Internal(e)) => {
                tracing::error!("Database operation failed: {}", e);
                "Database operation failed".to_string()
            }
            other => other.to_string(),
        };

        let fields = match err {
            ServiceError::Validation(errors) => Some(errors.clone()),
            ServiceError::Rules(CoreError::InvalidRuleConfiguration(errors)) => {
                Some(errors.clone())
            }
            _ => None,
        };

        ErrorResponse {
            code: err.code(),
            message,
            fields,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: ServiceError = CoreError::unknown_zone("Nowhere").into();
        assert_eq!(err.code(), ErrorCode::UnknownZone);

        let err: ServiceError = DbError::not_found("ZoneRule", "abc").into();
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err: ServiceError = ValidationError::Required {
            field: "zone_name".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_error_response_json() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "fee".to_string(),
        });
        let err = ServiceError::from(errors);

        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fields"][0]["kind"], "required");
        assert_eq!(json["fields"][0]["field"], "fee");
    }

    #[test]
    fn test_internal_db_message_is_generic() {
        let err = ServiceError::from(DbError::Internal("disk I/O error".to_string()));
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, ErrorCode::DatabaseError);
        assert_eq!(response.message, "Database operation failed");
    }
}
