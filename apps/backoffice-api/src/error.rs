//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Backoffice API                     │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Commerce rule rejected? ── CoreError::InsufficientStock ──┐            │
//! │         │                                                  │            │
//! │         ▼                                                  ▼            │
//! │  Store failure? ─────────── DbError::QueryFailed ──────► ApiError       │
//! │         │                                                  │            │
//! │         ▼                                                  ▼            │
//! │  Success ──► 200 JSON              status + { "code", "message" }       │
//! │                                                                         │
//! │  fetch('/cart/checkout') → 422                                          │
//! │    { "code": "INSUFFICIENT_STOCK",                                      │
//! │      "message": "Insufficient stock for ...: available 2, requested 5" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use autoparts_core::CoreError;
use autoparts_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Signed in, but the role may not do this (403)
    Forbidden,

    /// Business rule rejected the operation (422)
    BusinessLogic,

    /// Cart cannot be checked out as is (422)
    CartError,

    /// Not enough units on hand (422)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::BusinessLogic | ErrorCode::CartError | ErrorCode::InsufficientStock => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts data-layer errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(e) => ApiError::from(e),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::AuthFailed => ApiError::unauthorized("Invalid email or password"),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) | DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Internal server error")
            }
        }
    }
}

/// Converts commerce rule errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::DocumentNotFound(_)
            | CoreError::LineNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyDocument
            | CoreError::MissingCustomer
            | CoreError::DocumentTooLarge { .. } => ErrorCode::CartError,
            CoreError::QuantityTooLarge { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
            CoreError::NotAProforma(_)
            | CoreError::AlreadyConverted { .. }
            | CoreError::DuplicateDocument(_) => ErrorCode::BusinessLogic,
        };
        ApiError::new(code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, message = %self.message, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, message = %self.message, "Request rejected");
        }
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use autoparts_core::ValidationError;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = ApiError::from(CoreError::InsufficientStock {
            product: "Filtre à huile".to_string(),
            available: 2,
            requested: 5,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(CoreError::EmptyDocument);
        assert_eq!(err.code, ErrorCode::CartError);

        let err = ApiError::from(CoreError::from(ValidationError::required("name")));
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(CoreError::AlreadyConverted {
            proforma_id: "PRO-001".to_string(),
            sale_id: "INV-0003".to_string(),
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: kv".to_string()));
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("kv"));

        let err = ApiError::from(DbError::AuthFailed);
        assert_eq!(err.code.status(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(DbError::not_found("User", "9"));
        assert_eq!(err.message, "User not found: 9");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::forbidden("Admin only")).unwrap();
        assert_eq!(json["code"], "FORBIDDEN");
        assert_eq!(json["message"], "Admin only");
    }
}
