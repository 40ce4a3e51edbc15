//! Error types for the HTTP layer.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EmptyOrder, InvalidQuantity, validation failures   → 400 Bad Request   │
//! │  MedicationNotFound, missing entity                 → 404 Not Found     │
//! │  InsufficientStock, unique violation                → 409 Conflict      │
//! │  Transaction aborts, any other store failure        → 500 Internal      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error serializes as `{"code": "...", "message": "..."}`. The message
//! for stock conflicts carries the available and requested quantities so the
//! frontend can show an actionable message without a second round trip.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use farma_core::{SaleError, ValidationError};
use farma_db::DbError;

/// Errors surfaced by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Sale registration failure (validation or transactional).
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// Request shape or field validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store-level failure outside the sale transaction.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Entity lookup miss on a GET route.
    #[error("{0}")]
    NotFound(String),
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Sale(SaleError::EmptyOrder) => (StatusCode::BAD_REQUEST, "EMPTY_ORDER"),
            ApiError::Sale(SaleError::InvalidQuantity { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_QUANTITY")
            }
            ApiError::Sale(SaleError::MedicationNotFound(_)) => {
                (StatusCode::NOT_FOUND, "MEDICATION_NOT_FOUND")
            }
            ApiError::Sale(SaleError::InsufficientStock { .. }) => {
                (StatusCode::CONFLICT, "INSUFFICIENT_STOCK")
            }
            ApiError::Sale(SaleError::Transaction(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TRANSACTION_FAILED")
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ApiError::Db(DbError::NotFound { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Db(DbError::UniqueViolation { .. }) => (StatusCode::CONFLICT, "DUPLICATE"),
            ApiError::Db(DbError::InvalidArgument(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
            }
            ApiError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(code, %message, "Request failed");
        }

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_error_mapping() {
        let cases = [
            (SaleError::EmptyOrder, StatusCode::BAD_REQUEST, "EMPTY_ORDER"),
            (
                SaleError::InvalidQuantity {
                    line: 1,
                    quantity: 0,
                },
                StatusCode::BAD_REQUEST,
                "INVALID_QUANTITY",
            ),
            (
                SaleError::MedicationNotFound("x".into()),
                StatusCode::NOT_FOUND,
                "MEDICATION_NOT_FOUND",
            ),
            (
                SaleError::InsufficientStock {
                    medication_id: "x".into(),
                    name: "Ibuprofen".into(),
                    available: 3,
                    requested: 5,
                },
                StatusCode::CONFLICT,
                "INSUFFICIENT_STOCK",
            ),
            (
                SaleError::Transaction("busy".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "TRANSACTION_FAILED",
            ),
        ];

        for (err, status, code) in cases {
            let (s, c) = ApiError::Sale(err).status_and_code();
            assert_eq!(s, status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn test_stock_conflict_message_names_quantities() {
        let err = ApiError::Sale(SaleError::InsufficientStock {
            medication_id: "m1".into(),
            name: "Insulin".into(),
            available: 3,
            requested: 5,
        });
        let message = err.to_string();
        assert!(message.contains("Insulin"));
        assert!(message.contains('3'));
        assert!(message.contains('5'));
    }

    #[test]
    fn test_db_error_mapping() {
        let (s, c) = ApiError::Db(DbError::not_found("Patient", "p1")).status_and_code();
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(c, "NOT_FOUND");

        let (s, c) = ApiError::Db(DbError::UniqueViolation {
            field: "national_id".into(),
            value: "0912345678".into(),
        })
        .status_and_code();
        assert_eq!(s, StatusCode::CONFLICT);
        assert_eq!(c, "DUPLICATE");

        let (s, c) = ApiError::Db(DbError::InvalidArgument("delta".into())).status_and_code();
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(c, "INVALID_ARGUMENT");
    }
}
