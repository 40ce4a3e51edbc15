//! # Error Types
//!
//! Domain-specific error types for farma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farma-core errors (this file)                                          │
//! │  ├── SaleError        - Sale transaction failures                       │
//! │  └── ValidationError  - CRUD input validation failures                  │
//! │                                                                         │
//! │  farma-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  HTTP errors (in apps/server)                                           │
//! │  └── ApiError         - What the frontend sees (serialized)             │
//! │                                                                         │
//! │  Flow: SaleError / ValidationError / DbError → ApiError → Frontend      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (medication name, quantities, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Sale Error
// =============================================================================

/// Failures of the sale registration transaction.
///
/// Every variant raised after the unit of work begins triggers a full
/// rollback before it reaches the caller: no sale, no lines, no stock
/// decrement survives a failed registration.
#[derive(Debug, Error)]
pub enum SaleError {
    /// The request contained no lines.
    #[error("Sale must contain at least one line")]
    EmptyOrder,

    /// A line carried a non-positive quantity.
    #[error("Invalid quantity {quantity} on line {line}: quantity must be positive")]
    InvalidQuantity { line: usize, quantity: i64 },

    /// A referenced medication does not exist.
    #[error("Medication not found: {0}")]
    MedicationNotFound(String),

    /// Requested more units than currently in stock.
    ///
    /// Carries everything the caller needs to render an actionable message:
    /// which medication, how many are available, how many were requested.
    ///
    /// ## User Workflow
    /// ```text
    /// Register sale (qty: 5)
    ///      │
    ///      ▼
    /// Locked read: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Amoxicillin", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Amoxicillin in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        medication_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Store-level abort (lock-wait timeout, connectivity loss, constraint).
    /// The unit of work was rolled back before this surfaced.
    #[error("Sale transaction failed: {0}")]
    Transaction(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for the CRUD surface.
///
/// These occur when user input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = SaleError::InsufficientStock {
            medication_id: "m-42".to_string(),
            name: "Amoxicillin 500mg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Amoxicillin 500mg: available 3, requested 5"
        );
    }

    #[test]
    fn test_empty_order_message() {
        assert_eq!(
            SaleError::EmptyOrder.to_string(),
            "Sale must contain at least one line"
        );
    }

    #[test]
    fn test_invalid_quantity_message() {
        let err = SaleError::InvalidQuantity {
            line: 2,
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 0 on line 2: quantity must be positive"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }
}
