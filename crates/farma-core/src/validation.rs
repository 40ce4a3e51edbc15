//! # Validation Module
//!
//! Input validation utilities for FarmaPOS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (SPA)                                                │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API route (Rust)                                              │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / UNIQUE constraints                                      │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                           │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use farma_core::types::SaleLineRequest;
//! use farma_core::validation::validate_sale_lines;
//!
//! let lines = vec![SaleLineRequest { medication_id: "m-1".into(), quantity: 2 }];
//! validate_sale_lines(&lines).unwrap();
//! ```

use crate::error::{SaleError, ValidationError};
use crate::types::SaleLineRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sale Request Validation
// =============================================================================

/// Validates the lines of a sale request before the unit of work begins.
///
/// ## Rules
/// - The request must contain at least one line (`EmptyOrder` otherwise)
/// - Every quantity must be a positive integer (`InvalidQuantity` with the
///   1-based line number otherwise)
///
/// Existence and stock checks happen later, under the transaction's lock,
/// because they depend on live store state.
pub fn validate_sale_lines(lines: &[SaleLineRequest]) -> Result<(), SaleError> {
    if lines.is_empty() {
        return Err(SaleError::EmptyOrder);
    }

    for (index, line) in lines.iter().enumerate() {
        if line.quantity <= 0 {
            return Err(SaleError::InvalidQuantity {
                line: index + 1,
                quantity: line.quantity,
            });
        }
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity display name (medication, patient, supplier).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a patient's national identity number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Digits only (leading zeros are significant, so it stays a string)
pub fn validate_national_id(national_id: &str) -> ValidationResult<()> {
    let national_id = national_id.trim();

    if national_id.is_empty() {
        return Err(ValidationError::Required {
            field: "national_id".to_string(),
        });
    }

    if national_id.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "national_id".to_string(),
            max: 20,
        });
    }

    if !national_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "national_id".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (samples, donations)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial or restocked stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use farma_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(medication_id: &str, quantity: i64) -> SaleLineRequest {
        SaleLineRequest {
            medication_id: medication_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_validate_sale_lines_ok() {
        let lines = vec![line("m-1", 1), line("m-2", 99)];
        assert!(validate_sale_lines(&lines).is_ok());
    }

    #[test]
    fn test_validate_sale_lines_empty() {
        assert!(matches!(
            validate_sale_lines(&[]),
            Err(SaleError::EmptyOrder)
        ));
    }

    #[test]
    fn test_validate_sale_lines_non_positive_quantity() {
        let lines = vec![line("m-1", 2), line("m-2", 0)];
        match validate_sale_lines(&lines) {
            Err(SaleError::InvalidQuantity { line, quantity }) => {
                assert_eq!(line, 2);
                assert_eq!(quantity, 0);
            }
            other => panic!("expected InvalidQuantity, got {:?}", other),
        }

        let lines = vec![line("m-1", -3)];
        assert!(matches!(
            validate_sale_lines(&lines),
            Err(SaleError::InvalidQuantity { line: 1, .. })
        ));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ibuprofen 400mg").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_national_id() {
        assert!(validate_national_id("0912345678").is_ok());
        assert!(validate_national_id("").is_err());
        assert!(validate_national_id("12-34").is_err());
        assert!(validate_national_id(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(500).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
