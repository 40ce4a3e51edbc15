//! # Domain Types
//!
//! Core domain types used throughout FarmaPOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   Medication    │   │      Sale       │   │    SaleLine     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  name           │   │  patient_id?    │   │  sale_id (FK)   │        │
//! │  │  price_cents    │   │  total_cents    │   │  medication_id  │        │
//! │  │  stock          │   │  created_at     │   │  price snapshot │        │
//! │  │  expires_on     │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Patient      │   │    Supplier     │   (CRUD only, never          │
//! │  │  national_id ✦  │   │  name, contact  │    touched by a sale)        │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A Sale and its SaleLines are created atomically by the sale transaction
//! and are immutable afterwards: there is no update or delete path, and each
//! line's `unit_price_cents` is a snapshot that later medication price
//! changes never alter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Medication
// =============================================================================

/// A medication available for sale.
///
/// `stock` is the only field concurrent sale transactions contend over; the
/// database layer guarantees it never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medication {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Commercial name shown to the pharmacist and on the sale history.
    pub name: String,

    /// Active pharmaceutical ingredient.
    pub active_ingredient: Option<String>,

    /// Manufacturing laboratory.
    pub manufacturer: Option<String>,

    /// Presentation/form (tablets, syrup 120ml, ...).
    pub presentation: Option<String>,

    /// Unit price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Current stock level. Never negative after a committed transaction.
    pub stock: i64,

    /// Expiration date of the current batch.
    #[ts(as = "Option<String>")]
    pub expires_on: Option<NaiveDate>,

    /// When the medication was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the medication was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity is currently available.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Patient
// =============================================================================

/// A registered patient. Sales may optionally reference one.
///
/// Patients are managed by plain CRUD and are never mutated by the sale
/// transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// National identity number. UNIQUE across patients.
    pub national_id: String,
    #[ts(as = "Option<String>")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub medical_history: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Full display name for receipts and the sale history view.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A medication supplier. CRUD only; not involved in sales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Contact person at the supplier.
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale.
///
/// `total_cents` is derived: the sum of line subtotals, written once by the
/// sale transaction before commit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Optional patient association; None means an anonymous customer.
    pub patient_id: Option<String>,
    pub total_cents: i64,
    /// Server-assigned at creation, inside the transaction.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern to freeze medication data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub medication_id: String,
    /// Medication name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold. Always positive.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the unit price snapshot as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal (quantity × snapshot price).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale Requests / Results
// =============================================================================

/// One requested line of a sale: which medication, how many units.
///
/// Lines are processed strictly in caller order; a second line for the same
/// medication sees the first line's decrement already applied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineRequest {
    pub medication_id: String,
    pub quantity: i64,
}

/// The outcome of a successful sale registration.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisteredSale {
    pub sale_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
}

impl RegisteredSale {
    /// Returns the computed total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn medication(stock: i64, price_cents: i64) -> Medication {
        Medication {
            id: "m-1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            active_ingredient: Some("Paracetamol".to_string()),
            manufacturer: None,
            presentation: Some("20 tablets".to_string()),
            price_cents,
            stock,
            expires_on: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_stock_for() {
        let med = medication(10, 500);
        assert!(med.has_stock_for(10));
        assert!(med.has_stock_for(1));
        assert!(!med.has_stock_for(11));
    }

    #[test]
    fn test_sale_line_subtotal() {
        let line = SaleLine {
            id: "l-1".to_string(),
            sale_id: "s-1".to_string(),
            medication_id: "m-1".to_string(),
            name_snapshot: "Ibuprofen 400mg".to_string(),
            quantity: 3,
            unit_price_cents: 725,
            created_at: Utc::now(),
        };
        assert_eq!(line.subtotal().cents(), 2175);
    }

    #[test]
    fn test_patient_full_name() {
        let patient = Patient {
            id: "p-1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Mora".to_string(),
            national_id: "0912345678".to_string(),
            birth_date: None,
            address: None,
            phone: None,
            email: None,
            medical_history: None,
            created_at: Utc::now(),
        };
        assert_eq!(patient.full_name(), "Ana Mora");
    }
}
