//! # Medication Repository
//!
//! Database operations for medications.
//!
//! ## Stock Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who May Touch `stock`                                │
//! │                                                                         │
//! │  Sale transaction (sale.rs)  → decrements, under the write lock         │
//! │  restock() (this file)       → increments, when a delivery arrives      │
//! │  update() (this file)        → absolute set, inventory correction       │
//! │                                                                         │
//! │  CRUD updates are assumed non-concurrent with active sales; the         │
//! │  CHECK (stock >= 0) constraint still holds for all three paths.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use farma_core::Medication;

/// Repository for medication database operations.
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    pool: SqlitePool,
}

impl MedicationRepository {
    /// Creates a new MedicationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicationRepository { pool }
    }

    /// Lists all medications, newest first.
    pub async fn list(&self) -> DbResult<Vec<Medication>> {
        let medications = sqlx::query_as::<_, Medication>(
            r#"
            SELECT id, name, active_ingredient, manufacturer, presentation,
                   price_cents, stock, expires_on, created_at, updated_at
            FROM medications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(medications)
    }

    /// Gets a medication by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Medication))` - Medication found
    /// * `Ok(None)` - Medication not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Medication>> {
        let medication = sqlx::query_as::<_, Medication>(
            r#"
            SELECT id, name, active_ingredient, manufacturer, presentation,
                   price_cents, stock, expires_on, created_at, updated_at
            FROM medications
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(medication)
    }

    /// Inserts a new medication.
    pub async fn insert(&self, medication: &Medication) -> DbResult<()> {
        debug!(id = %medication.id, name = %medication.name, "Inserting medication");

        sqlx::query(
            r#"
            INSERT INTO medications (
                id, name, active_ingredient, manufacturer, presentation,
                price_cents, stock, expires_on, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&medication.id)
        .bind(&medication.name)
        .bind(&medication.active_ingredient)
        .bind(&medication.manufacturer)
        .bind(&medication.presentation)
        .bind(medication.price_cents)
        .bind(medication.stock)
        .bind(medication.expires_on)
        .bind(medication.created_at)
        .bind(medication.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing medication (name, price, stock correction, ...).
    ///
    /// ## Note
    /// Committed sale lines keep their price snapshots; updating the price
    /// here never rewrites history.
    pub async fn update(&self, medication: &Medication) -> DbResult<()> {
        debug!(id = %medication.id, "Updating medication");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medications SET
                name = ?2,
                active_ingredient = ?3,
                manufacturer = ?4,
                presentation = ?5,
                price_cents = ?6,
                stock = ?7,
                expires_on = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&medication.id)
        .bind(&medication.name)
        .bind(&medication.active_ingredient)
        .bind(&medication.manufacturer)
        .bind(&medication.presentation)
        .bind(medication.price_cents)
        .bind(medication.stock)
        .bind(medication.expires_on)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medication", &medication.id));
        }

        Ok(())
    }

    /// Increments stock when a supplier delivery arrives.
    ///
    /// ## Arguments
    /// * `id` - Medication ID
    /// * `delta` - Units received (must be positive; sales go through the
    ///   sale transaction, never through here)
    ///
    /// ## Errors
    /// * [`DbError::InvalidArgument`] - `delta` is zero or negative; stock
    ///   only ever decreases inside the sale transaction
    pub async fn restock(&self, id: &str, delta: i64) -> DbResult<()> {
        if delta <= 0 {
            return Err(DbError::InvalidArgument(format!(
                "restock delta must be positive, got {}",
                delta
            )));
        }

        debug!(id = %id, delta = %delta, "Restocking medication");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE medications
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medication", id));
        }

        Ok(())
    }

    /// Deletes a medication.
    ///
    /// Fails with a foreign key violation if any committed sale line still
    /// references it, which preserves sale history.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting medication");

        let result = sqlx::query("DELETE FROM medications WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Medication", id));
        }

        Ok(())
    }

    /// Counts medications (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new medication ID.
pub fn generate_medication_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    fn sample(name: &str, price_cents: i64, stock: i64) -> Medication {
        let now = Utc::now();
        Medication {
            id: generate_medication_id(),
            name: name.to_string(),
            active_ingredient: Some("Ibuprofen".to_string()),
            manufacturer: Some("Genfar".to_string()),
            presentation: Some("20 tablets".to_string()),
            price_cents,
            stock,
            expires_on: NaiveDate::from_ymd_opt(2027, 6, 30),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medications();

        let med = sample("Ibuprofen 400mg", 725, 50);
        repo.insert(&med).await.unwrap();

        let found = repo.get_by_id(&med.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Ibuprofen 400mg");
        assert_eq!(found.price_cents, 725);
        assert_eq!(found.stock, 50);
        assert_eq!(found.expires_on, NaiveDate::from_ymd_opt(2027, 6, 30));

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_restock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medications();

        let mut med = sample("Loratadine 10mg", 350, 10);
        repo.insert(&med).await.unwrap();

        med.price_cents = 399;
        repo.update(&med).await.unwrap();

        repo.restock(&med.id, 25).await.unwrap();

        let found = repo.get_by_id(&med.id).await.unwrap().unwrap();
        assert_eq!(found.price_cents, 399);
        assert_eq!(found.stock, 35);
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive_delta() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medications();

        let med = sample("Amoxicillin 500mg", 890, 10);
        repo.insert(&med).await.unwrap();

        // Only the sale transaction may decrease stock; a negative delta
        // here must never slip through as a silent decrement.
        let err = repo.restock(&med.id, -3).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = repo.restock(&med.id, 0).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let found = repo.get_by_id(&med.id).await.unwrap().unwrap();
        assert_eq!(found.stock, 10);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medications();

        let med = sample("Ghost", 100, 1);
        let err = repo.update(&med).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.restock("missing", 5).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medications();

        let med = sample("Aspirin 100mg", 210, 5);
        repo.insert(&med).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(&med.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
