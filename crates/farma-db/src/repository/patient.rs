//! # Patient Repository
//!
//! Database operations for patients. Plain CRUD; patients are never mutated
//! by the sale transaction, only optionally referenced.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use farma_core::Patient;

/// Repository for patient database operations.
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: SqlitePool,
}

impl PatientRepository {
    /// Creates a new PatientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PatientRepository { pool }
    }

    /// Lists all patients, newest first.
    pub async fn list(&self) -> DbResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, first_name, last_name, national_id, birth_date,
                   address, phone, email, medical_history, created_at
            FROM patients
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    /// Gets a patient by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, first_name, last_name, national_id, birth_date,
                   address, phone, email, medical_history, created_at
            FROM patients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    /// Inserts a new patient.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - national id already registered
    pub async fn insert(&self, patient: &Patient) -> DbResult<()> {
        debug!(id = %patient.id, national_id = %patient.national_id, "Inserting patient");

        sqlx::query(
            r#"
            INSERT INTO patients (
                id, first_name, last_name, national_id, birth_date,
                address, phone, email, medical_history, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(&patient.national_id)
        .bind(patient.birth_date)
        .bind(&patient.address)
        .bind(&patient.phone)
        .bind(&patient.email)
        .bind(&patient.medical_history)
        .bind(patient.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a patient.
    ///
    /// Fails with a foreign key violation if any committed sale still
    /// references the patient.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting patient");

        let result = sqlx::query("DELETE FROM patients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Patient", id));
        }

        Ok(())
    }
}

/// Helper to generate a new patient ID.
pub fn generate_patient_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn sample(national_id: &str) -> Patient {
        Patient {
            id: generate_patient_id(),
            first_name: "Ana".to_string(),
            last_name: "Mora".to_string(),
            national_id: national_id.to_string(),
            birth_date: None,
            address: Some("Av. Central 123".to_string()),
            phone: Some("0991234567".to_string()),
            email: None,
            medical_history: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_list_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.patients();

        let patient = sample("0912345678");
        repo.insert(&patient).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);

        let found = repo.get_by_id(&patient.id).await.unwrap().unwrap();
        assert_eq!(found.full_name(), "Ana Mora");
    }

    #[tokio::test]
    async fn test_duplicate_national_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.patients();

        repo.insert(&sample("0912345678")).await.unwrap();
        let err = repo.insert(&sample("0912345678")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.patients();

        let patient = sample("0955555555");
        repo.insert(&patient).await.unwrap();
        repo.delete(&patient.id).await.unwrap();

        assert!(repo.get_by_id(&patient.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&patient.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
