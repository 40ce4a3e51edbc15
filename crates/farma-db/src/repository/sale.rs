//! # Sale Repository
//!
//! Sale reads plus the **sale registration transaction**, the one unit of
//! work in FarmaPOS where correctness invariants matter.
//!
//! ## The Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    register_sale(patient?, lines)                       │
//! │                                                                         │
//! │  validate lines (non-empty, positive quantities)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN IMMEDIATE  ◄── takes the database write lock up front            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT sale (total = 0, server timestamp)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line, in caller order:                                        │
//! │    ├── read medication price + stock   (sees own earlier decrements)    │
//! │    ├── missing?          → MedicationNotFound, abort                    │
//! │    ├── stock < quantity? → InsufficientStock, abort                     │
//! │    ├── INSERT sale line  (price + name snapshot)                        │
//! │    ├── guarded decrement (stock = stock - qty WHERE stock >= qty)       │
//! │    └── total += qty × unit_price      (integer cents, exact)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE sale total ──► COMMIT                                           │
//! │                                                                         │
//! │  ANY error after BEGIN → ROLLBACK: no sale, no lines, no decrements     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking Model
//! SQLite has no per-row `SELECT ... FOR UPDATE`; its write lock is
//! database-wide and single-writer. `BEGIN IMMEDIATE` acquires that lock
//! before the first read, so two concurrent sales over the same medication
//! serialize at transaction start: the second waits (up to the busy
//! timeout), then re-reads post-commit stock and either succeeds or fails
//! its own stock check against up-to-date numbers. A lost update on the
//! stock counter is impossible. The guarded decrement and the schema's
//! `CHECK (stock >= 0)` back the validated read up.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use farma_core::validation::validate_sale_lines;
use farma_core::{Money, RegisteredSale, Sale, SaleError, SaleLine, SaleLineRequest};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// The slice of a medication row the transaction locks and reads:
/// identity, display name, current price, current stock.
#[derive(Debug, sqlx::FromRow)]
struct MedicationAtSale {
    id: String,
    name: String,
    price_cents: i64,
    stock: i64,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    // =========================================================================
    // Sale Registration (the core transaction)
    // =========================================================================

    /// Registers a multi-line sale atomically.
    ///
    /// ## Contract
    /// On success exactly one sale, N sale lines, and N stock decrements are
    /// durably visible together. On failure none of them are: the whole unit
    /// of work is rolled back before the error is surfaced, and no retry is
    /// attempted here (retries are a caller decision).
    ///
    /// ## Arguments
    /// * `patient_id` - Optional patient reference (None = anonymous)
    /// * `lines` - Ordered line items; processed strictly in this order. If
    ///   the same medication appears twice, the second line's stock check
    ///   sees the first line's decrement already applied.
    ///
    /// ## Errors
    /// * [`SaleError::EmptyOrder`] - no lines
    /// * [`SaleError::InvalidQuantity`] - a non-positive quantity
    /// * [`SaleError::MedicationNotFound`] - unknown medication reference
    /// * [`SaleError::InsufficientStock`] - with available and requested
    ///   quantities for an actionable message
    /// * [`SaleError::Transaction`] - store-level abort (timeout, FK, ...)
    pub async fn register_sale(
        &self,
        patient_id: Option<&str>,
        lines: &[SaleLineRequest],
    ) -> Result<RegisteredSale, SaleError> {
        // Shape checks need no store state; fail before touching the pool.
        validate_sale_lines(lines)?;

        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;

        // Write lock up front (see module docs). A plain deferred BEGIN
        // would upgrade on the first write and can fail mid-transaction
        // when two sales race; IMMEDIATE serializes them here instead.
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

        match Self::apply_sale(&mut conn, patient_id, lines).await {
            Ok(sale) => match sqlx::query("COMMIT").execute(&mut *conn).await {
                Ok(_) => {
                    info!(
                        sale_id = %sale.sale_id,
                        total = %sale.total(),
                        lines = lines.len(),
                        "Sale registered"
                    );
                    Ok(sale)
                }
                Err(e) => {
                    let err = SaleError::from(DbError::from(e));
                    Self::rollback(&mut conn).await;
                    Err(err)
                }
            },
            Err(err) => {
                Self::rollback(&mut conn).await;
                Err(err)
            }
        }
    }

    /// The body of the unit of work. Runs between BEGIN and COMMIT; any
    /// error return triggers a rollback in `register_sale`.
    async fn apply_sale(
        conn: &mut SqliteConnection,
        patient_id: Option<&str>,
        lines: &[SaleLineRequest],
    ) -> Result<RegisteredSale, SaleError> {
        let sale_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        // Provisional total of zero; the computed total lands in step 4.
        sqlx::query("INSERT INTO sales (id, patient_id, total_cents, created_at) VALUES (?1, ?2, 0, ?3)")
            .bind(&sale_id)
            .bind(patient_id)
            .bind(created_at)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

        let mut total = Money::zero();

        for line in lines {
            // Reads its own earlier writes: a duplicate medication within
            // one request sees the previous line's decrement.
            let medication = sqlx::query_as::<_, MedicationAtSale>(
                "SELECT id, name, price_cents, stock FROM medications WHERE id = ?1",
            )
            .bind(&line.medication_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| SaleError::MedicationNotFound(line.medication_id.clone()))?;

            if medication.stock < line.quantity {
                return Err(SaleError::InsufficientStock {
                    medication_id: medication.id,
                    name: medication.name,
                    available: medication.stock,
                    requested: line.quantity,
                });
            }

            debug!(
                sale_id = %sale_id,
                medication = %medication.name,
                quantity = line.quantity,
                "Adding sale line"
            );

            // Snapshot pattern: the currently-read price and name are
            // frozen into the line, never live-joined later.
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, medication_id, name_snapshot,
                    quantity, unit_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&medication.id)
            .bind(&medication.name)
            .bind(line.quantity)
            .bind(medication.price_cents)
            .bind(created_at)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

            // Guarded decrement: redundant with the check above while the
            // write lock is held, but keeps the stock invariant standing
            // on its own.
            let updated = sqlx::query(
                "UPDATE medications SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(&medication.id)
            .bind(line.quantity)
            .bind(created_at)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

            if updated.rows_affected() == 0 {
                return Err(SaleError::InsufficientStock {
                    medication_id: medication.id,
                    name: medication.name,
                    available: medication.stock,
                    requested: line.quantity,
                });
            }

            // Exact integer-cents accumulation; currency precision holds
            // by construction, no rounding step needed at the end.
            total += Money::from_cents(medication.price_cents).multiply_quantity(line.quantity);
        }

        sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(&sale_id)
            .bind(total.cents())
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;

        Ok(RegisteredSale {
            sale_id,
            created_at,
            total_cents: total.cents(),
        })
    }

    /// Rolls the open transaction back, releasing the write lock.
    async fn rollback(conn: &mut SqliteConnection) {
        if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
            warn!(error = %e, "Rollback failed after sale error");
        }
    }

    // =========================================================================
    // Reads (display layer; reflect committed state only)
    // =========================================================================

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, patient_id, total_cents, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, patient_id, total_cents, created_at FROM sales ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all lines for a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, medication_id, name_snapshot,
                   quantity, unit_price_cents, created_at
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists the full sale history, newest first: every committed sale with
    /// its lines, medication details, and the patient's name when the sale
    /// has a patient reference.
    pub async fn list_history(&self) -> DbResult<Vec<SaleHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT s.id AS sale_id,
                   s.created_at,
                   s.total_cents,
                   s.patient_id,
                   p.first_name AS patient_first_name,
                   p.last_name AS patient_last_name,
                   l.name_snapshot,
                   m.presentation,
                   l.quantity,
                   l.unit_price_cents
            FROM sales s
            JOIN sale_lines l ON l.sale_id = s.id
            LEFT JOIN medications m ON m.id = l.medication_id
            LEFT JOIN patients p ON p.id = s.patient_id
            ORDER BY s.created_at DESC, s.id, l.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // One flat row per line; fold into one entry per sale. Rows arrive
        // grouped by sale, so a running tail entry is enough.
        let mut history: Vec<SaleHistoryEntry> = Vec::new();
        for row in rows {
            let line = SaleHistoryLine {
                medication_name: row.name_snapshot,
                presentation: row.presentation,
                quantity: row.quantity,
                unit_price_cents: row.unit_price_cents,
            };

            match history.last_mut() {
                Some(entry) if entry.sale_id == row.sale_id => entry.lines.push(line),
                _ => history.push(SaleHistoryEntry {
                    sale_id: row.sale_id,
                    created_at: row.created_at,
                    total_cents: row.total_cents,
                    patient_id: row.patient_id,
                    patient_name: match (row.patient_first_name, row.patient_last_name) {
                        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
                        _ => None,
                    },
                    lines: vec![line],
                }),
            }
        }

        Ok(history)
    }
}

/// Flat join row backing the sale history view.
#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    sale_id: String,
    created_at: DateTime<Utc>,
    total_cents: i64,
    patient_id: Option<String>,
    patient_first_name: Option<String>,
    patient_last_name: Option<String>,
    name_snapshot: String,
    presentation: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
}

/// A committed sale with its lines, ready for the history view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryEntry {
    pub sale_id: String,
    pub created_at: DateTime<Utc>,
    pub total_cents: i64,
    pub patient_id: Option<String>,
    /// Full patient name; None for anonymous customers.
    pub patient_name: Option<String>,
    pub lines: Vec<SaleHistoryLine>,
}

/// One line of the history view, denormalized for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryLine {
    pub medication_name: String,
    pub presentation: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
