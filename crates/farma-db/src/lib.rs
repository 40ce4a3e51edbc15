//! # farma-db: Database Layer for FarmaPOS
//!
//! This crate provides database access for the FarmaPOS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FarmaPOS Data Flow                               │
//! │                                                                         │
//! │  axum route (POST /sales)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     farma-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │ (medication,  │    │  (embedded)  │   │   │
//! │  │   │               │    │  patient,     │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│  supplier,    │    │ 001_init.sql │   │   │
//! │  │   │ Connection    │    │  sale)        │    │              │   │   │
//! │  │   │ Management    │    │               │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sale transaction, the one piece of this system where correctness
//! invariants matter, lives in [`repository::sale`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use farma_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/farma.db")).await?;
//! let sale = db.sales().register_sale(None, &lines).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::medication::MedicationRepository;
pub use repository::patient::PatientRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
