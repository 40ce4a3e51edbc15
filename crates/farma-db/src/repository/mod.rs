//! # Repository Module
//!
//! Repository implementations for database access, one per entity.
//!
//! ## Repository Pattern
//! Each repository wraps the connection pool and exposes typed operations.
//! The only multi-statement unit of work in the system is
//! [`sale::SaleRepository::register_sale`]; everything else is single-query
//! CRUD.

pub mod medication;
pub mod patient;
pub mod sale;
pub mod supplier;
