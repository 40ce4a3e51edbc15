//! # Route Layer
//!
//! HTTP surface of FarmaPOS, one module per resource.
//!
//! ## Endpoints
//! ```text
//! GET  /health              liveness + database reachability
//! GET  /medications         list inventory
//! POST /medications         register a medication
//! GET  /medications/{id}    single medication
//! GET  /patients            list patients
//! POST /patients            register a patient
//! GET  /suppliers           list suppliers
//! POST /suppliers           register a supplier
//! POST /sales               register a sale (the core transaction)
//! GET  /sales/history       committed sales with lines and patient names
//! ```
//!
//! Request and response bodies are camelCase JSON; the route modules own the
//! wire DTOs and map them to the domain types.

pub mod medications;
pub mod patients;
pub mod sales;
pub mod suppliers;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use farma_db::Database;

use crate::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/medications",
            get(medications::list).post(medications::create),
        )
        .route("/medications/{id}", get(medications::get_one))
        .route("/patients", get(patients::list).post(patients::create))
        .route("/suppliers", get(suppliers::list).post(suppliers::create))
        .route("/sales", axum::routing::post(sales::create))
        .route("/sales/history", get(sales::history))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe; fails if the database is unreachable.
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.db.health_check().await {
        return Err(ApiError::Db(farma_db::DbError::ConnectionFailed(
            "health check query failed".to_string(),
        )));
    }
    Ok(Json(HealthResponse { status: "ok" }))
}
