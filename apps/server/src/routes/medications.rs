//! Medication routes: inventory listing and registration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use farma_core::validation::{validate_name, validate_price_cents, validate_stock};
use farma_core::Medication;
use farma_db::repository::medication::generate_medication_id;

use crate::error::ApiError;
use crate::routes::AppState;

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicationRequest {
    pub name: String,
    pub active_ingredient: Option<String>,
    pub manufacturer: Option<String>,
    pub presentation: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationResponse {
    pub id: String,
    pub name: String,
    pub active_ingredient: Option<String>,
    pub manufacturer: Option<String>,
    pub presentation: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Medication> for MedicationResponse {
    fn from(m: Medication) -> Self {
        MedicationResponse {
            id: m.id,
            name: m.name,
            active_ingredient: m.active_ingredient,
            manufacturer: m.manufacturer,
            presentation: m.presentation,
            price_cents: m.price_cents,
            stock: m.stock,
            expires_on: m.expires_on,
            created_at: m.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /medications
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<MedicationResponse>>, ApiError> {
    let medications = state.db.medications().list().await?;
    Ok(Json(medications.into_iter().map(Into::into).collect()))
}

/// GET /medications/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MedicationResponse>, ApiError> {
    let medication = state
        .db
        .medications()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Medication not found: {}", id)))?;

    Ok(Json(medication.into()))
}

/// POST /medications
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateMedicationRequest>,
) -> Result<(StatusCode, Json<MedicationResponse>), ApiError> {
    validate_name(&request.name)?;
    validate_price_cents(request.price_cents)?;
    validate_stock(request.stock)?;

    let now = Utc::now();
    let medication = Medication {
        id: generate_medication_id(),
        name: request.name,
        active_ingredient: request.active_ingredient,
        manufacturer: request.manufacturer,
        presentation: request.presentation,
        price_cents: request.price_cents,
        stock: request.stock,
        expires_on: request.expires_on,
        created_at: now,
        updated_at: now,
    };

    state.db.medications().insert(&medication).await?;

    Ok((StatusCode::CREATED, Json(medication.into())))
}
