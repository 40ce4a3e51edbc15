//! Patient routes: registration and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use farma_core::validation::{validate_name, validate_national_id};
use farma_core::Patient;
use farma_db::repository::patient::generate_patient_id;

use crate::error::ApiError;
use crate::routes::AppState;

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        PatientResponse {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            national_id: p.national_id,
            birth_date: p.birth_date,
            address: p.address,
            phone: p.phone,
            email: p.email,
            medical_history: p.medical_history,
            created_at: p.created_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /patients
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = state.db.patients().list().await?;
    Ok(Json(patients.into_iter().map(Into::into).collect()))
}

/// POST /patients
///
/// A duplicate national id maps to 409 via the unique violation.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    validate_name(&request.first_name)?;
    validate_name(&request.last_name)?;
    validate_national_id(&request.national_id)?;

    let patient = Patient {
        id: generate_patient_id(),
        first_name: request.first_name,
        last_name: request.last_name,
        national_id: request.national_id,
        birth_date: request.birth_date,
        address: request.address,
        phone: request.phone,
        email: request.email,
        medical_history: request.medical_history,
        created_at: Utc::now(),
    };

    state.db.patients().insert(&patient).await?;

    Ok((StatusCode::CREATED, Json(patient.into())))
}
