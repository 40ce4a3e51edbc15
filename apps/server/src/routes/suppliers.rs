//! Supplier routes: registration and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farma_core::validation::validate_name;
use farma_core::Supplier;
use farma_db::repository::supplier::generate_supplier_id;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResponse {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        SupplierResponse {
            id: s.id,
            name: s.name,
            contact: s.contact,
            phone: s.phone,
            email: s.email,
            created_at: s.created_at,
        }
    }
}

/// GET /suppliers
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SupplierResponse>>, ApiError> {
    let suppliers = state.db.suppliers().list().await?;
    Ok(Json(suppliers.into_iter().map(Into::into).collect()))
}

/// POST /suppliers
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<SupplierResponse>), ApiError> {
    validate_name(&request.name)?;

    let supplier = Supplier {
        id: generate_supplier_id(),
        name: request.name,
        contact: request.contact,
        phone: request.phone,
        email: request.email,
        created_at: Utc::now(),
    };

    state.db.suppliers().insert(&supplier).await?;

    Ok((StatusCode::CREATED, Json(supplier.into())))
}
