//! Sale routes: registration and history.
//!
//! `POST /sales` is a thin shell around the sale transaction in farma-db; it
//! maps the wire DTO to line requests and the outcome to a status code. All
//! correctness invariants live below this layer.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use farma_core::validation::validate_uuid;
use farma_core::{RegisteredSale, SaleLineRequest};
use farma_db::repository::sale::SaleHistoryEntry;

use crate::error::ApiError;
use crate::routes::AppState;

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    /// Optional patient reference; absent for anonymous walk-in sales.
    #[serde(default)]
    pub patient_id: Option<String>,
    pub lines: Vec<SaleLineDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub medication_id: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale_id: String,
    pub sale_date: DateTime<Utc>,
    pub total_cents: i64,
}

impl From<RegisteredSale> for SaleResponse {
    fn from(sale: RegisteredSale) -> Self {
        SaleResponse {
            sale_id: sale.sale_id,
            sale_date: sale.created_at,
            total_cents: sale.total_cents,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /sales
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    // A malformed patient reference is a caller mistake, not a store-level
    // transaction failure; reject it before the unit of work starts.
    if let Some(ref patient_id) = request.patient_id {
        validate_uuid(patient_id)?;
    }

    let lines: Vec<SaleLineRequest> = request
        .lines
        .into_iter()
        .map(|l| SaleLineRequest {
            medication_id: l.medication_id,
            quantity: l.quantity,
        })
        .collect();

    let sale = state
        .db
        .sales()
        .register_sale(request.patient_id.as_deref(), &lines)
        .await?;

    info!(sale_id = %sale.sale_id, "Sale accepted");

    Ok((StatusCode::CREATED, Json(sale.into())))
}

/// GET /sales/history
pub async fn history(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleHistoryEntry>>, ApiError> {
    let history = state.db.sales().list_history().await?;
    Ok(Json(history))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use farma_core::{Medication, SaleError};
    use farma_db::repository::medication::generate_medication_id;
    use farma_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        AppState {
            db: Database::new(DbConfig::in_memory()).await.unwrap(),
        }
    }

    async fn seed_medication(state: &AppState, name: &str, price_cents: i64, stock: i64) -> String {
        let now = Utc::now();
        let medication = Medication {
            id: generate_medication_id(),
            name: name.to_string(),
            active_ingredient: None,
            manufacturer: None,
            presentation: None,
            price_cents,
            stock,
            expires_on: None,
            created_at: now,
            updated_at: now,
        };
        state.db.medications().insert(&medication).await.unwrap();
        medication.id
    }

    fn request(medication_id: &str, quantity: i64) -> CreateSaleRequest {
        CreateSaleRequest {
            patient_id: None,
            lines: vec![SaleLineDto {
                medication_id: medication_id.to_string(),
                quantity,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_sale_returns_created() {
        let state = test_state().await;
        let med = seed_medication(&state, "Paracetamol", 500, 10).await;

        let (status, Json(body)) = create(State(state.clone()), Json(request(&med, 4)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.total_cents, 2000);
        assert!(!body.sale_id.is_empty());
    }

    #[tokio::test]
    async fn test_create_sale_empty_order_is_bad_request() {
        let state = test_state().await;

        let err = create(
            State(state),
            Json(CreateSaleRequest {
                patient_id: None,
                lines: vec![],
            }),
        )
        .await
        .unwrap_err();

        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "EMPTY_ORDER");
    }

    #[tokio::test]
    async fn test_create_sale_malformed_patient_id_is_bad_request() {
        let state = test_state().await;
        let med = seed_medication(&state, "Paracetamol", 500, 10).await;

        let err = create(
            State(state.clone()),
            Json(CreateSaleRequest {
                patient_id: Some("not-a-uuid".to_string()),
                lines: vec![SaleLineDto {
                    medication_id: med.clone(),
                    quantity: 1,
                }],
            }),
        )
        .await
        .unwrap_err();

        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_FAILED");

        // Rejected before the unit of work: nothing touched the store.
        let med = state.db.medications().get_by_id(&med).await.unwrap().unwrap();
        assert_eq!(med.stock, 10);
    }

    #[tokio::test]
    async fn test_create_sale_stock_conflict() {
        let state = test_state().await;
        let med = seed_medication(&state, "Insulin", 4200, 3).await;

        let err = create(State(state.clone()), Json(request(&med, 5)))
            .await
            .unwrap_err();

        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "INSUFFICIENT_STOCK");
        assert!(matches!(
            err,
            ApiError::Sale(SaleError::InsufficientStock { .. })
        ));
    }

    #[tokio::test]
    async fn test_history_after_sale() {
        let state = test_state().await;
        let med = seed_medication(&state, "Aspirin", 210, 10).await;

        create(State(state.clone()), Json(request(&med, 2)))
            .await
            .unwrap();

        let Json(history) = history(State(state)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_cents, 420);
        assert_eq!(history[0].lines[0].medication_name, "Aspirin");
    }

    #[test]
    fn test_sale_response_wire_shape() {
        let response = SaleResponse {
            sale_id: "abc".to_string(),
            sale_date: Utc::now(),
            total_cents: 1999,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("saleId").is_some());
        assert!(json.get("saleDate").is_some());
        assert_eq!(json["totalCents"], 1999);
    }
}
