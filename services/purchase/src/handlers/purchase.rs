use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use showroom_auth_types::identity::IdentityHeaders;
use showroom_domain::id::VehicleId;
use showroom_domain::user::UserRole;

use crate::error::PurchaseServiceError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::purchase::{CreatePurchaseRequestInput, CreatePurchaseRequestUseCase};
use crate::usecase::sale::GetPurchaseHistoryUseCase;

// ── POST /purchases/requests ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePurchaseRequestBody {
    pub vehicle_id: i32,
    pub otp_code: String,
}

#[derive(Serialize)]
pub struct CreatedPurchaseRequestResponse {
    pub request_id: i32,
    pub vehicle_id: i32,
    #[serde(serialize_with = "showroom_core::serde::to_rfc3339_ms")]
    pub requested_at: chrono::DateTime<chrono::Utc>,
}

pub async fn create_purchase_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreatePurchaseRequestBody>,
) -> Result<(StatusCode, Json<CreatedPurchaseRequestResponse>), PurchaseServiceError> {
    let customer_id = require_role(&identity, UserRole::Customer)?;
    let usecase = CreatePurchaseRequestUseCase {
        store: state.repo(),
    };
    let created = usecase
        .execute(CreatePurchaseRequestInput {
            customer_id,
            vehicle_id: VehicleId(body.vehicle_id),
            otp_code: body.otp_code,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedPurchaseRequestResponse {
            request_id: created.request_id.0,
            vehicle_id: created.vehicle_id.0,
            requested_at: created.requested_at,
        }),
    ))
}

// ── GET /purchases/history ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VehicleSummaryResponse {
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Serialize)]
pub struct SaleHistoryResponse {
    pub sale_id: i32,
    #[serde(serialize_with = "showroom_core::serde::to_rfc3339_ms")]
    pub sold_at: chrono::DateTime<chrono::Utc>,
    pub price: i64,
    pub vehicle: VehicleSummaryResponse,
}

pub async fn get_purchase_history(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleHistoryResponse>>, PurchaseServiceError> {
    let customer_id = require_role(&identity, UserRole::Customer)?;
    let usecase = GetPurchaseHistoryUseCase {
        users: state.repo(),
        sales: state.repo(),
    };
    let history = usecase.execute(customer_id).await?;
    let items = history
        .into_iter()
        .map(|entry| SaleHistoryResponse {
            sale_id: entry.sale_id.0,
            sold_at: entry.sold_at,
            price: entry.price,
            vehicle: VehicleSummaryResponse {
                make: entry.vehicle.make,
                model: entry.vehicle.model,
                year: entry.vehicle.year,
            },
        })
        .collect();
    Ok(Json(items))
}
