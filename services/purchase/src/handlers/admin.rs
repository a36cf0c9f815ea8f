use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use showroom_auth_types::identity::IdentityHeaders;
use showroom_domain::id::PurchaseRequestId;
use showroom_domain::user::UserRole;

use crate::domain::types::CustomerSummary;
use crate::error::PurchaseServiceError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::purchase::{ApprovePurchaseRequestUseCase, RejectPurchaseRequestUseCase};
use crate::usecase::sale::{GetPendingRequestsUseCase, ListCustomersUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
}

impl From<CustomerSummary> for CustomerResponse {
    fn from(customer: CustomerSummary) -> Self {
        Self {
            id: customer.id.0,
            email: customer.email,
            full_name: customer.full_name,
        }
    }
}

#[derive(Serialize)]
pub struct PendingVehicleResponse {
    pub id: i32,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: i64,
    pub color: Option<String>,
}

#[derive(Serialize)]
pub struct PendingRequestResponse {
    pub request_id: i32,
    #[serde(serialize_with = "showroom_core::serde::to_rfc3339_ms")]
    pub requested_at: chrono::DateTime<chrono::Utc>,
    pub vehicle: PendingVehicleResponse,
    pub customer: CustomerResponse,
}

#[derive(Serialize)]
pub struct ApprovedSaleResponse {
    pub sale_id: i32,
}

// ── GET /admin/customers ─────────────────────────────────────────────────────

pub async fn list_customers(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, PurchaseServiceError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = ListCustomersUseCase {
        users: state.repo(),
    };
    let customers = usecase.execute().await?;
    Ok(Json(customers.into_iter().map(CustomerResponse::from).collect()))
}

// ── GET /admin/purchase-requests ─────────────────────────────────────────────

pub async fn get_pending_requests(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingRequestResponse>>, PurchaseServiceError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = GetPendingRequestsUseCase {
        requests: state.repo(),
    };
    let pending = usecase.execute().await?;
    let items = pending
        .into_iter()
        .map(|entry| PendingRequestResponse {
            request_id: entry.request_id.0,
            requested_at: entry.requested_at,
            vehicle: PendingVehicleResponse {
                id: entry.vehicle.id.0,
                make: entry.vehicle.make,
                model: entry.vehicle.model,
                year: entry.vehicle.year,
                price: entry.vehicle.price,
                color: entry.vehicle.color,
            },
            customer: entry.customer.into(),
        })
        .collect();
    Ok(Json(items))
}

// ── POST /admin/purchase-requests/{id}/approve ───────────────────────────────

pub async fn approve_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(request_id): Path<PurchaseRequestId>,
) -> Result<(StatusCode, Json<ApprovedSaleResponse>), PurchaseServiceError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = ApprovePurchaseRequestUseCase {
        store: state.repo(),
    };
    let sale = usecase.execute(request_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovedSaleResponse {
            sale_id: sale.sale_id.0,
        }),
    ))
}

// ── POST /admin/purchase-requests/{id}/reject ────────────────────────────────

pub async fn reject_request(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(request_id): Path<PurchaseRequestId>,
) -> Result<StatusCode, PurchaseServiceError> {
    require_role(&identity, UserRole::Admin)?;
    let usecase = RejectPurchaseRequestUseCase {
        store: state.repo(),
    };
    usecase.execute(request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
