use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use showroom_core::health::{database_ready, healthz};
use showroom_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    admin::{approve_request, get_pending_requests, list_customers, reject_request},
    otp::{issue_otp, verify_otp},
    purchase::{create_purchase_request, get_purchase_history},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // One-time codes
        .route("/otp", post(issue_otp))
        .route("/otp/verify", post(verify_otp))
        // Customer purchases
        .route("/purchases/requests", post(create_purchase_request))
        .route("/purchases/history", get(get_purchase_history))
        // Admin review
        .route("/admin/customers", get(list_customers))
        .route("/admin/purchase-requests", get(get_pending_requests))
        .route("/admin/purchase-requests/{id}/approve", post(approve_request))
        .route("/admin/purchase-requests/{id}/reject", post(reject_request))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
