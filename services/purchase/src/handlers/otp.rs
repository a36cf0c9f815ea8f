use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use showroom_domain::otp::OtpPurpose;

use crate::error::PurchaseServiceError;
use crate::state::AppState;
use crate::usecase::otp::{IssueOtpInput, ValidateOtpInput};

// ── POST /otp ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueOtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
    pub resource_id: Option<i32>,
}

#[derive(Serialize)]
pub struct IssueOtpResponse {
    #[serde(serialize_with = "showroom_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

pub async fn issue_otp(
    State(state): State<AppState>,
    Json(body): Json<IssueOtpRequest>,
) -> Result<(StatusCode, Json<IssueOtpResponse>), PurchaseServiceError> {
    let issued = state
        .otp_ledger()
        .issue(IssueOtpInput {
            subject: body.email,
            purpose: body.purpose,
            resource_id: body.resource_id,
        })
        .await?;
    let code = state.otp_expose_codes.then_some(issued.code);
    Ok((
        StatusCode::CREATED,
        Json(IssueOtpResponse {
            expires_at: issued.expires_at,
            code,
        }),
    ))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

fn default_consume() -> bool {
    true
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code: String,
    pub resource_id: Option<i32>,
    #[serde(default = "default_consume")]
    pub consume: bool,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub valid: bool,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, PurchaseServiceError> {
    let code = body.code.trim();
    if code.is_empty() {
        return Err(PurchaseServiceError::InvalidInput("otp code is required"));
    }
    let valid = state
        .otp_ledger()
        .validate(ValidateOtpInput {
            subject: body.email,
            purpose: body.purpose,
            code: code.to_owned(),
            resource_id: body.resource_id,
            consume: body.consume,
        })
        .await?;
    Ok(Json(VerifyOtpResponse { valid }))
}
