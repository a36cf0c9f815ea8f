use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Purchase service error variants.
///
/// Every OTP mismatch (wrong code, purpose, binding, expired or consumed) collapses
/// into `InvalidOtp` so callers cannot tell which check failed.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("not authorized")]
    NotAuthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("pending request already exists")]
    Conflict,
    #[error("invalid or expired otp")]
    InvalidOtp,
    #[error("vehicle unavailable")]
    VehicleUnavailable,
    #[error("request already decided")]
    AlreadyDecided,
    #[error("service unavailable")]
    Unavailable(#[from] anyhow::Error),
}

impl PurchaseServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InvalidOtp => "INVALID_OTP",
            Self::VehicleUnavailable => "VEHICLE_UNAVAILABLE",
            Self::AlreadyDecided => "ALREADY_DECIDED",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidOtp => StatusCode::BAD_REQUEST,
            Self::NotAuthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict | Self::VehicleUnavailable | Self::AlreadyDecided => {
                StatusCode::CONFLICT
            }
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for PurchaseServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Business failures are expected outcomes; only storage failures carry a chain worth logging.
        if let Self::Unavailable(ref e) = self {
            tracing::error!(error = ?e, kind = "UNAVAILABLE", "storage failure");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
