use chrono::{DateTime, Utc};

use showroom_domain::id::{OtpTokenId, PurchaseRequestId, SaleId, UserId, VehicleId};
use showroom_domain::otp::OtpPurpose;
use showroom_domain::purchase::PurchaseStatus;
use showroom_domain::user::UserRole;

/// Stored account as resolved by the user directory.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

/// Inventory record.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Smallest currency unit.
    pub price: i64,
    pub color: Option<String>,
    pub description: Option<String>,
    pub is_available: bool,
}

/// Issued one-time code.
#[derive(Debug, Clone)]
pub struct OtpToken {
    pub id: OtpTokenId,
    pub subject: String,
    pub purpose: OtpPurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    /// Set only for purposes that bind a resource.
    pub resource_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl OtpToken {
    /// Live tokens are unconsumed and not yet past `expires_at` (inclusive).
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && self.expires_at >= now
    }
}

#[derive(Debug, Clone)]
pub struct NewOtpToken {
    pub subject: String,
    pub purpose: OtpPurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub resource_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Lookup key for validation. `subject` is already normalized.
#[derive(Debug, Clone)]
pub struct OtpQuery {
    pub subject: String,
    pub purpose: OtpPurpose,
    pub code: String,
    /// Compared only when `purpose` binds a resource.
    pub resource_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub id: PurchaseRequestId,
    pub vehicle_id: VehicleId,
    pub customer_id: UserId,
    pub status: PurchaseStatus,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPurchaseRequest {
    pub vehicle_id: VehicleId,
    pub customer_id: UserId,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Sale {
    pub id: SaleId,
    pub vehicle_id: VehicleId,
    pub customer_id: UserId,
    pub price: i64,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub vehicle_id: VehicleId,
    pub customer_id: UserId,
    pub price: i64,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSummary {
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDetail {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: i64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}

/// One row of a customer's purchase history, newest first.
#[derive(Debug, Clone)]
pub struct SaleHistoryEntry {
    pub sale_id: SaleId,
    pub sold_at: DateTime<Utc>,
    pub price: i64,
    pub vehicle: VehicleSummary,
}

/// One row of the admin review queue, oldest first.
#[derive(Debug, Clone)]
pub struct PendingRequestEntry {
    pub request_id: PurchaseRequestId,
    pub requested_at: DateTime<Utc>,
    pub vehicle: VehicleDetail,
    pub customer: CustomerSummary,
}

/// Inclusive bounds of generated one-time codes (always six digits).
pub const OTP_CODE_MIN: u32 = 100_000;
pub const OTP_CODE_MAX: u32 = 999_999;

/// Default one-time code lifetime in seconds.
pub const DEFAULT_OTP_TTL_SECS: u64 = 120;
