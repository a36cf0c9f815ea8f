pub mod admin;
pub mod otp;
pub mod purchase;

use showroom_auth_types::identity::IdentityHeaders;
use showroom_domain::id::UserId;
use showroom_domain::user::UserRole;

use crate::error::PurchaseServiceError;

/// 403 unless the gateway identity carries `role`.
fn require_role(
    identity: &IdentityHeaders,
    role: UserRole,
) -> Result<UserId, PurchaseServiceError> {
    if identity.has_role(role) {
        Ok(identity.user_id)
    } else {
        Err(PurchaseServiceError::Forbidden)
    }
}
