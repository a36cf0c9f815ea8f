//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;

use showroom_domain::id::UserId;
use showroom_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-showroom-user-id";
pub const USER_ROLE_HEADER: &str = "x-showroom-user-role";

/// Caller identity injected by the gateway via `x-showroom-user-id` and `x-showroom-user-role`.
///
/// Returns 401 if either header is absent or unparsable, or the role value is unknown.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub user_role: UserRole,
}

impl IdentityHeaders {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.user_role == role
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares `fn -> impl Future + Send`; header values are read
    // synchronously so the returned future borrows nothing from `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<UserId>().ok())
            .filter(|id| id.is_valid());

        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(UserRole::from_u8);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let user_role = user_role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id, user_role })
        }
    }
}
