//! Mock gateway identity for router tests.
//!
//! Services behind the gateway receive `x-showroom-user-id` and `x-showroom-user-role`
//! headers. `MockAuth` produces the same headers so tests need no gateway.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use showroom_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use showroom_domain::id::UserId;
use showroom_domain::user::UserRole;

/// Identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn admin(user_id: i32) -> Self {
        Self::new(UserId(user_id), UserRole::Admin)
    }

    pub fn customer(user_id: i32) -> Self {
        Self::new(UserId(user_id), UserRole::Customer)
    }

    /// Headers as the gateway would inject them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from(self.user_id.0),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from(u16::from(self.user_role.as_u8())),
        );
        map
    }
}
