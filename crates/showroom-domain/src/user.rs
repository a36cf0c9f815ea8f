//! Account domain types.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Wire format: `u8` (1 = Admin, 2 = Customer), carried in the gateway's
/// `x-showroom-user-role` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin = 1,
    Customer = 2,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Admin),
            2 => Some(Self::Customer),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
