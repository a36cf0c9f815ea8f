//! One-time code domain types.

use serde::{Deserialize, Serialize};

/// What a one-time code authorizes.
///
/// Wire and storage format: `u8` (1 = Register, 2 = Login, 3 = Purchase, 4 = UpdateResource).
/// Only `Purchase` codes carry a resource binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Register = 1,
    Login = 2,
    Purchase = 3,
    UpdateResource = 4,
}

impl OtpPurpose {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Register),
            2 => Some(Self::Login),
            3 => Some(Self::Purchase),
            4 => Some(Self::UpdateResource),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether codes for this purpose are tied to a specific resource id.
    pub fn binds_resource(self) -> bool {
        matches!(self, Self::Purchase)
    }
}
