//! Purchase request lifecycle.

use serde::{Deserialize, Serialize};

/// Status of a purchase request. `Pending` is the only non-terminal state.
///
/// Storage format: `u8` (0 = Pending, 1 = Approved, 2 = Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl PurchaseStatus {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Allowed transitions: Pending → Approved, Pending → Rejected.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}
