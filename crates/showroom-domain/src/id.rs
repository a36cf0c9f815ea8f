//! Newtype wrappers for integer primary keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Database keys start at 1; zero and negatives never name a row.
            pub fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

integer_id!(
    /// Identifies an account (customer or admin).
    UserId
);
integer_id!(
    /// Identifies a vehicle in inventory.
    VehicleId
);
integer_id!(
    /// Identifies an issued one-time code.
    OtpTokenId
);
integer_id!(
    /// Identifies a customer's purchase request.
    PurchaseRequestId
);
integer_id!(
    /// Identifies a completed sale.
    SaleId
);
