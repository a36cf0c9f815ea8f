//! sea-orm entities for the purchase service database.

pub mod otp_tokens;
pub mod purchase_requests;
pub mod sales;
pub mod users;
pub mod vehicles;
