pub mod otp;
pub mod purchase;
pub mod sale;
