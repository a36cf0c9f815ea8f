//! Domain types shared across Showroom services.
//!
//! Pure types with no framework dependencies: identifiers and the small
//! integer-backed enums persisted in the database and sent over the wire.

pub mod id;
pub mod otp;
pub mod purchase;
pub mod user;
