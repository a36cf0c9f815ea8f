//! Identity passed from the gateway to Showroom services.
//!
//! Token issuance and verification happen at the gateway; services only read
//! the headers it injects through the `IdentityHeaders` extractor.

pub mod identity;
