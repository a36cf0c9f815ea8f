//! Service plumbing shared by every Showroom binary: tracing setup, env config,
//! health probes, request-id middleware and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
