use anyhow::ensure;
use chrono::Duration;
use serde::Deserialize;
use showroom_core::config::Config;

/// Purchase service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseConfig {
    /// Database connection URL (PostgreSQL in production). Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `PURCHASE_PORT`.
    #[serde(default = "default_port")]
    pub purchase_port: u16,
    /// Lifetime of issued one-time codes in seconds (default 120). Env var: `OTP_TTL_SECS`.
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
    /// Echo issued codes in the HTTP response. Non-production only. Env var: `OTP_EXPOSE_CODES`.
    #[serde(default)]
    pub otp_expose_codes: bool,
}

fn default_port() -> u16 {
    3114
}

fn default_otp_ttl_secs() -> u64 {
    120
}

impl Config for PurchaseConfig {}

/// Upper bound for `OTP_TTL_SECS`: one day.
pub const MAX_OTP_TTL_SECS: u64 = 86_400;

impl PurchaseConfig {
    /// Code lifetime, rejected at startup when zero or longer than [`MAX_OTP_TTL_SECS`].
    pub fn otp_ttl(&self) -> anyhow::Result<Duration> {
        ensure!(
            (1..=MAX_OTP_TTL_SECS).contains(&self.otp_ttl_secs),
            "OTP_TTL_SECS must be between 1 and {MAX_OTP_TTL_SECS}, got {}",
            self.otp_ttl_secs
        );
        Ok(Duration::seconds(self.otp_ttl_secs as i64))
    }
}
