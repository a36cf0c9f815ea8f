use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::infra::db::DbRepository;
use crate::usecase::otp::OtpLedger;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub otp_ttl: Duration,
    /// Echo issued codes in responses (non-production).
    pub otp_expose_codes: bool,
}

impl AppState {
    pub fn repo(&self) -> DbRepository {
        DbRepository {
            conn: self.db.clone(),
        }
    }

    pub fn otp_ledger(&self) -> OtpLedger<DbRepository> {
        OtpLedger {
            store: self.repo(),
            ttl: self.otp_ttl,
        }
    }
}
