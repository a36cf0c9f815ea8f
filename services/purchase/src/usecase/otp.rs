use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use rand::RngExt;

use showroom_domain::otp::OtpPurpose;

use crate::domain::repository::OtpStore;
use crate::domain::types::{NewOtpToken, OTP_CODE_MAX, OTP_CODE_MIN, OtpQuery};
use crate::error::PurchaseServiceError;

/// Uniformly random six-digit code.
pub fn generate_code() -> String {
    rand::rng()
        .random_range(OTP_CODE_MIN..=OTP_CODE_MAX)
        .to_string()
}

/// Subjects are compared trimmed and lower-cased.
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}

pub struct IssueOtpInput {
    pub subject: String,
    pub purpose: OtpPurpose,
    pub resource_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ValidateOtpInput {
    pub subject: String,
    pub purpose: OtpPurpose,
    pub code: String,
    pub resource_id: Option<i32>,
    pub consume: bool,
}

/// Issues and validates short-lived single-use codes.
pub struct OtpLedger<S: OtpStore> {
    pub store: S,
    pub ttl: Duration,
}

impl<S: OtpStore> OtpLedger<S> {
    /// Store a fresh code. Earlier live codes for the same key stay valid.
    ///
    /// The code is returned to the caller and never logged.
    pub async fn issue(&self, input: IssueOtpInput) -> Result<IssuedOtp, PurchaseServiceError> {
        let subject = normalize_subject(&input.subject);
        if subject.is_empty() {
            return Err(PurchaseServiceError::InvalidInput("subject is required"));
        }
        let resource_id = if input.purpose.binds_resource() {
            match input.resource_id {
                Some(id) if id > 0 => Some(id),
                _ => {
                    return Err(PurchaseServiceError::InvalidInput(
                        "resource id is required for this purpose",
                    ));
                }
            }
        } else {
            None
        };

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| anyhow!("otp ttl {} overflows the timestamp range", self.ttl))?;
        let token = self
            .store
            .insert_otp(&NewOtpToken {
                subject,
                purpose: input.purpose,
                code: generate_code(),
                expires_at,
                resource_id,
                created_at: now,
            })
            .await?;

        tracing::info!(
            subject = %token.subject,
            purpose = ?token.purpose,
            expires_at = %token.expires_at,
            resource_id = ?token.resource_id,
            "otp issued"
        );

        Ok(IssuedOtp {
            code: token.code,
            expires_at: token.expires_at,
        })
    }

    pub async fn validate(&self, input: ValidateOtpInput) -> Result<bool, PurchaseServiceError> {
        let query = otp_query(&input.subject, input.purpose, &input.code, input.resource_id);
        verify_otp(&self.store, &query, input.consume, Utc::now()).await
    }
}

/// Build a lookup key, dropping the resource id for purposes that do not bind one.
pub fn otp_query(
    subject: &str,
    purpose: OtpPurpose,
    code: &str,
    resource_id: Option<i32>,
) -> OtpQuery {
    OtpQuery {
        subject: normalize_subject(subject),
        purpose,
        code: code.to_owned(),
        resource_id: resource_id.filter(|_| purpose.binds_resource()),
    }
}

/// Check a code against `store` and optionally consume it.
///
/// Consumption is a conditional update, so of two concurrent callers holding the same
/// code at most one sees `true`. Also used inside purchase transactions, where `store`
/// is the unit of work.
pub async fn verify_otp<S: OtpStore>(
    store: &S,
    query: &OtpQuery,
    consume: bool,
    now: DateTime<Utc>,
) -> Result<bool, PurchaseServiceError> {
    if query.purpose.binds_resource() && query.resource_id.is_none() {
        return Ok(false);
    }
    let Some(token) = store.find_latest_otp(query, now).await? else {
        return Ok(false);
    };
    if !consume {
        return Ok(true);
    }
    store.consume_otp(token.id).await
}
