use chrono::{DateTime, Utc};

use showroom_domain::id::{PurchaseRequestId, SaleId, UserId, VehicleId};
use showroom_domain::otp::OtpPurpose;
use showroom_domain::purchase::PurchaseStatus;

use crate::domain::repository::{TransactionalStore, UnitOfWork};
use crate::domain::types::{NewPurchaseRequest, NewSale};
use crate::error::PurchaseServiceError;
use crate::usecase::otp::{otp_query, verify_otp};

/// Commit `tx` when `result` is `Ok`, otherwise roll it back and hand back the error.
async fn finish<Tx, T>(
    tx: Tx,
    result: Result<T, PurchaseServiceError>,
) -> Result<T, PurchaseServiceError>
where
    Tx: UnitOfWork,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    }
}

// ── CreatePurchaseRequest ────────────────────────────────────────────────────

pub struct CreatePurchaseRequestInput {
    pub customer_id: UserId,
    pub vehicle_id: VehicleId,
    pub otp_code: String,
}

#[derive(Debug, Clone)]
pub struct CreatedPurchaseRequest {
    pub request_id: PurchaseRequestId,
    pub vehicle_id: VehicleId,
    pub requested_at: DateTime<Utc>,
}

pub struct CreatePurchaseRequestUseCase<T: TransactionalStore> {
    pub store: T,
}

impl<T: TransactionalStore> CreatePurchaseRequestUseCase<T> {
    /// Consume a purchase code bound to the vehicle and open a pending request.
    ///
    /// Code consumption and request creation commit together; a failure at any step
    /// leaves the code unconsumed.
    pub async fn execute(
        &self,
        input: CreatePurchaseRequestInput,
    ) -> Result<CreatedPurchaseRequest, PurchaseServiceError> {
        if !input.customer_id.is_valid() || !input.vehicle_id.is_valid() {
            return Err(PurchaseServiceError::InvalidInput("ids must be positive"));
        }
        let otp_code = input.otp_code.trim();
        if otp_code.is_empty() {
            return Err(PurchaseServiceError::InvalidInput("otp code is required"));
        }

        let tx = self.store.begin().await?;
        let result = create_in(&tx, input.customer_id, input.vehicle_id, otp_code).await;
        let created = finish(tx, result).await?;

        tracing::info!(
            request_id = %created.request_id,
            vehicle_id = %created.vehicle_id,
            customer_id = %input.customer_id,
            "purchase request created"
        );
        Ok(created)
    }
}

async fn create_in<Tx: UnitOfWork>(
    tx: &Tx,
    customer_id: UserId,
    vehicle_id: VehicleId,
    otp_code: &str,
) -> Result<CreatedPurchaseRequest, PurchaseServiceError> {
    let account = tx
        .find_account(customer_id)
        .await?
        .ok_or(PurchaseServiceError::NotAuthorized)?;

    if tx.has_pending_request(customer_id, vehicle_id).await? {
        return Err(PurchaseServiceError::Conflict);
    }

    let query = otp_query(&account.email, OtpPurpose::Purchase, otp_code, Some(vehicle_id.0));
    let now = Utc::now();
    if !verify_otp(tx, &query, true, now).await? {
        return Err(PurchaseServiceError::InvalidOtp);
    }

    let vehicle = tx
        .find_vehicle(vehicle_id)
        .await?
        .filter(|v| v.is_available)
        .ok_or(PurchaseServiceError::VehicleUnavailable)?;

    let request = tx
        .insert_request(&NewPurchaseRequest {
            vehicle_id: vehicle.id,
            customer_id,
            requested_at: now,
        })
        .await?;

    Ok(CreatedPurchaseRequest {
        request_id: request.id,
        vehicle_id: request.vehicle_id,
        requested_at: request.requested_at,
    })
}

// ── ApprovePurchaseRequest ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ApprovedSale {
    pub sale_id: SaleId,
    pub vehicle_id: VehicleId,
    pub customer_id: UserId,
    pub price: i64,
    pub sold_at: DateTime<Utc>,
}

pub struct ApprovePurchaseRequestUseCase<T: TransactionalStore> {
    pub store: T,
}

impl<T: TransactionalStore> ApprovePurchaseRequestUseCase<T> {
    /// Approve a pending request: mark it approved, take the vehicle off sale and record the sale.
    ///
    /// The vehicle flip is a conditional update, so of two approvals touching the same
    /// vehicle exactly one proceeds; the loser sees `VehicleUnavailable` and nothing of
    /// its transaction persists.
    pub async fn execute(
        &self,
        request_id: PurchaseRequestId,
    ) -> Result<ApprovedSale, PurchaseServiceError> {
        if !request_id.is_valid() {
            return Err(PurchaseServiceError::InvalidInput("ids must be positive"));
        }

        let tx = self.store.begin().await?;
        let result = approve_in(&tx, request_id).await;
        let sale = finish(tx, result).await?;

        tracing::info!(
            request_id = %request_id,
            sale_id = %sale.sale_id,
            vehicle_id = %sale.vehicle_id,
            price = sale.price,
            "purchase request approved"
        );
        Ok(sale)
    }
}

async fn approve_in<Tx: UnitOfWork>(
    tx: &Tx,
    request_id: PurchaseRequestId,
) -> Result<ApprovedSale, PurchaseServiceError> {
    let request = tx
        .find_request(request_id)
        .await?
        .ok_or(PurchaseServiceError::NotFound)?;
    if !request.status.can_transition_to(PurchaseStatus::Approved) {
        return Err(PurchaseServiceError::AlreadyDecided);
    }

    if !tx.decide_request(request_id, PurchaseStatus::Approved).await? {
        return Err(PurchaseServiceError::AlreadyDecided);
    }

    if !tx.mark_vehicle_sold(request.vehicle_id).await? {
        return Err(PurchaseServiceError::VehicleUnavailable);
    }

    let vehicle = tx
        .find_vehicle(request.vehicle_id)
        .await?
        .ok_or(PurchaseServiceError::VehicleUnavailable)?;

    let sale = tx
        .insert_sale(&NewSale {
            vehicle_id: vehicle.id,
            customer_id: request.customer_id,
            price: vehicle.price,
            sold_at: Utc::now(),
        })
        .await?;

    Ok(ApprovedSale {
        sale_id: sale.id,
        vehicle_id: sale.vehicle_id,
        customer_id: sale.customer_id,
        price: sale.price,
        sold_at: sale.sold_at,
    })
}

// ── RejectPurchaseRequest ────────────────────────────────────────────────────

pub struct RejectPurchaseRequestUseCase<T: TransactionalStore> {
    pub store: T,
}

impl<T: TransactionalStore> RejectPurchaseRequestUseCase<T> {
    /// Close a pending request without touching the vehicle.
    pub async fn execute(&self, request_id: PurchaseRequestId) -> Result<(), PurchaseServiceError> {
        if !request_id.is_valid() {
            return Err(PurchaseServiceError::InvalidInput("ids must be positive"));
        }

        let tx = self.store.begin().await?;
        let result = reject_in(&tx, request_id).await;
        finish(tx, result).await?;

        tracing::info!(request_id = %request_id, "purchase request rejected");
        Ok(())
    }
}

async fn reject_in<Tx: UnitOfWork>(
    tx: &Tx,
    request_id: PurchaseRequestId,
) -> Result<(), PurchaseServiceError> {
    let request = tx
        .find_request(request_id)
        .await?
        .ok_or(PurchaseServiceError::NotFound)?;
    if !request.status.can_transition_to(PurchaseStatus::Rejected) {
        return Err(PurchaseServiceError::AlreadyDecided);
    }
    if !tx.decide_request(request_id, PurchaseStatus::Rejected).await? {
        return Err(PurchaseServiceError::AlreadyDecided);
    }
    Ok(())
}
