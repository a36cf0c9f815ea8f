#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use showroom_domain::id::{OtpTokenId, PurchaseRequestId, UserId, VehicleId};
use showroom_domain::purchase::PurchaseStatus;

use crate::domain::types::{
    Account, CustomerSummary, NewOtpToken, NewPurchaseRequest, NewSale, OtpQuery, OtpToken,
    PendingRequestEntry, PurchaseRequest, Sale, SaleHistoryEntry, Vehicle,
};
use crate::error::PurchaseServiceError;

/// Resolves caller identities to stored accounts.
pub trait UserDirectory: Send + Sync {
    async fn find_account(&self, id: UserId) -> Result<Option<Account>, PurchaseServiceError>;

    /// All customer accounts, by id.
    async fn list_customers(&self) -> Result<Vec<CustomerSummary>, PurchaseServiceError>;
}

/// Storage for one-time codes. Rows are never deleted.
pub trait OtpStore: Send + Sync {
    async fn insert_otp(&self, token: &NewOtpToken) -> Result<OtpToken, PurchaseServiceError>;

    /// Newest unconsumed token with `expires_at >= now` matching subject, purpose and code,
    /// and the resource binding when the purpose carries one.
    async fn find_latest_otp(
        &self,
        query: &OtpQuery,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpToken>, PurchaseServiceError>;

    /// Flip `consumed` only if it is still false. Returns `false` when another caller won.
    async fn consume_otp(&self, id: OtpTokenId) -> Result<bool, PurchaseServiceError>;
}

/// Vehicle availability.
pub trait InventoryStore: Send + Sync {
    async fn find_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, PurchaseServiceError>;

    /// Conditional `available → sold`. Returns `false` when the vehicle is missing or already sold.
    async fn mark_vehicle_sold(&self, id: VehicleId) -> Result<bool, PurchaseServiceError>;
}

pub trait PurchaseRequestStore: Send + Sync {
    async fn has_pending_request(
        &self,
        customer_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<bool, PurchaseServiceError>;

    /// Insert a pending request. Fails with `Conflict` when the pending-uniqueness index rejects it.
    async fn insert_request(
        &self,
        request: &NewPurchaseRequest,
    ) -> Result<PurchaseRequest, PurchaseServiceError>;

    async fn find_request(
        &self,
        id: PurchaseRequestId,
    ) -> Result<Option<PurchaseRequest>, PurchaseServiceError>;

    /// Conditional `Pending → status`. Returns `false` when the request is no longer pending.
    async fn decide_request(
        &self,
        id: PurchaseRequestId,
        status: PurchaseStatus,
    ) -> Result<bool, PurchaseServiceError>;

    /// Pending requests, oldest first.
    async fn list_pending(&self) -> Result<Vec<PendingRequestEntry>, PurchaseServiceError>;
}

/// Append-only sale ledger.
pub trait SaleStore: Send + Sync {
    /// Fails with `VehicleUnavailable` when a sale already exists for the vehicle.
    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, PurchaseServiceError>;

    /// Sales for one customer, newest first.
    async fn history_for(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<SaleHistoryEntry>, PurchaseServiceError>;
}

/// Every store, scoped to one transaction.
///
/// Dropping a unit of work without calling `commit` discards its effects.
pub trait UnitOfWork:
    UserDirectory + OtpStore + InventoryStore + PurchaseRequestStore + SaleStore
{
    async fn commit(self) -> Result<(), PurchaseServiceError>;
    async fn rollback(self) -> Result<(), PurchaseServiceError>;
}

/// Source of units of work.
pub trait TransactionalStore: Send + Sync {
    type Tx: UnitOfWork;

    async fn begin(&self) -> Result<Self::Tx, PurchaseServiceError>;
}
