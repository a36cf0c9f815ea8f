use showroom_domain::id::UserId;

use crate::domain::repository::{PurchaseRequestStore, SaleStore, UserDirectory};
use crate::domain::types::{CustomerSummary, PendingRequestEntry, SaleHistoryEntry};
use crate::error::PurchaseServiceError;

// ── GetPurchaseHistory ───────────────────────────────────────────────────────

pub struct GetPurchaseHistoryUseCase<U: UserDirectory, S: SaleStore> {
    pub users: U,
    pub sales: S,
}

impl<U: UserDirectory, S: SaleStore> GetPurchaseHistoryUseCase<U, S> {
    pub async fn execute(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<SaleHistoryEntry>, PurchaseServiceError> {
        self.users
            .find_account(customer_id)
            .await?
            .ok_or(PurchaseServiceError::NotAuthorized)?;
        self.sales.history_for(customer_id).await
    }
}

// ── GetPendingRequests ───────────────────────────────────────────────────────

pub struct GetPendingRequestsUseCase<R: PurchaseRequestStore> {
    pub requests: R,
}

impl<R: PurchaseRequestStore> GetPendingRequestsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<PendingRequestEntry>, PurchaseServiceError> {
        self.requests.list_pending().await
    }
}

// ── ListCustomers ────────────────────────────────────────────────────────────

pub struct ListCustomersUseCase<U: UserDirectory> {
    pub users: U,
}

impl<U: UserDirectory> ListCustomersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<CustomerSummary>, PurchaseServiceError> {
        self.users.list_customers().await
    }
}
