use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};

use showroom_domain::id::{OtpTokenId, PurchaseRequestId, SaleId, UserId, VehicleId};
use showroom_domain::otp::OtpPurpose;
use showroom_domain::purchase::PurchaseStatus;
use showroom_domain::user::UserRole;
use showroom_purchase_schema::{otp_tokens, purchase_requests, sales, users, vehicles};

use crate::domain::repository::{
    InventoryStore, OtpStore, PurchaseRequestStore, SaleStore, TransactionalStore, UnitOfWork,
    UserDirectory,
};
use crate::domain::types::{
    Account, CustomerSummary, NewOtpToken, NewPurchaseRequest, NewSale, OtpQuery, OtpToken,
    PendingRequestEntry, PurchaseRequest, Sale, SaleHistoryEntry, Vehicle, VehicleDetail,
    VehicleSummary,
};
use crate::error::PurchaseServiceError;

/// sea-orm backed stores.
///
/// With `C = DatabaseConnection` every call autocommits and `begin()` opens a unit of
/// work; with `C = DatabaseTransaction` every call joins that transaction.
#[derive(Clone)]
pub struct DbRepository<C = DatabaseConnection> {
    pub conn: C,
}

/// Map a unique-index violation to a business error, anything else to `Unavailable`.
fn on_unique_violation(
    err: DbErr,
    business: PurchaseServiceError,
    context: &'static str,
) -> PurchaseServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => business,
        _ => anyhow::Error::new(err).context(context).into(),
    }
}

// ── Transactions ─────────────────────────────────────────────────────────────

impl TransactionalStore for DbRepository<DatabaseConnection> {
    type Tx = DbRepository<DatabaseTransaction>;

    async fn begin(&self) -> Result<Self::Tx, PurchaseServiceError> {
        let conn = self.conn.begin().await.context("begin transaction")?;
        Ok(DbRepository { conn })
    }
}

impl UnitOfWork for DbRepository<DatabaseTransaction> {
    async fn commit(self) -> Result<(), PurchaseServiceError> {
        self.conn.commit().await.context("commit transaction")?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), PurchaseServiceError> {
        self.conn.rollback().await.context("rollback transaction")?;
        Ok(())
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send> UserDirectory for DbRepository<C> {
    async fn find_account(&self, id: UserId) -> Result<Option<Account>, PurchaseServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model).transpose()?)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerSummary>, PurchaseServiceError> {
        let models = users::Entity::find()
            .filter(users::Column::Role.eq(i16::from(UserRole::Customer.as_u8())))
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("list customers")?;
        Ok(models.into_iter().map(customer_from_model).collect())
    }
}

fn account_from_model(model: users::Model) -> anyhow::Result<Account> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("user {} has unknown role {}", model.id, model.role))?;
    Ok(Account {
        id: UserId(model.id),
        email: model.email,
        full_name: model.full_name,
        role,
    })
}

fn customer_from_model(model: users::Model) -> CustomerSummary {
    CustomerSummary {
        id: UserId(model.id),
        email: model.email,
        full_name: model.full_name,
    }
}

// ── OTP tokens ───────────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send> OtpStore for DbRepository<C> {
    async fn insert_otp(&self, token: &NewOtpToken) -> Result<OtpToken, PurchaseServiceError> {
        let model = otp_tokens::ActiveModel {
            id: NotSet,
            subject: Set(token.subject.clone()),
            purpose: Set(i16::from(token.purpose.as_u8())),
            code: Set(token.code.clone()),
            expires_at: Set(token.expires_at),
            consumed: Set(false),
            resource_id: Set(token.resource_id),
            created_at: Set(token.created_at),
        }
        .insert(&self.conn)
        .await
        .context("insert otp token")?;
        Ok(otp_from_model(model)?)
    }

    async fn find_latest_otp(
        &self,
        query: &OtpQuery,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpToken>, PurchaseServiceError> {
        let mut select = otp_tokens::Entity::find()
            .filter(otp_tokens::Column::Subject.eq(query.subject.as_str()))
            .filter(otp_tokens::Column::Purpose.eq(i16::from(query.purpose.as_u8())))
            .filter(otp_tokens::Column::Code.eq(query.code.as_str()))
            .filter(otp_tokens::Column::Consumed.eq(false))
            .filter(otp_tokens::Column::ExpiresAt.gte(now));
        if query.purpose.binds_resource() {
            let Some(resource_id) = query.resource_id else {
                return Ok(None);
            };
            select = select.filter(otp_tokens::Column::ResourceId.eq(resource_id));
        }
        let model = select
            .order_by_desc(otp_tokens::Column::Id)
            .one(&self.conn)
            .await
            .context("find latest otp token")?;
        Ok(model.map(otp_from_model).transpose()?)
    }

    async fn consume_otp(&self, id: OtpTokenId) -> Result<bool, PurchaseServiceError> {
        let result = otp_tokens::Entity::update_many()
            .col_expr(otp_tokens::Column::Consumed, Expr::value(true))
            .filter(otp_tokens::Column::Id.eq(id.0))
            .filter(otp_tokens::Column::Consumed.eq(false))
            .exec(&self.conn)
            .await
            .context("consume otp token")?;
        Ok(result.rows_affected == 1)
    }
}

fn otp_from_model(model: otp_tokens::Model) -> anyhow::Result<OtpToken> {
    let purpose = u8::try_from(model.purpose)
        .ok()
        .and_then(OtpPurpose::from_u8)
        .with_context(|| format!("otp token {} has unknown purpose {}", model.id, model.purpose))?;
    Ok(OtpToken {
        id: OtpTokenId(model.id),
        subject: model.subject,
        purpose,
        code: model.code,
        expires_at: model.expires_at,
        consumed: model.consumed,
        resource_id: model.resource_id,
        created_at: model.created_at,
    })
}

// ── Inventory ────────────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send> InventoryStore for DbRepository<C> {
    async fn find_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, PurchaseServiceError> {
        let model = vehicles::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await
            .context("find vehicle by id")?;
        Ok(model.map(vehicle_from_model))
    }

    async fn mark_vehicle_sold(&self, id: VehicleId) -> Result<bool, PurchaseServiceError> {
        // Under READ COMMITTED a concurrent writer blocks on the row lock and then
        // re-checks `is_available`, so only one caller sees a row affected.
        let result = vehicles::Entity::update_many()
            .col_expr(vehicles::Column::IsAvailable, Expr::value(false))
            .filter(vehicles::Column::Id.eq(id.0))
            .filter(vehicles::Column::IsAvailable.eq(true))
            .exec(&self.conn)
            .await
            .context("mark vehicle sold")?;
        Ok(result.rows_affected == 1)
    }
}

fn vehicle_from_model(model: vehicles::Model) -> Vehicle {
    Vehicle {
        id: VehicleId(model.id),
        make: model.make,
        model: model.model,
        year: model.year,
        price: model.price,
        color: model.color,
        description: model.description,
        is_available: model.is_available,
    }
}

// ── Purchase requests ────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send> PurchaseRequestStore for DbRepository<C> {
    async fn has_pending_request(
        &self,
        customer_id: UserId,
        vehicle_id: VehicleId,
    ) -> Result<bool, PurchaseServiceError> {
        let count = purchase_requests::Entity::find()
            .filter(purchase_requests::Column::CustomerId.eq(customer_id.0))
            .filter(purchase_requests::Column::VehicleId.eq(vehicle_id.0))
            .filter(purchase_requests::Column::Status.eq(pending_status()))
            .count(&self.conn)
            .await
            .context("count pending purchase requests")?;
        Ok(count > 0)
    }

    async fn insert_request(
        &self,
        request: &NewPurchaseRequest,
    ) -> Result<PurchaseRequest, PurchaseServiceError> {
        let model = purchase_requests::ActiveModel {
            id: NotSet,
            vehicle_id: Set(request.vehicle_id.0),
            customer_id: Set(request.customer_id.0),
            status: Set(pending_status()),
            requested_at: Set(request.requested_at),
        }
        .insert(&self.conn)
        .await
        .map_err(|e| {
            on_unique_violation(e, PurchaseServiceError::Conflict, "insert purchase request")
        })?;
        Ok(request_from_model(model)?)
    }

    async fn find_request(
        &self,
        id: PurchaseRequestId,
    ) -> Result<Option<PurchaseRequest>, PurchaseServiceError> {
        let model = purchase_requests::Entity::find_by_id(id.0)
            .one(&self.conn)
            .await
            .context("find purchase request by id")?;
        Ok(model.map(request_from_model).transpose()?)
    }

    async fn decide_request(
        &self,
        id: PurchaseRequestId,
        status: PurchaseStatus,
    ) -> Result<bool, PurchaseServiceError> {
        let result = purchase_requests::Entity::update_many()
            .col_expr(
                purchase_requests::Column::Status,
                Expr::value(i16::from(status.as_u8())),
            )
            .filter(purchase_requests::Column::Id.eq(id.0))
            .filter(purchase_requests::Column::Status.eq(pending_status()))
            .exec(&self.conn)
            .await
            .context("decide purchase request")?;
        Ok(result.rows_affected == 1)
    }

    async fn list_pending(&self) -> Result<Vec<PendingRequestEntry>, PurchaseServiceError> {
        let requests = purchase_requests::Entity::find()
            .filter(purchase_requests::Column::Status.eq(pending_status()))
            .order_by_asc(purchase_requests::Column::RequestedAt)
            .order_by_asc(purchase_requests::Column::Id)
            .all(&self.conn)
            .await
            .context("list pending purchase requests")?;
        if requests.is_empty() {
            return Ok(vec![]);
        }

        let vehicle_ids: Vec<i32> = requests.iter().map(|r| r.vehicle_id).collect();
        let customer_ids: Vec<i32> = requests.iter().map(|r| r.customer_id).collect();

        let vehicles: HashMap<i32, vehicles::Model> = vehicles::Entity::find()
            .filter(vehicles::Column::Id.is_in(vehicle_ids))
            .all(&self.conn)
            .await
            .context("load vehicles for pending requests")?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();
        let customers: HashMap<i32, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(customer_ids))
            .all(&self.conn)
            .await
            .context("load customers for pending requests")?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut entries = Vec::with_capacity(requests.len());
        for request in requests {
            let vehicle = vehicles
                .get(&request.vehicle_id)
                .with_context(|| format!("request {} references missing vehicle", request.id))?;
            let customer = customers
                .get(&request.customer_id)
                .with_context(|| format!("request {} references missing customer", request.id))?;
            entries.push(PendingRequestEntry {
                request_id: PurchaseRequestId(request.id),
                requested_at: request.requested_at,
                vehicle: VehicleDetail {
                    id: VehicleId(vehicle.id),
                    make: vehicle.make.clone(),
                    model: vehicle.model.clone(),
                    year: vehicle.year,
                    price: vehicle.price,
                    color: vehicle.color.clone(),
                },
                customer: customer_from_model(customer.clone()),
            });
        }
        Ok(entries)
    }
}

fn pending_status() -> i16 {
    i16::from(PurchaseStatus::Pending.as_u8())
}

fn request_from_model(model: purchase_requests::Model) -> anyhow::Result<PurchaseRequest> {
    let status = u8::try_from(model.status)
        .ok()
        .and_then(PurchaseStatus::from_u8)
        .with_context(|| format!("request {} has unknown status {}", model.id, model.status))?;
    Ok(PurchaseRequest {
        id: PurchaseRequestId(model.id),
        vehicle_id: VehicleId(model.vehicle_id),
        customer_id: UserId(model.customer_id),
        status,
        requested_at: model.requested_at,
    })
}

// ── Sales ────────────────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send> SaleStore for DbRepository<C> {
    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, PurchaseServiceError> {
        let model = sales::ActiveModel {
            id: NotSet,
            vehicle_id: Set(sale.vehicle_id.0),
            customer_id: Set(sale.customer_id.0),
            price: Set(sale.price),
            sold_at: Set(sale.sold_at),
        }
        .insert(&self.conn)
        .await
        .map_err(|e| {
            on_unique_violation(e, PurchaseServiceError::VehicleUnavailable, "insert sale")
        })?;
        Ok(Sale {
            id: SaleId(model.id),
            vehicle_id: VehicleId(model.vehicle_id),
            customer_id: UserId(model.customer_id),
            price: model.price,
            sold_at: model.sold_at,
        })
    }

    async fn history_for(
        &self,
        customer_id: UserId,
    ) -> Result<Vec<SaleHistoryEntry>, PurchaseServiceError> {
        let rows = sales::Entity::find()
            .filter(sales::Column::CustomerId.eq(customer_id.0))
            .order_by_desc(sales::Column::SoldAt)
            .order_by_desc(sales::Column::Id)
            .find_also_related(vehicles::Entity)
            .all(&self.conn)
            .await
            .context("list sales for customer")?;
        rows.into_iter()
            .map(|(sale, vehicle)| -> Result<SaleHistoryEntry, PurchaseServiceError> {
                let vehicle = vehicle
                    .with_context(|| format!("sale {} references missing vehicle", sale.id))?;
                Ok(SaleHistoryEntry {
                    sale_id: SaleId(sale.id),
                    sold_at: sale.sold_at,
                    price: sale.price,
                    vehicle: VehicleSummary {
                        make: vehicle.make,
                        model: vehicle.model,
                        year: vehicle.year,
                    },
                })
            })
            .collect()
    }
}
