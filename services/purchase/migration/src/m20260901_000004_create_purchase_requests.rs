use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurchaseRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseRequests::VehicleId).integer().not_null())
                    .col(ColumnDef::new(PurchaseRequests::CustomerId).integer().not_null())
                    .col(
                        ColumnDef::new(PurchaseRequests::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PurchaseRequests::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PurchaseRequests::Table, PurchaseRequests::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PurchaseRequests::Table, PurchaseRequests::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PurchaseRequests::Table)
                    .col(PurchaseRequests::Status)
                    .col(PurchaseRequests::RequestedAt)
                    .name("idx_purchase_requests_status_requested_at")
                    .to_owned(),
            )
            .await?;

        // Partial unique index: one pending request per (customer, vehicle).
        // Supported by both PostgreSQL and SQLite; sea-query has no builder for the predicate.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_purchase_requests_pending \
                 ON purchase_requests (customer_id, vehicle_id) WHERE status = 0",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PurchaseRequests {
    Table,
    Id,
    VehicleId,
    CustomerId,
    Status,
    RequestedAt,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
