use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Sales::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Sales::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sales::SoldAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sales::Table, Sales::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sales::Table, Sales::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Storage backstop: a vehicle is sold at most once.
        manager
            .create_index(
                Index::create()
                    .table(Sales::Table)
                    .col(Sales::VehicleId)
                    .unique()
                    .name("uq_sales_vehicle_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Sales::Table)
                    .col(Sales::CustomerId)
                    .col(Sales::SoldAt)
                    .name("idx_sales_customer_id_sold_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    VehicleId,
    CustomerId,
    Price,
    SoldAt,
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
