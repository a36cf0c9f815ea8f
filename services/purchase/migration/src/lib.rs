use sea_orm_migration::prelude::*;

mod m20260901_000001_create_users;
mod m20260901_000002_create_vehicles;
mod m20260901_000003_create_otp_tokens;
mod m20260901_000004_create_purchase_requests;
mod m20260901_000005_create_sales;
mod m20260901_000006_seed_inventory;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_users::Migration),
            Box::new(m20260901_000002_create_vehicles::Migration),
            Box::new(m20260901_000003_create_otp_tokens::Migration),
            Box::new(m20260901_000004_create_purchase_requests::Migration),
            Box::new(m20260901_000005_create_sales::Migration),
            Box::new(m20260901_000006_seed_inventory::Migration),
        ]
    }
}
