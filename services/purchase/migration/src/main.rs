use sea_orm_migration::prelude::*;

use showroom_purchase_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
