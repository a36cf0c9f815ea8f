use chrono::Utc;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_EMAIL: &str = "admin@dealer.com";

/// (make, model, year, price, color)
const VEHICLES: &[(&str, &str, i32, i64, Option<&str>)] = &[
    ("Toyota", "Camry", 2021, 88_000, Some("White")),
    ("Toyota", "Corolla", 2022, 76_000, Some("Silver")),
    ("Honda", "Civic", 2020, 72_000, Some("Black")),
    ("Honda", "Accord", 2023, 99_000, Some("Blue")),
    ("Hyundai", "Sonata", 2021, 83_000, None),
    ("Kia", "K5", 2022, 85_000, None),
    ("Ford", "Mustang", 2019, 135_000, Some("Red")),
    ("Chevrolet", "Malibu", 2020, 78_000, None),
    ("BMW", "330i", 2023, 210_000, None),
    ("Mercedes", "C200", 2022, 230_000, None),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        let admin = Query::insert()
            .into_table(Users::Table)
            .columns([Users::Email, Users::FullName, Users::Role, Users::CreatedAt])
            .values_panic([
                ADMIN_EMAIL.into(),
                "Admin User".into(),
                1i16.into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(admin).await?;

        let mut inventory = Query::insert()
            .into_table(Vehicles::Table)
            .columns([
                Vehicles::Make,
                Vehicles::Model,
                Vehicles::Year,
                Vehicles::Price,
                Vehicles::Color,
                Vehicles::IsAvailable,
                Vehicles::CreatedAt,
            ])
            .to_owned();
        for &(make, model, year, price, color) in VEHICLES {
            inventory.values_panic([
                make.into(),
                model.into(),
                year.into(),
                price.into(),
                color.map(str::to_owned).into(),
                true.into(),
                now.into(),
            ]);
        }
        manager.exec_stmt(inventory).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(make, model, year, _, _) in VEHICLES {
            let vehicle = Query::delete()
                .from_table(Vehicles::Table)
                .and_where(Expr::col(Vehicles::Make).eq(make))
                .and_where(Expr::col(Vehicles::Model).eq(model))
                .and_where(Expr::col(Vehicles::Year).eq(year))
                .to_owned();
            manager.exec_stmt(vehicle).await?;
        }

        let admin = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Email).eq(ADMIN_EMAIL))
            .to_owned();
        manager.exec_stmt(admin).await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Email,
    FullName,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Make,
    Model,
    Year,
    Price,
    Color,
    IsAvailable,
    CreatedAt,
}
