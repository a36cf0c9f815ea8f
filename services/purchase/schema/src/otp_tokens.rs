use sea_orm::entity::prelude::*;

/// Issued one-time code. Rows are never deleted; `consumed` flips once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otp_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject: String,
    pub purpose: i16,
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub consumed: bool,
    pub resource_id: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
