use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OtpTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpTokens::Subject).string().not_null())
                    .col(ColumnDef::new(OtpTokens::Purpose).small_integer().not_null())
                    .col(ColumnDef::new(OtpTokens::Code).string_len(6).not_null())
                    .col(
                        ColumnDef::new(OtpTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpTokens::Consumed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(OtpTokens::ResourceId).integer())
                    .col(
                        ColumnDef::new(OtpTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Validation looks up the newest token per (subject, purpose).
        manager
            .create_index(
                Index::create()
                    .table(OtpTokens::Table)
                    .col(OtpTokens::Subject)
                    .col(OtpTokens::Purpose)
                    .name("idx_otp_tokens_subject_purpose")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpTokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OtpTokens {
    Table,
    Id,
    Subject,
    Purpose,
    Code,
    ExpiresAt,
    Consumed,
    ResourceId,
    CreatedAt,
}
