//! Migration to create the secrets table.
//!
//! Secrets are tenant-scoped credentials; every read path must filter on
//! tenant_id, so the table carries a dedicated tenant index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Secrets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Secrets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Secrets::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Secrets::Name).text().not_null())
                    .col(ColumnDef::new(Secrets::Description).text().null())
                    .col(ColumnDef::new(Secrets::Tool).text().not_null())
                    .col(ColumnDef::new(Secrets::KeyType).text().not_null())
                    .col(ColumnDef::new(Secrets::Value).text().not_null())
                    .col(ColumnDef::new(Secrets::ValueHash).text().null())
                    .col(ColumnDef::new(Secrets::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(Secrets::ClientId)
                            .text()
                            .not_null()
                            .default("generico"),
                    )
                    .col(
                        ColumnDef::new(Secrets::Status)
                            .text()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Secrets::Visibility)
                            .text()
                            .not_null()
                            .default("masked"),
                    )
                    .col(
                        ColumnDef::new(Secrets::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Secrets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Secrets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Secrets::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Secrets::LastAccessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Secrets::AccessCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Secrets::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_secrets_tenant_id")
                            .from(Secrets::Table, Secrets::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on tenant_id for tenant isolation queries
        manager
            .create_index(
                Index::create()
                    .name("idx_secrets_tenant_id")
                    .table(Secrets::Table)
                    .col(Secrets::TenantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_secrets_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Secrets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Secrets {
    Table,
    Id,
    TenantId,
    Name,
    Description,
    Tool,
    KeyType,
    Value,
    ValueHash,
    Tags,
    ClientId,
    Status,
    Visibility,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    LastAccessedAt,
    AccessCount,
    Notes,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
