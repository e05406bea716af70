//! Migration to create the tenant_members table.
//!
//! Membership rows bind a user to exactly one tenant; the unique index on
//! user_id is what makes tenant resolution a single-row lookup.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantMembers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TenantMembers::TenantId).uuid().not_null())
                    .col(ColumnDef::new(TenantMembers::UserId).uuid().not_null())
                    .col(ColumnDef::new(TenantMembers::Email).text().not_null())
                    .col(
                        ColumnDef::new(TenantMembers::Role)
                            .text()
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(TenantMembers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_members_tenant_id")
                            .from(TenantMembers::Table, TenantMembers::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_members_user_id")
                    .table(TenantMembers::Table)
                    .col(TenantMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_tenant_members_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TenantMembers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TenantMembers {
    Table,
    Id,
    TenantId,
    UserId,
    Email,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
