//! Tenant membership entity model
//!
//! A membership row binds a principal to its single active tenant. Tenant
//! resolution at session start is a lookup on `user_id`.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Membership row granting a principal access to a tenant
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenant_members")]
pub struct Model {
    /// Unique identifier for the membership (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Tenant the principal belongs to
    pub tenant_id: Uuid,

    /// Principal identifier
    pub user_id: Uuid,

    /// Email captured at bootstrap time
    pub email: String,

    /// Membership role within the tenant ("admin" for the creating principal)
    pub role: String,

    /// Timestamp when the membership was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Tenant",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<Tenant> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
