//! Secret entity model
//!
//! This module contains the SeaORM entity model for the secrets table,
//! which stores tenant-scoped credentials under management.

use super::tenant::Entity as Tenant;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Secret entity representing a tenant-scoped credential
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "secrets")]
pub struct Model {
    /// Unique identifier for the secret (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Display name
    pub name: String,

    /// Free-text description (optional)
    pub description: Option<String>,

    /// Tool identifier the credential belongs to (open vocabulary)
    pub tool: String,

    /// Key type (stored string form of `secrets::KeyType`)
    pub key_type: String,

    /// Opaque credential value (encryption at rest is the store's concern)
    pub value: String,

    /// One-way SHA-256 hash of the value, for verification without reveal
    pub value_hash: Option<String>,

    /// Tag identifiers, stored as a JSON array of strings
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: JsonValue,

    /// Owning client identifier, or the "generico" sentinel
    pub client_id: String,

    /// Status (stored string form of `secrets::SecretStatus`)
    pub status: String,

    /// Visibility (stored string form of `secrets::Visibility`)
    pub visibility: String,

    /// Expiration timestamp (optional)
    pub expires_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the secret was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the secret was last updated
    pub updated_at: DateTimeWithTimeZone,

    /// Principal that created the secret
    pub created_by: Uuid,

    /// Timestamp of the last successful value copy (optional)
    pub last_accessed_at: Option<DateTimeWithTimeZone>,

    /// Number of successful value copies; only copy increments this
    pub access_count: i64,

    /// Free-text notes (optional)
    pub notes: Option<String>,
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
