//! User role assignment entity model
//!
//! Role assignments are immutable rows; a principal may hold several, and
//! the effective role is resolved in code from the full set.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// A single role assignment for a principal
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    /// Unique identifier for the assignment (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Principal the role is assigned to
    pub user_id: Uuid,

    /// Stored role string (see `policy::Role::as_str`)
    pub role: String,

    /// Timestamp when the assignment was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
