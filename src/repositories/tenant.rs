//! # Tenant Repository
//!
//! Lookup and bootstrap operations for tenants and tenant memberships. The
//! retry handling around bootstrap lives in `tenancy`; this layer only maps
//! store errors into the core taxonomy.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::tenant::{
    ActiveModel as TenantActiveModel, Entity as Tenant, Model as TenantModel,
};
use crate::models::tenant_member::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as TenantMember,
    Model as MemberModel,
};

/// Repository for tenant and membership rows.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: Arc<DatabaseConnection>,
}

impl TenantRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds the membership row for a principal, if one exists.
    pub async fn find_membership(&self, user_id: Uuid) -> Result<Option<MemberModel>, CoreError> {
        let membership = TenantMember::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .one(&*self.db)
            .await?;
        Ok(membership)
    }

    /// Creates a new tenant row.
    ///
    /// Ids are client-assigned uuids, so inserts skip the last-insert-id
    /// read-back (sqlite cannot provide it for uuid keys) and the created
    /// row is built from the assigned values.
    pub async fn create_tenant(
        &self,
        name: String,
        slug: String,
    ) -> Result<TenantModel, CoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let tenant = TenantActiveModel {
            id: Set(id),
            name: Set(Some(name.clone())),
            slug: Set(Some(slug.clone())),
            created_at: Set(now.into()),
        };
        Tenant::insert(tenant)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(TenantModel {
            id,
            name: Some(name),
            slug: Some(slug),
            created_at: now.into(),
        })
    }

    /// Creates a membership row binding a principal to a tenant.
    pub async fn create_membership(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<MemberModel, CoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let member = MemberActiveModel {
            id: Set(id),
            tenant_id: Set(tenant_id),
            user_id: Set(user_id),
            email: Set(email.to_string()),
            role: Set(role.to_string()),
            created_at: Set(now.into()),
        };
        TenantMember::insert(member)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(MemberModel {
            id,
            tenant_id,
            user_id,
            email: email.to_string(),
            role: role.to_string(),
            created_at: now.into(),
        })
    }

    /// Fetches a tenant row by id.
    pub async fn find_tenant(&self, tenant_id: Uuid) -> Result<Option<TenantModel>, CoreError> {
        let tenant = Tenant::find_by_id(tenant_id).one(&*self.db).await?;
        Ok(tenant)
    }
}
