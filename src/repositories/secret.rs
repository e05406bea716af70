//! # Secret Repository
//!
//! Tenant-scoped persistence for secrets. The domain record is translated to
//! and from its storage row here, and stored enum strings are validated on
//! the way out. Listing order is newest-first, matching the facade's
//! prepend-on-create cache order.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::auth::TenantId;
use crate::error::CoreError;
use crate::models::secret::{self, Column as SecretColumn, Entity as SecretEntity};
use crate::secrets::record::Secret;

/// Repository for secret database operations.
#[derive(Debug, Clone)]
pub struct SecretRepository {
    db: Arc<DatabaseConnection>,
}

impl SecretRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists a tenant's secrets newest-first.
    pub async fn find_by_tenant(&self, tenant: TenantId) -> Result<Vec<Secret>, CoreError> {
        let rows = SecretEntity::find()
            .filter(SecretColumn::TenantId.eq(tenant.0))
            .order_by_desc(SecretColumn::CreatedAt)
            .order_by_desc(SecretColumn::Id)
            .all(&*self.db)
            .await?;

        rows.into_iter().map(Secret::from_model).collect()
    }

    /// Finds one secret by id within the tenant scope.
    pub async fn find_by_id(
        &self,
        tenant: TenantId,
        id: Uuid,
    ) -> Result<Option<Secret>, CoreError> {
        let row = SecretEntity::find_by_id(id)
            .filter(SecretColumn::TenantId.eq(tenant.0))
            .one(&*self.db)
            .await?;

        row.map(Secret::from_model).transpose()
    }

    /// Persists a new secret under the tenant.
    ///
    /// The id is client-assigned, so the insert skips the last-insert-id
    /// read-back, which sqlite cannot provide for uuid keys.
    pub async fn insert(&self, tenant: TenantId, record: &Secret) -> Result<(), CoreError> {
        let active = to_active_model(tenant, record);
        SecretEntity::insert(active)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }

    /// Persists a batch of new secrets under the tenant in one transaction.
    /// Either every record lands or none do.
    pub async fn insert_many(&self, tenant: TenantId, records: &[Secret]) -> Result<(), CoreError> {
        let txn = self.db.begin().await?;
        for record in records {
            let active = to_active_model(tenant, record);
            SecretEntity::insert(active)
                .exec_without_returning(&txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Writes the full mutable state of an existing secret, scoped to the
    /// tenant. Returns `NotFound` when the row is absent from the tenant.
    pub async fn update(&self, tenant: TenantId, record: &Secret) -> Result<(), CoreError> {
        let existing = SecretEntity::find_by_id(record.id)
            .filter(SecretColumn::TenantId.eq(tenant.0))
            .one(&*self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("secret", record.id))?;

        let mut active = existing.into_active_model();
        active.name = Set(record.name.clone());
        active.description = Set(record.description.clone());
        active.tool = Set(record.tool.clone());
        active.key_type = Set(record.key_type.as_str().to_string());
        active.value = Set(record.value.clone());
        active.value_hash = Set(record.value_hash.clone());
        active.tags = Set(serde_json::json!(record.tags));
        active.client_id = Set(record.client_id.clone());
        active.status = Set(record.status.as_str().to_string());
        active.visibility = Set(record.visibility.as_str().to_string());
        active.expires_at = Set(record.expires_at.map(Into::into));
        active.updated_at = Set(record.updated_at.into());
        active.last_accessed_at = Set(record.last_accessed_at.map(Into::into));
        active.access_count = Set(record.access_count.min(i64::MAX as u64) as i64);
        active.notes = Set(record.notes.clone());
        active.update(&*self.db).await?;
        Ok(())
    }

    /// Deletes a secret within the tenant scope. Returns whether a row was
    /// actually removed; deleting an absent id is not an error here.
    pub async fn delete(&self, tenant: TenantId, id: Uuid) -> Result<bool, CoreError> {
        let existing = SecretEntity::find_by_id(id)
            .filter(SecretColumn::TenantId.eq(tenant.0))
            .one(&*self.db)
            .await?;

        match existing {
            Some(row) => {
                row.delete(&*self.db).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn to_active_model(tenant: TenantId, record: &Secret) -> secret::ActiveModel {
    secret::ActiveModel {
        id: Set(record.id),
        tenant_id: Set(tenant.0),
        name: Set(record.name.clone()),
        description: Set(record.description.clone()),
        tool: Set(record.tool.clone()),
        key_type: Set(record.key_type.as_str().to_string()),
        value: Set(record.value.clone()),
        value_hash: Set(record.value_hash.clone()),
        tags: Set(serde_json::json!(record.tags)),
        client_id: Set(record.client_id.clone()),
        status: Set(record.status.as_str().to_string()),
        visibility: Set(record.visibility.as_str().to_string()),
        expires_at: Set(record.expires_at.map(Into::into)),
        created_at: Set(record.created_at.into()),
        updated_at: Set(record.updated_at.into()),
        created_by: Set(record.created_by),
        last_accessed_at: Set(record.last_accessed_at.map(Into::into)),
        access_count: Set(record.access_count.min(i64::MAX as u64) as i64),
        notes: Set(record.notes.clone()),
    }
}
