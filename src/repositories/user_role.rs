//! # User Role Repository
//!
//! Reads role assignments for a principal. Role strings are parsed at this
//! boundary; an unknown string is dropped with a warning, which is a deny in
//! every downstream permission check, never a default-allow.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::user_role::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRole,
};
use crate::policy::Role;

/// Repository for role assignment rows.
#[derive(Debug, Clone)]
pub struct UserRoleRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRoleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Returns all valid role assignments for a principal.
    pub async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, CoreError> {
        let rows = UserRole::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .all(&*self.db)
            .await?;

        let mut roles = Vec::with_capacity(rows.len());
        for row in rows {
            match Role::parse(&row.role) {
                Some(role) => roles.push(role),
                None => {
                    tracing::warn!(
                        user_id = %user_id,
                        role = %row.role,
                        "Dropping unknown role assignment"
                    );
                }
            }
        }
        Ok(roles)
    }

    /// Records a role assignment for a principal.
    ///
    /// The id is client-assigned; the insert skips the last-insert-id
    /// read-back, which sqlite cannot provide for uuid keys.
    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> Result<(), CoreError> {
        let assignment = UserRoleActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(role.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        };
        UserRole::insert(assignment)
            .exec_without_returning(&*self.db)
            .await?;
        Ok(())
    }
}
