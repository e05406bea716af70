//! # Authentication Context
//!
//! The caller identity is an explicit value object threaded by reference
//! through every operation that needs it. There is no ambient session
//! singleton: one [`AuthContext`] is built per session and re-built after
//! every sign-in event, so role changes take effect at the next session.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::policy::{Role, effective_role};
use crate::repositories::UserRoleRepository;
use crate::tenancy::{RetryPolicy, resolve_tenant};

/// Tenant ID wrapper for type safety
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TenantId(pub Uuid);

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user identity as provided by the session/identity boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
}

impl Principal {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Resolved caller identity for one session: principal, role assignments,
/// the effective role derived from them, and the active tenant.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub roles: Vec<Role>,
    /// Highest-privilege role among the assignments; `viewer` when none.
    pub role: Role,
    pub tenant: TenantId,
}

impl AuthContext {
    pub fn new(principal: Principal, roles: Vec<Role>, tenant: TenantId) -> Self {
        let role = effective_role(&roles);
        Self {
            principal,
            roles,
            role,
            tenant,
        }
    }
}

/// Builds the session context for a principal after sign-in.
///
/// Role assignments are re-read from the store (never cached across
/// sign-ins) and the tenant is resolved, bootstrapping one on first login.
/// Tenant resolution is the only step that retries transient store failures.
pub async fn establish_session(
    db: &Arc<DatabaseConnection>,
    retry: &RetryPolicy,
    principal: Principal,
) -> Result<AuthContext, CoreError> {
    let role_repo = UserRoleRepository::new(Arc::clone(db));
    let roles = role_repo.roles_for_user(principal.id).await?;

    let tenant = resolve_tenant(db, retry, &principal).await?;

    let ctx = AuthContext::new(principal, roles, tenant);
    tracing::info!(
        user_id = %ctx.principal.id,
        role = %ctx.role,
        tenant_id = %ctx.tenant,
        "Session established"
    );
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_role_is_derived_at_construction() {
        let ctx = AuthContext::new(
            Principal::new(Uuid::new_v4(), "ana@dromeflow.dev"),
            vec![Role::Viewer, Role::Manager],
            TenantId(Uuid::new_v4()),
        );
        assert_eq!(ctx.role, Role::Manager);
    }

    #[test]
    fn no_assignments_resolve_to_viewer() {
        let ctx = AuthContext::new(
            Principal::new(Uuid::new_v4(), "ana@dromeflow.dev"),
            vec![],
            TenantId(Uuid::new_v4()),
        );
        assert_eq!(ctx.role, Role::Viewer);
    }
}
