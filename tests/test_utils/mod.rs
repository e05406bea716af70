//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus fixture helpers for tenants, sessions, and
//! secrets.

use anyhow::Result;
use chrono::{DateTime, Utc};
use dromeflow_core::auth::{AuthContext, Principal, TenantId};
use dromeflow_core::policy::Role;
use dromeflow_core::repositories::SecretRepository;
use dromeflow_core::secrets::record::{KeyType, SecretDraft, SecretStatus};
use dromeflow_core::secrets::store::SecretsStore;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use std::sync::Arc;
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<Arc<DatabaseConnection>> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    // SQLite does not enforce our Postgres foreign key semantics; disable FK
    // checks so fixtures can be inserted without full cross-table setup.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(Arc::new(db))
}

/// Creates a tenant row and returns its id.
#[allow(dead_code)]
pub async fn create_test_tenant(db: &DatabaseConnection) -> Result<TenantId> {
    let id = Uuid::new_v4();

    let stmt = Statement::from_string(
        db.get_database_backend(),
        format!(
            "INSERT INTO tenants (id, name, slug) VALUES ('{id}', 'Test Tenant', 'tenant-test')"
        ),
    );
    db.execute(stmt).await?;

    Ok(TenantId(id))
}

/// Inserts a raw role assignment row, bypassing the repository's parsing.
#[allow(dead_code)]
pub async fn insert_raw_role(db: &DatabaseConnection, user_id: Uuid, role: &str) -> Result<()> {
    // sea-orm binds uuids as 16-byte blobs on SQLite, so the raw row must use
    // blob literals for the repository's user_id filter to match it.
    let stmt = Statement::from_string(
        db.get_database_backend(),
        format!(
            "INSERT INTO user_roles (id, user_id, role) VALUES (x'{}', x'{}', '{}')",
            Uuid::new_v4().simple(),
            user_id.simple(),
            role
        ),
    );
    db.execute(stmt).await?;
    Ok(())
}

/// Builds a session context with the given effective role.
#[allow(dead_code)]
pub fn auth_with_role(role: Role, tenant: TenantId) -> AuthContext {
    AuthContext::new(
        Principal::new(Uuid::new_v4(), format!("{}@dromeflow.dev", role.as_str())),
        vec![role],
        tenant,
    )
}

/// Opens a secrets store over a fresh repository for the session's tenant.
#[allow(dead_code)]
pub async fn open_store(
    db: &Arc<DatabaseConnection>,
    auth: &AuthContext,
) -> Result<SecretsStore> {
    let repo = SecretRepository::new(Arc::clone(db));
    Ok(SecretsStore::open(repo, auth).await?)
}

/// A draft for a plain active API key secret.
#[allow(dead_code)]
pub fn draft(name: &str, value: &str) -> SecretDraft {
    SecretDraft {
        name: name.to_string(),
        description: None,
        tool: "stripe".to_string(),
        key_type: KeyType::ApiKey,
        value: value.to_string(),
        tags: vec![],
        client_id: "generico".to_string(),
        status: SecretStatus::Active,
        expires_at: None,
        notes: None,
        visibility: None,
    }
}

/// Same draft with an expiry timestamp.
#[allow(dead_code)]
pub fn expiring_draft(name: &str, value: &str, expires_at: DateTime<Utc>) -> SecretDraft {
    SecretDraft {
        expires_at: Some(expires_at),
        ..draft(name, value)
    }
}
