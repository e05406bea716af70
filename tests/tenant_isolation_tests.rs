//! Cross-tenant isolation tests: a session scoped to one tenant must never
//! see or affect another tenant's secrets.

use anyhow::Result;
use dromeflow_core::error::CoreError;
use dromeflow_core::policy::Role;
use dromeflow_core::repositories::SecretRepository;
use dromeflow_core::secrets::filter::SecretFilters;
use dromeflow_core::secrets::record::SecretPatch;
use std::sync::Arc;

mod test_utils;
use test_utils::{auth_with_role, create_test_tenant, draft, open_store, setup_test_db};

#[tokio::test]
async fn stores_only_load_their_own_tenant() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);
    let admin_b = auth_with_role(Role::Admin, tenant_b);

    let mut store_a = open_store(&db, &admin_a).await?;
    store_a.create(&admin_a, draft("a-only", "value-a")).await?;

    let store_b = open_store(&db, &admin_b).await?;
    assert!(store_b.secrets().is_empty());
    assert!(store_b.list_filtered(&admin_b, &SecretFilters::default()).is_empty());
    Ok(())
}

#[tokio::test]
async fn scoped_lookup_does_not_cross_tenants() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);

    let mut store_a = open_store(&db, &admin_a).await?;
    let secret = store_a.create(&admin_a, draft("a-only", "value-a")).await?;

    let repo = SecretRepository::new(Arc::clone(&db));
    assert!(repo.find_by_id(tenant_a, secret.id).await?.is_some());
    assert!(repo.find_by_id(tenant_b, secret.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn update_through_wrong_tenant_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);
    let admin_b = auth_with_role(Role::Admin, tenant_b);

    let mut store_a = open_store(&db, &admin_a).await?;
    let secret = store_a.create(&admin_a, draft("a-only", "value-a")).await?;

    // The foreign id is invisible to tenant B's store, so a well-formed
    // mutation attempt reads as a missing record.
    let mut store_b = open_store(&db, &admin_b).await?;
    let result = store_b
        .update(
            &admin_b,
            secret.id,
            SecretPatch {
                name: Some("hijacked".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::NotFound { .. })));

    let reopened = open_store(&db, &admin_a).await?;
    assert_eq!(reopened.secrets()[0].name, "a-only");
    Ok(())
}

#[tokio::test]
async fn delete_through_wrong_tenant_leaves_row_intact() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);
    let admin_b = auth_with_role(Role::Admin, tenant_b);

    let mut store_a = open_store(&db, &admin_a).await?;
    let secret = store_a.create(&admin_a, draft("a-only", "value-a")).await?;

    let repo = SecretRepository::new(Arc::clone(&db));
    assert!(!repo.delete(tenant_b, secret.id).await?);

    // Facade delete over the foreign tenant is a no-op success too.
    let mut store_b = open_store(&db, &admin_b).await?;
    store_b.delete(&admin_b, secret.id).await?;

    let reopened = open_store(&db, &admin_a).await?;
    assert_eq!(reopened.secrets().len(), 1);
    assert_eq!(reopened.secrets()[0].id, secret.id);
    Ok(())
}

#[tokio::test]
async fn stale_session_tenant_is_rejected_by_the_store() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);
    let admin_b = auth_with_role(Role::Admin, tenant_b);

    // Store opened for tenant A, then driven with a context bound to B.
    let mut store_a = open_store(&db, &admin_a).await?;
    let result = store_a.create(&admin_b, draft("smuggled", "value-b")).await;
    assert!(matches!(result, Err(CoreError::PermissionDenied { .. })));
    assert!(store_a.secrets().is_empty());

    store_a.create(&admin_a, draft("legit", "value-a")).await?;
    assert!(store_a.list_filtered(&admin_b, &SecretFilters::default()).is_empty());
    assert!(matches!(
        store_a.export_json(&admin_b),
        Err(CoreError::PermissionDenied { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn import_lands_only_in_the_importing_tenant() -> Result<()> {
    let db = setup_test_db().await?;
    let tenant_a = create_test_tenant(&db).await?;
    let tenant_b = create_test_tenant(&db).await?;
    let admin_a = auth_with_role(Role::Admin, tenant_a);
    let admin_b = auth_with_role(Role::Admin, tenant_b);

    // Migration scenario: export from A, remove there, import into B.
    let mut store_a = open_store(&db, &admin_a).await?;
    let secret = store_a.create(&admin_a, draft("moved", "value-a")).await?;
    let exported = store_a.export_json(&admin_a)?;
    store_a.delete(&admin_a, secret.id).await?;

    let mut store_b = open_store(&db, &admin_b).await?;
    assert_eq!(store_b.import_json(&admin_b, &exported).await?, 1);

    // The record is owned by tenant B now and invisible to tenant A.
    let reopened_a = open_store(&db, &admin_a).await?;
    let reopened_b = open_store(&db, &admin_b).await?;
    assert!(reopened_a.secrets().is_empty());
    assert_eq!(reopened_b.secrets().len(), 1);
    assert_eq!(reopened_b.secrets()[0].id, secret.id);

    let repo = SecretRepository::new(Arc::clone(&db));
    assert!(repo.find_by_id(tenant_a, secret.id).await?.is_none());
    Ok(())
}
