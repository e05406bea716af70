//! # Secrets Store Facade
//!
//! The operations the dashboard calls. The facade holds an in-memory
//! authoritative cache of the tenant's secrets and writes through to the
//! repository: the cache only changes after the awaited persistence call
//! succeeds, so callers never observe torn state such as a stale value hash.
//!
//! Permission checks always run before existence checks, so an unauthorized
//! caller cannot probe for ids in a tenant it has no access to.

use chrono::Utc;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::auth::AuthContext;
use crate::error::CoreError;
use crate::policy::{can_manage_secrets, can_view_secrets};
use crate::repositories::SecretRepository;
use crate::secrets::filter::{self, SecretFilters, SecretStats};
use crate::secrets::lifecycle::{hash_value, is_expired, validate_status_change};
use crate::secrets::record::{Secret, SecretDraft, SecretPatch, SecretStatus, Visibility};
use crate::secrets::transfer;

/// Plaintext credential value handed out by [`SecretsStore::copy_value`].
///
/// Zeroized on drop so the value does not linger after the caller is done.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Plaintext(String);

impl Plaintext {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Facade over one tenant's secrets collection.
///
/// Bound to the tenant it was opened for; every repository call is scoped to
/// that tenant, and the caller's context is checked against it on each
/// operation.
pub struct SecretsStore {
    repo: SecretRepository,
    tenant: crate::auth::TenantId,
    secrets: Vec<Secret>,
}

impl SecretsStore {
    /// Opens the store for the session's tenant, loading the cache.
    pub async fn open(repo: SecretRepository, auth: &AuthContext) -> Result<Self, CoreError> {
        let secrets = repo.find_by_tenant(auth.tenant).await?;
        tracing::debug!(
            tenant_id = %auth.tenant,
            count = secrets.len(),
            "Opened secrets store"
        );
        Ok(Self {
            repo,
            tenant: auth.tenant,
            secrets,
        })
    }

    /// The cached collection, newest first. Values are raw; use
    /// [`lifecycle::display_value`](crate::secrets::lifecycle::display_value)
    /// for rendering.
    pub fn secrets(&self) -> &[Secret] {
        &self.secrets
    }

    fn check_tenant(&self, auth: &AuthContext) -> Result<(), CoreError> {
        if auth.tenant != self.tenant {
            // The session was rebuilt against another tenant; treat the
            // whole store as out of scope rather than leak across tenants.
            return Err(CoreError::permission_denied("tenant_scope"));
        }
        Ok(())
    }

    /// Creates a secret. Requires the manage capability.
    pub async fn create(
        &mut self,
        auth: &AuthContext,
        draft: SecretDraft,
    ) -> Result<Secret, CoreError> {
        if !can_manage_secrets(auth.role) {
            return Err(CoreError::permission_denied("manage_secrets"));
        }
        self.check_tenant(auth)?;

        if draft.name.trim().is_empty() {
            return Err(CoreError::validation("secret name cannot be empty"));
        }
        if draft.value.is_empty() {
            return Err(CoreError::validation("secret value cannot be empty"));
        }
        if draft.status == SecretStatus::Expired {
            return Err(CoreError::validation(
                "status 'expired' is derived from expires_at and cannot be set directly",
            ));
        }

        let now = Utc::now();
        let record = Secret {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            tool: draft.tool,
            key_type: draft.key_type,
            value_hash: Some(hash_value(&draft.value)),
            value: draft.value,
            tags: draft.tags,
            client_id: draft.client_id,
            status: draft.status,
            expires_at: draft.expires_at,
            created_at: now,
            updated_at: now,
            created_by: auth.principal.id,
            last_accessed_at: None,
            access_count: 0,
            notes: draft.notes,
            visibility: draft.visibility.unwrap_or_default(),
        };

        self.repo.insert(self.tenant, &record).await?;
        // Prepend: list order is reverse chronological.
        self.secrets.insert(0, record.clone());
        tracing::info!(
            tenant_id = %self.tenant,
            secret_id = %record.id,
            user_id = %auth.principal.id,
            "Secret created"
        );
        Ok(record)
    }

    /// Applies a patch to an existing secret. Requires the manage capability.
    pub async fn update(
        &mut self,
        auth: &AuthContext,
        id: Uuid,
        patch: SecretPatch,
    ) -> Result<Secret, CoreError> {
        if !can_manage_secrets(auth.role) {
            return Err(CoreError::permission_denied("manage_secrets"));
        }
        self.check_tenant(auth)?;

        let position = self
            .secrets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("secret", id))?;

        let mut next = self.secrets[position].clone();
        if let Some(status) = patch.status {
            validate_status_change(next.status, status)?;
            next.status = status;
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(CoreError::validation("secret name cannot be empty"));
            }
            next.name = name;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(tool) = patch.tool {
            next.tool = tool;
        }
        if let Some(key_type) = patch.key_type {
            next.key_type = key_type;
        }
        if let Some(value) = patch.value {
            if value.is_empty() {
                return Err(CoreError::validation("secret value cannot be empty"));
            }
            next.value_hash = Some(hash_value(&value));
            next.value = value;
        }
        if let Some(tags) = patch.tags {
            next.tags = tags;
        }
        if let Some(client_id) = patch.client_id {
            next.client_id = client_id;
        }
        if let Some(expires_at) = patch.expires_at {
            next.expires_at = expires_at;
        }
        if let Some(notes) = patch.notes {
            next.notes = notes;
        }
        if let Some(visibility) = patch.visibility {
            next.visibility = visibility;
        }
        next.updated_at = Utc::now();

        self.repo.update(self.tenant, &next).await?;
        self.secrets[position] = next.clone();
        tracing::info!(
            tenant_id = %self.tenant,
            secret_id = %id,
            user_id = %auth.principal.id,
            "Secret updated"
        );
        Ok(next)
    }

    /// Deletes a secret. Requires the manage capability. Deleting an id that
    /// does not exist is a no-op success.
    pub async fn delete(&mut self, auth: &AuthContext, id: Uuid) -> Result<(), CoreError> {
        if !can_manage_secrets(auth.role) {
            return Err(CoreError::permission_denied("manage_secrets"));
        }
        self.check_tenant(auth)?;

        let removed = self.repo.delete(self.tenant, id).await?;
        self.secrets.retain(|s| s.id != id);
        if removed {
            tracing::info!(
                tenant_id = %self.tenant,
                secret_id = %id,
                user_id = %auth.principal.id,
                "Secret deleted"
            );
        }
        Ok(())
    }

    /// Returns the plaintext value and records the access. Requires the view
    /// capability. This is the only operation that increments `access_count`.
    pub async fn copy_value(
        &mut self,
        auth: &AuthContext,
        id: Uuid,
    ) -> Result<Plaintext, CoreError> {
        if !can_view_secrets(auth.role) {
            return Err(CoreError::permission_denied("view_secrets"));
        }
        self.check_tenant(auth)?;

        let position = self
            .secrets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("secret", id))?;

        let mut next = self.secrets[position].clone();
        next.access_count += 1;
        next.last_accessed_at = Some(Utc::now());

        self.repo.update(self.tenant, &next).await?;
        let value = next.value.clone();
        self.secrets[position] = next;
        tracing::info!(
            tenant_id = %self.tenant,
            secret_id = %id,
            user_id = %auth.principal.id,
            "Secret value copied"
        );
        Ok(Plaintext(value))
    }

    /// Marks a secret as revealed. Requires the view capability. Does not
    /// touch the access counter.
    pub async fn reveal(&mut self, auth: &AuthContext, id: Uuid) -> Result<(), CoreError> {
        if !can_view_secrets(auth.role) {
            return Err(CoreError::permission_denied("view_secrets"));
        }
        self.check_tenant(auth)?;
        self.set_visibility(id, Visibility::Visible).await
    }

    /// Masks a secret again. Unrestricted: any caller who can see the masked
    /// list may hide. Does not touch the access counter.
    pub async fn hide(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.set_visibility(id, Visibility::Masked).await
    }

    async fn set_visibility(&mut self, id: Uuid, visibility: Visibility) -> Result<(), CoreError> {
        let position = self
            .secrets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("secret", id))?;

        let mut next = self.secrets[position].clone();
        next.visibility = visibility;
        self.repo.update(self.tenant, &next).await?;
        self.secrets[position] = next;
        Ok(())
    }

    /// Lists secrets matching the filters. Fails closed: a caller without
    /// the view capability gets an empty list regardless of filters.
    pub fn list_filtered(&self, auth: &AuthContext, filters: &SecretFilters) -> Vec<&Secret> {
        if !can_view_secrets(auth.role) || auth.tenant != self.tenant {
            return Vec::new();
        }
        let now = Utc::now();
        self.secrets
            .iter()
            .filter(|s| filter::matches(s, filters, now))
            .collect()
    }

    /// Persists `status = expired` for secrets whose expiry has passed.
    ///
    /// Expiry is always derived through the pure predicate on read paths;
    /// this explicit pass is the one place stored status catches up. Returns
    /// how many rows were corrected.
    pub async fn reconcile_expiry(&mut self) -> Result<usize, CoreError> {
        let now = Utc::now();
        let mut corrected = 0;
        for position in 0..self.secrets.len() {
            let secret = &self.secrets[position];
            if secret.status != SecretStatus::Expired && is_expired(secret, now) {
                let mut next = secret.clone();
                next.status = SecretStatus::Expired;
                self.repo.update(self.tenant, &next).await?;
                self.secrets[position] = next;
                corrected += 1;
            }
        }
        if corrected > 0 {
            tracing::info!(
                tenant_id = %self.tenant,
                corrected,
                "Reconciled expired secrets"
            );
        }
        Ok(corrected)
    }

    /// Dashboard counters over the current collection.
    pub fn stats(&self) -> SecretStats {
        filter::stats(&self.secrets, Utc::now())
    }

    /// Serializes the collection as an export document. Requires the view
    /// capability.
    pub fn export_json(&self, auth: &AuthContext) -> Result<String, CoreError> {
        if !can_view_secrets(auth.role) {
            return Err(CoreError::permission_denied("view_secrets"));
        }
        self.check_tenant(auth)?;
        transfer::export_json(&self.secrets)
    }

    /// Imports an export document, merging by id; existing ids win. Requires
    /// the manage capability. All-or-nothing: a malformed payload applies
    /// nothing. Returns how many secrets were added.
    pub async fn import_json(
        &mut self,
        auth: &AuthContext,
        payload: &str,
    ) -> Result<usize, CoreError> {
        if !can_manage_secrets(auth.role) {
            return Err(CoreError::permission_denied("manage_secrets"));
        }
        self.check_tenant(auth)?;

        let incoming = transfer::parse_import(payload)?;
        let accepted = transfer::merge_by_id(&self.secrets, incoming);

        // One transaction for the whole batch, so a failed insert leaves
        // neither the store nor the cache with a partial import.
        self.repo.insert_many(self.tenant, &accepted).await?;
        let added = accepted.len();
        // Imported records go to the end: they are older than anything the
        // session created, and the original appended them the same way.
        self.secrets.extend(accepted);
        tracing::info!(
            tenant_id = %self.tenant,
            added,
            user_id = %auth.principal.id,
            "Secrets imported"
        );
        Ok(added)
    }
}
