//! Domain record types for secrets.
//!
//! [`Secret`] is the in-memory and wire (export) representation; the SeaORM
//! entity in `models::secret` is its storage shape. Conversion between the
//! two happens at the repository boundary, which is also where stored enum
//! strings are validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::secret::Model as SecretModel;

/// Sentinel client id for secrets not bound to a specific client.
pub const GENERIC_CLIENT_ID: &str = "generico";

/// Kind of credential under management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    ApiKey,
    Token,
    Password,
    ConnectionString,
    Oauth,
    WebhookSecret,
    PrivateKey,
    ServiceRoleKey,
    AccessToken,
}

impl KeyType {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::ApiKey => "api_key",
            KeyType::Token => "token",
            KeyType::Password => "password",
            KeyType::ConnectionString => "connection_string",
            KeyType::Oauth => "oauth",
            KeyType::WebhookSecret => "webhook_secret",
            KeyType::PrivateKey => "private_key",
            KeyType::ServiceRoleKey => "service_role_key",
            KeyType::AccessToken => "access_token",
        }
    }

    pub fn parse(value: &str) -> Option<KeyType> {
        match value {
            "api_key" => Some(KeyType::ApiKey),
            "token" => Some(KeyType::Token),
            "password" => Some(KeyType::Password),
            "connection_string" => Some(KeyType::ConnectionString),
            "oauth" => Some(KeyType::Oauth),
            "webhook_secret" => Some(KeyType::WebhookSecret),
            "private_key" => Some(KeyType::PrivateKey),
            "service_role_key" => Some(KeyType::ServiceRoleKey),
            "access_token" => Some(KeyType::AccessToken),
            _ => None,
        }
    }
}

/// Lifecycle status of a secret.
///
/// `Expired` is derived from `expires_at` and never caller-settable;
/// `Revoked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretStatus {
    Active,
    Inactive,
    Revoked,
    Expired,
}

impl SecretStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SecretStatus::Active => "active",
            SecretStatus::Inactive => "inactive",
            SecretStatus::Revoked => "revoked",
            SecretStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<SecretStatus> {
        match value {
            "active" => Some(SecretStatus::Active),
            "inactive" => Some(SecretStatus::Inactive),
            "revoked" => Some(SecretStatus::Revoked),
            "expired" => Some(SecretStatus::Expired),
            _ => None,
        }
    }
}

/// How the secret's value is rendered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    #[default]
    Masked,
    Visible,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Hidden => "hidden",
            Visibility::Masked => "masked",
            Visibility::Visible => "visible",
        }
    }

    pub fn parse(value: &str) -> Option<Visibility> {
        match value {
            "hidden" => Some(Visibility::Hidden),
            "masked" => Some(Visibility::Masked),
            "visible" => Some(Visibility::Visible),
            _ => None,
        }
    }
}

/// A credential under management, scoped to the caller's tenant.
///
/// The tenant id is deliberately not part of this type: tenant scoping is the
/// repository's concern, and export documents must not leak it across tenants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tool: String,
    pub key_type: KeyType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_hash: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub client_id: String,
    pub status: SecretStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Secret {
    /// Reconstructs the domain record from its storage row.
    ///
    /// Stored enum strings are validated here; a row with an unknown status,
    /// key type, or visibility is a store-level corruption, not caller input,
    /// so it surfaces as a validation failure naming the column.
    pub fn from_model(model: SecretModel) -> Result<Secret, CoreError> {
        let key_type = KeyType::parse(&model.key_type).ok_or_else(|| {
            CoreError::validation(format!("unknown key_type '{}' in store", model.key_type))
        })?;
        let status = SecretStatus::parse(&model.status).ok_or_else(|| {
            CoreError::validation(format!("unknown status '{}' in store", model.status))
        })?;
        let visibility = Visibility::parse(&model.visibility).ok_or_else(|| {
            CoreError::validation(format!(
                "unknown visibility '{}' in store",
                model.visibility
            ))
        })?;
        let tags: Vec<String> = serde_json::from_value(model.tags)
            .map_err(|e| CoreError::validation(format!("malformed tags column: {e}")))?;

        Ok(Secret {
            id: model.id,
            name: model.name,
            description: model.description,
            tool: model.tool,
            key_type,
            value: model.value,
            value_hash: model.value_hash,
            tags,
            client_id: model.client_id,
            status,
            expires_at: model.expires_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            created_by: model.created_by,
            last_accessed_at: model.last_accessed_at.map(|t| t.with_timezone(&Utc)),
            access_count: model.access_count.max(0) as u64,
            notes: model.notes,
            visibility,
        })
    }
}

/// Caller-supplied fields for creating a secret.
///
/// Identity, timestamps, and the value hash are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tool: String,
    pub key_type: KeyType,
    pub value: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_status")]
    pub status: SecretStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

fn default_client_id() -> String {
    GENERIC_CLIENT_ID.to_string()
}

fn default_status() -> SecretStatus {
    SecretStatus::Active
}

/// Partial update for a secret.
///
/// `id`, `created_at`, and the owning tenant cannot appear here, so a patch
/// can never move a secret between tenants or rewrite its identity. Nullable
/// fields use a double `Option`: the outer level means "present in the
/// patch", the inner level is the new value.
#[derive(Debug, Clone, Default)]
pub struct SecretPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub tool: Option<String>,
    pub key_type: Option<KeyType>,
    pub value: Option<String>,
    pub tags: Option<Vec<String>>,
    pub client_id: Option<String>,
    pub status: Option<SecretStatus>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
    pub visibility: Option<Visibility>,
}
