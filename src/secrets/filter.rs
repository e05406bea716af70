//! Filtering and statistics over the secrets collection.
//!
//! The match predicate is pure; the store applies it after its fail-closed
//! permission check. Filter stages run in a fixed order: tool, client, tags,
//! status, expiry, free-text search.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::secrets::lifecycle::is_expired;
use crate::secrets::record::{Secret, SecretStatus};

/// Caller-selected filters for listing secrets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretFilters {
    /// Exact tool id to match.
    #[serde(default)]
    pub tool: Option<String>,
    /// Exact owning client id to match.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Tags the secret must all carry (AND semantics).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Include secrets that are already past their expiry.
    #[serde(default)]
    pub show_expired: bool,
    /// Include inactive and revoked secrets.
    #[serde(default)]
    pub show_inactive: bool,
    /// Case-insensitive substring over name, description, tool, client id,
    /// tags, and notes.
    #[serde(default)]
    pub search: Option<String>,
}

/// Whether a secret passes the given filters at `now`.
pub fn matches(secret: &Secret, filters: &SecretFilters, now: DateTime<Utc>) -> bool {
    if let Some(tool) = &filters.tool
        && secret.tool != *tool
    {
        return false;
    }

    if let Some(client_id) = &filters.client_id
        && secret.client_id != *client_id
    {
        return false;
    }

    if !filters.tags.is_empty()
        && !filters
            .tags
            .iter()
            .all(|tag| secret.tags.iter().any(|t| t == tag))
    {
        return false;
    }

    if !filters.show_inactive
        && matches!(
            secret.status,
            SecretStatus::Inactive | SecretStatus::Revoked
        )
    {
        return false;
    }

    if !filters.show_expired && is_expired(secret, now) {
        return false;
    }

    if let Some(query) = filters.search.as_deref()
        && !query.trim().is_empty()
    {
        let needle = query.to_lowercase();
        let haystack = [
            secret.name.as_str(),
            secret.description.as_deref().unwrap_or(""),
            secret.tool.as_str(),
            secret.client_id.as_str(),
            &secret.tags.join(" "),
            secret.notes.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }

    true
}

/// Counters shown on the vault dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretStats {
    pub total: usize,
    pub expiring_within_7_days: usize,
    pub expired: usize,
    pub inactive_or_revoked: usize,
}

/// Computes stats over the collection using `now` at call time.
pub fn stats(secrets: &[Secret], now: DateTime<Utc>) -> SecretStats {
    let seven_days = now + Duration::days(7);
    SecretStats {
        total: secrets.len(),
        expiring_within_7_days: secrets
            .iter()
            .filter(|s| {
                s.expires_at
                    .is_some_and(|at| at >= now && at <= seven_days)
            })
            .count(),
        expired: secrets.iter().filter(|s| is_expired(s, now)).count(),
        inactive_or_revoked: secrets
            .iter()
            .filter(|s| {
                matches!(s.status, SecretStatus::Inactive | SecretStatus::Revoked)
            })
            .count(),
    }
}
