//! Pure lifecycle rules for secrets.
//!
//! Everything in this module is a pure function of its inputs: masking,
//! hashing, expiry derivation, display rendering, and the status transition
//! rules. The store facade applies these; nothing here touches storage.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CoreError;
use crate::secrets::record::{Secret, SecretStatus, Visibility};

/// Character used for the masked interior run.
const MASK_CHAR: char = '\u{2022}';

/// Minimum interior run length, applied even to short values.
const MIN_MASK_RUN: usize = 4;

/// Number of leading and trailing characters left visible.
const VISIBLE_EDGE: usize = 4;

/// Masks a credential value, preserving the first and last four characters.
///
/// The interior is replaced with `max(len - 8, 4)` mask characters. This
/// exact rule is relied on by existing exports and must not change.
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    let start: String = chars.iter().take(VISIBLE_EDGE).collect();
    let end: String = chars
        .iter()
        .skip(chars.len().saturating_sub(VISIBLE_EDGE))
        .collect();
    let run = chars.len().saturating_sub(2 * VISIBLE_EDGE).max(MIN_MASK_RUN);
    let mut masked = String::with_capacity(start.len() + run * MASK_CHAR.len_utf8() + end.len());
    masked.push_str(&start);
    for _ in 0..run {
        masked.push(MASK_CHAR);
    }
    masked.push_str(&end);
    masked
}

/// One-way hash of a credential value (hex-encoded SHA-256).
///
/// Recomputed whenever the value changes; never usable to recover the value.
pub fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        // Infallible for String.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Constant-time check of a candidate value against a stored hash.
///
/// Lets a caller confirm they hold the right credential without the value
/// ever being revealed or the comparison leaking a prefix length.
pub fn verify_value(secret: &Secret, candidate: &str) -> bool {
    match &secret.value_hash {
        Some(stored) => {
            let candidate_hash = hash_value(candidate);
            stored.as_bytes().ct_eq(candidate_hash.as_bytes()).into()
        }
        None => false,
    }
}

/// Whether the secret has passed its expiry timestamp.
///
/// This predicate is the single source of truth for expiry on every read
/// path; stored status is only reconciled to it by an explicit pass.
pub fn is_expired(secret: &Secret, now: DateTime<Utc>) -> bool {
    secret.expires_at.is_some_and(|at| at < now)
}

/// Renders the value for display.
///
/// The real value is shown only when the secret is currently revealed and
/// the caller holds the view capability; every other combination gets the
/// masked rendering.
pub fn display_value(secret: &Secret, caller_can_view: bool) -> String {
    if secret.visibility == Visibility::Visible && caller_can_view {
        secret.value.clone()
    } else {
        mask_value(&secret.value)
    }
}

/// Validates a caller-requested status change.
///
/// `expired` is derived state and never settable; `revoked` is terminal, so
/// the only status a revoked secret may be patched to is `revoked` itself.
pub fn validate_status_change(
    current: SecretStatus,
    requested: SecretStatus,
) -> Result<(), CoreError> {
    if requested == SecretStatus::Expired && current != SecretStatus::Expired {
        return Err(CoreError::validation(
            "status 'expired' is derived from expires_at and cannot be set directly",
        ));
    }
    if current == SecretStatus::Revoked && requested != SecretStatus::Revoked {
        return Err(CoreError::validation(
            "a revoked secret cannot transition to another status",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::record::KeyType;
    use chrono::Duration;
    use uuid::Uuid;

    fn sample_secret(value: &str) -> Secret {
        let now = Utc::now();
        Secret {
            id: Uuid::new_v4(),
            name: "Stripe Key".to_string(),
            description: None,
            tool: "stripe".to_string(),
            key_type: KeyType::ApiKey,
            value: value.to_string(),
            value_hash: Some(hash_value(value)),
            tags: vec![],
            client_id: "generico".to_string(),
            status: SecretStatus::Active,
            expires_at: None,
            created_at: now,
            updated_at: now,
            created_by: Uuid::new_v4(),
            last_accessed_at: None,
            access_count: 0,
            notes: None,
            visibility: Visibility::Masked,
        }
    }

    #[test]
    fn mask_preserves_edges() {
        let masked = mask_value("sk_live_AbCdEfGh1234");
        assert!(masked.starts_with("sk_l"));
        assert!(masked.ends_with("1234"));
        // len 20 => interior run of 12
        let interior: String = masked
            .chars()
            .skip(4)
            .take(masked.chars().count() - 8)
            .collect();
        assert_eq!(interior.chars().count(), 12);
        assert!(interior.chars().all(|c| c == '\u{2022}'));
    }

    #[test]
    fn mask_short_values_keeps_minimum_run() {
        // Matches the legacy rule: slice(0,4)/slice(-4) overlap for short
        // values, interior run pinned at 4.
        assert_eq!(mask_value("abc"), "abc\u{2022}\u{2022}\u{2022}\u{2022}abc");
        assert_eq!(
            mask_value("12345678"),
            "1234\u{2022}\u{2022}\u{2022}\u{2022}5678"
        );
    }

    #[test]
    fn mask_empty_is_empty() {
        assert_eq!(mask_value(""), "");
    }

    #[test]
    fn hash_is_stable_and_one_way_shaped() {
        let a = hash_value("sk_test_123");
        let b = hash_value("sk_test_123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_value("sk_test_124"));
    }

    #[test]
    fn verify_value_accepts_matching_candidate() {
        let secret = sample_secret("sk_test_123");
        assert!(verify_value(&secret, "sk_test_123"));
        assert!(!verify_value(&secret, "sk_test_999"));
    }

    #[test]
    fn verify_value_denies_without_hash() {
        let mut secret = sample_secret("sk_test_123");
        secret.value_hash = None;
        assert!(!verify_value(&secret, "sk_test_123"));
    }

    #[test]
    fn expiry_is_strictly_past() {
        let now = Utc::now();
        let mut secret = sample_secret("v");
        assert!(!is_expired(&secret, now));

        secret.expires_at = Some(now - Duration::days(1));
        assert!(is_expired(&secret, now));

        secret.expires_at = Some(now + Duration::days(1));
        assert!(!is_expired(&secret, now));
    }

    #[test]
    fn display_value_requires_visible_and_capability() {
        let mut secret = sample_secret("sk_live_AbCdEfGh1234");
        assert_eq!(
            display_value(&secret, true),
            mask_value("sk_live_AbCdEfGh1234")
        );

        secret.visibility = Visibility::Visible;
        assert_eq!(display_value(&secret, true), "sk_live_AbCdEfGh1234");
        // Revealed but caller cannot view: still masked.
        assert_eq!(
            display_value(&secret, false),
            mask_value("sk_live_AbCdEfGh1234")
        );
    }

    #[test]
    fn revoked_is_terminal() {
        assert!(validate_status_change(SecretStatus::Revoked, SecretStatus::Active).is_err());
        assert!(validate_status_change(SecretStatus::Revoked, SecretStatus::Inactive).is_err());
        assert!(validate_status_change(SecretStatus::Revoked, SecretStatus::Revoked).is_ok());
    }

    #[test]
    fn expired_is_not_caller_settable() {
        assert!(validate_status_change(SecretStatus::Active, SecretStatus::Expired).is_err());
        // Re-stating derived expired state is tolerated (import path).
        assert!(validate_status_change(SecretStatus::Expired, SecretStatus::Expired).is_ok());
    }

    #[test]
    fn active_inactive_revoked_transitions_allowed() {
        assert!(validate_status_change(SecretStatus::Active, SecretStatus::Inactive).is_ok());
        assert!(validate_status_change(SecretStatus::Inactive, SecretStatus::Active).is_ok());
        assert!(validate_status_change(SecretStatus::Active, SecretStatus::Revoked).is_ok());
        assert!(validate_status_change(SecretStatus::Inactive, SecretStatus::Revoked).is_ok());
    }
}
