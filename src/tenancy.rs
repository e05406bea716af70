//! # Tenant Isolation Guard
//!
//! Tenant resolution at session start: look up the principal's membership,
//! and bootstrap a fresh tenant with an admin membership on first login. The
//! whole create-if-absent sequence runs under a bounded retry with a fixed
//! delay to absorb transient consistency lag right after sign-in; this is
//! the only place in the core that retries.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::time::sleep;

use crate::auth::{Principal, TenantId};
use crate::error::CoreError;
use crate::repositories::TenantRepository;

/// Membership role granted to the principal that bootstraps a tenant.
const BOOTSTRAP_MEMBER_ROLE: &str = "admin";

/// Bounded retry parameters for transient store failures.
///
/// Parameterized rather than hard-coded so tests can run with zero delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy with no delay, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Runs an operation, retrying only transient store failures.
///
/// Permanent errors propagate immediately; transient ones are retried up to
/// `max_attempts` total tries with a fixed delay, then surfaced as-is.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut f: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    error = %err,
                    "Transient store failure, will retry"
                );
                last_err = Some(err);
                if attempt < attempts {
                    sleep(policy.delay).await;
                }
            }
            Err(err) => return Err(err),
        }
    }

    let err = last_err.unwrap_or_else(|| {
        CoreError::validation("retry loop exhausted without an error recorded")
    });
    tracing::error!(
        operation,
        max_attempts = attempts,
        "Giving up after exhausted retries"
    );
    Err(err)
}

/// Resolves the principal's active tenant, creating one on first login.
///
/// Lookup and bootstrap run as one retried sequence: if the membership row is
/// absent, a tenant named after the principal's id prefix is created together
/// with an admin membership. After exhausted retries the caller sees the
/// transient failure and stays in the "no tenant" state.
pub async fn resolve_tenant(
    db: &Arc<DatabaseConnection>,
    policy: &RetryPolicy,
    principal: &Principal,
) -> Result<TenantId, CoreError> {
    let repo = TenantRepository::new(Arc::clone(db));
    let user_id = principal.id;
    let email = principal.email.clone();

    retry_transient(policy, "resolve_tenant", || {
        let repo = repo.clone();
        let email = email.clone();
        async move {
            if let Some(membership) = repo.find_membership(user_id).await? {
                tracing::debug!(
                    user_id = %user_id,
                    tenant_id = %membership.tenant_id,
                    "Tenant membership found"
                );
                return Ok(TenantId(membership.tenant_id));
            }

            let prefix: String = user_id.to_string().chars().take(8).collect();
            let tenant = repo
                .create_tenant(format!("Tenant {prefix}"), format!("tenant-{prefix}"))
                .await?;
            repo.create_membership(tenant.id, user_id, &email, BOOTSTRAP_MEMBER_ROLE)
                .await?;

            tracing::info!(
                user_id = %user_id,
                tenant_id = %tenant.id,
                "Bootstrapped tenant on first login"
            );
            Ok(TenantId(tenant.id))
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, RuntimeErr};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> CoreError {
        CoreError::TransientStore(DbErr::Conn(RuntimeErr::Internal(
            "connection reset".to_string(),
        )))
    }

    #[tokio::test]
    async fn succeeds_without_retry() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(&RetryPolicy::immediate(3), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, CoreError>(42) }
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(&RetryPolicy::immediate(3), "op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient())
                } else {
                    Ok(7)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = retry_transient(&RetryPolicy::immediate(3), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = retry_transient(&RetryPolicy::immediate(5), "op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(CoreError::validation("bad input")) }
        })
        .await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
