//! # Error Handling
//!
//! Unified error taxonomy for the DromeFlow core. Authorization failures are
//! always produced before existence checks so that an unauthorized caller can
//! never learn whether a tenant-scoped row exists.

use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the core to its callers.
///
/// Every variant is recoverable at the call site; nothing in this crate
/// panics on one of these.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller's effective role lacks the required capability.
    #[error("permission denied: role lacks capability '{capability}'")]
    PermissionDenied {
        /// Capability that was required, e.g. `manage_secrets`.
        capability: &'static str,
    },

    /// The entity does not exist within the caller's tenant.
    #[error("{entity} '{id}' not found in tenant")]
    NotFound { entity: &'static str, id: String },

    /// A required field is missing or an illegal state transition was requested.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Retryable infrastructure failure. Only the tenant-resolution boundary
    /// retries these; everywhere else they surface immediately.
    #[error("transient store failure: {0}")]
    TransientStore(#[source] DbErr),

    /// Non-transient store failure, surfaced immediately.
    #[error("store failure: {0}")]
    Store(#[source] DbErr),

    /// The import payload failed to parse or lacked the expected shape.
    /// Nothing is applied when this is returned.
    #[error("malformed import: {message}")]
    MalformedImport { message: String },
}

impl CoreError {
    pub fn permission_denied(capability: &'static str) -> Self {
        CoreError::PermissionDenied { capability }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
        }
    }

    pub fn malformed_import(message: impl Into<String>) -> Self {
        CoreError::MalformedImport {
            message: message.into(),
        }
    }

    /// Whether the tenant-resolution retry loop may re-attempt after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::TransientStore(_))
    }
}

/// Classifies a SeaORM error as transient (connection-level) or permanent.
///
/// Connection acquisition and lost-connection failures are the consistency
/// lag the tenant bootstrap absorbs; query and execution errors are not.
pub fn classify_db_err(err: DbErr) -> CoreError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => CoreError::TransientStore(err),
        _ => CoreError::Store(err),
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        classify_db_err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_are_transient() {
        let err = classify_db_err(DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "connection refused".to_string(),
        )));
        assert!(err.is_transient());
    }

    #[test]
    fn query_errors_are_permanent() {
        let err = classify_db_err(DbErr::Query(sea_orm::RuntimeErr::Internal(
            "syntax error".to_string(),
        )));
        assert!(!err.is_transient());
        assert!(matches!(err, CoreError::Store(_)));
    }

    #[test]
    fn permission_denied_names_capability() {
        let err = CoreError::permission_denied("manage_secrets");
        assert_eq!(
            err.to_string(),
            "permission denied: role lacks capability 'manage_secrets'"
        );
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::not_found("secret", "abc");
        assert_eq!(err.to_string(), "secret 'abc' not found in tenant");
    }
}
