//! Export/import document format for secrets.
//!
//! The wire shape is `{ "secrets": [ ... ] }` with RFC 3339 timestamps and a
//! nullable `expires_at`. Import is all-or-nothing: the whole payload is
//! parsed and validated before anything is merged, and a merge keeps
//! existing ids untouched (incoming collisions are dropped, not overwritten).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::secrets::record::Secret;

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "dromeflow-secrets-export.json";

/// Top-level export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub secrets: Vec<Secret>,
}

/// Serializes a collection as a pretty-printed export document.
pub fn export_json(secrets: &[Secret]) -> Result<String, CoreError> {
    let document = ExportDocument {
        secrets: secrets.to_vec(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| CoreError::validation(format!("failed to serialize export: {e}")))
}

/// Parses an import payload, rejecting anything that is not the expected
/// shape. Timestamp strings are re-parsed into native timestamps by serde.
pub fn parse_import(payload: &str) -> Result<Vec<Secret>, CoreError> {
    let document: ExportDocument = serde_json::from_str(payload)
        .map_err(|e| CoreError::malformed_import(e.to_string()))?;
    Ok(document.secrets)
}

/// Merges incoming secrets against the existing collection by id.
///
/// Existing ids win: an incoming record whose id already exists is dropped.
/// Duplicate ids within the incoming batch keep the first occurrence.
pub fn merge_by_id(existing: &[Secret], incoming: Vec<Secret>) -> Vec<Secret> {
    let mut seen: HashSet<uuid::Uuid> = existing.iter().map(|s| s.id).collect();
    incoming
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect()
}
