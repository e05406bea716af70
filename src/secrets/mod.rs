//! # Secrets Vault Core
//!
//! Domain types, pure lifecycle rules, filtering, the store facade, and the
//! export/import format for tenant-scoped secrets.

pub mod filter;
pub mod lifecycle;
pub mod record;
pub mod store;
pub mod transfer;

pub use filter::{SecretFilters, SecretStats};
pub use record::{KeyType, Secret, SecretDraft, SecretPatch, SecretStatus, Visibility};
pub use store::{Plaintext, SecretsStore};
pub use transfer::ExportDocument;
