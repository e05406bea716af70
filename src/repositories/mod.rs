//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations for the core's entities. Every
//! method touching tenant-scoped data takes the tenant id and filters on the
//! tenant column; rows of other tenants are never returned or mutated.

pub mod secret;
pub mod tenant;
pub mod user_role;

pub use secret::SecretRepository;
pub use tenant::TenantRepository;
pub use user_role::UserRoleRepository;
