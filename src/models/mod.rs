//! # Data Models
//!
//! SeaORM entity models for the tenant-scoped tables of the DromeFlow core.

pub mod secret;
pub mod tenant;
pub mod tenant_member;
pub mod user_role;

pub use secret::Entity as Secret;
pub use tenant::Entity as Tenant;
pub use tenant_member::Entity as TenantMember;
pub use user_role::Entity as UserRole;
