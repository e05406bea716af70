//! Database migrations for the DromeFlow core.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_01_01_000001_create_tenants;
mod m2024_01_01_000002_create_tenant_members;
mod m2024_01_01_000003_create_user_roles;
mod m2024_01_01_000004_create_secrets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_01_01_000001_create_tenants::Migration),
            Box::new(m2024_01_01_000002_create_tenant_members::Migration),
            Box::new(m2024_01_01_000003_create_user_roles::Migration),
            Box::new(m2024_01_01_000004_create_secrets::Migration),
        ]
    }
}
