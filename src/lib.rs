//! # DromeFlow Core
//!
//! Role-based access control, secrets lifecycle, and tenant isolation for
//! the DromeFlow operations dashboard. The UI and the generic CRUD surfaces
//! live elsewhere; this crate owns the policy and lifecycle contracts they
//! must go through.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod secrets;
pub mod tenancy;
pub use migration;
