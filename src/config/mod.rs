//! Configuration loading for the DromeFlow core.
//!
//! Loads a `.env` file (if present) and environment variables prefixed with
//! `DROMEFLOW_`, producing a typed [`AppConfig`].

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tenancy::RetryPolicy;

/// Application configuration derived from `DROMEFLOW_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    #[serde(default)]
    pub tenant_bootstrap: TenantBootstrapConfig,
}

/// Retry knobs for the tenant bootstrap-on-first-login sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TenantBootstrapConfig {
    /// Total attempts for the create-if-absent sequence (default: 3)
    ///
    /// Environment variable: `DROMEFLOW_TENANT_BOOTSTRAP_MAX_ATTEMPTS`
    #[serde(default = "default_tenant_bootstrap_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds (default: 1000)
    ///
    /// Environment variable: `DROMEFLOW_TENANT_BOOTSTRAP_RETRY_DELAY_MS`
    #[serde(default = "default_tenant_bootstrap_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for TenantBootstrapConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_tenant_bootstrap_max_attempts(),
            retry_delay_ms: default_tenant_bootstrap_retry_delay_ms(),
        }
    }
}

impl TenantBootstrapConfig {
    /// The retry policy the tenant guard should run with.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            tenant_bootstrap: TenantBootstrapConfig::default(),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

const ENV_PREFIX: &str = "DROMEFLOW_";

impl AppConfig {
    /// Loads configuration from `.env` and the process environment.
    ///
    /// Process environment wins over `.env` entries (dotenvy does not
    /// override variables that are already set).
    pub fn load() -> Result<AppConfig, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = AppConfig::default();

        if let Some(profile) = read_string("PROFILE") {
            config.profile = profile;
        }
        if let Some(log_level) = read_string("LOG_LEVEL") {
            config.log_level = log_level;
        }
        if let Some(log_format) = read_string("LOG_FORMAT") {
            config.log_format = log_format;
        }
        if let Some(database_url) = read_string("DATABASE_URL") {
            config.database_url = database_url;
        }
        if let Some(value) = read_string("DB_MAX_CONNECTIONS") {
            config.db_max_connections = parse(value, "DB_MAX_CONNECTIONS")?;
        }
        if let Some(value) = read_string("DB_ACQUIRE_TIMEOUT_MS") {
            config.db_acquire_timeout_ms = parse(value, "DB_ACQUIRE_TIMEOUT_MS")?;
        }
        if let Some(value) = read_string("TENANT_BOOTSTRAP_MAX_ATTEMPTS") {
            config.tenant_bootstrap.max_attempts = parse(value, "TENANT_BOOTSTRAP_MAX_ATTEMPTS")?;
        }
        if let Some(value) = read_string("TENANT_BOOTSTRAP_RETRY_DELAY_MS") {
            config.tenant_bootstrap.retry_delay_ms =
                parse(value, "TENANT_BOOTSTRAP_RETRY_DELAY_MS")?;
        }

        Ok(config)
    }
}

fn read_string(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .filter(|v| !v.is_empty())
}

fn parse<T: std::str::FromStr>(value: String, key: &'static str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn default_profile() -> String {
    "dev".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_acquire_timeout_ms() -> u64 {
    5_000
}

fn default_tenant_bootstrap_max_attempts() -> u32 {
    3
}

fn default_tenant_bootstrap_retry_delay_ms() -> u64 {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.profile, "dev");
        assert_eq!(config.tenant_bootstrap.max_attempts, 3);
        assert_eq!(config.tenant_bootstrap.retry_delay_ms, 1_000);
    }

    #[test]
    fn retry_policy_reflects_config() {
        let bootstrap = TenantBootstrapConfig {
            max_attempts: 5,
            retry_delay_ms: 250,
        };
        let policy = bootstrap.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[test]
    fn invalid_numeric_value_is_reported() {
        let result: Result<u32, _> = parse("not-a-number".to_string(), "DB_MAX_CONNECTIONS");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
