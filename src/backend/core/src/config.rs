//! Configuration management.
//!
//! Values come from environment variables prefixed with `CONTACTS`, using `__`
//! as the section separator (for example `CONTACTS__SEED__ADMIN_PASSWORD`),
//! optionally layered over a configuration file. Every field has a default.

use serde::Deserialize;
use std::fmt;

use crate::error::Result;
use crate::seed::{
    SeedCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USER_NAME, DEFAULT_MANAGER_PASSWORD,
    DEFAULT_MANAGER_USER_NAME,
};
use crate::store::PasswordPolicy;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seeded accounts
    #[serde(default)]
    pub seed: SeedConfig,

    /// Identity store settings
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Clone, Deserialize)]
pub struct SeedConfig {
    /// Run seeding at startup
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,

    #[serde(default = "default_admin_user_name")]
    pub admin_user_name: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_manager_user_name")]
    pub manager_user_name: String,

    #[serde(default = "default_manager_password")]
    pub manager_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
            admin_user_name: default_admin_user_name(),
            admin_password: default_admin_password(),
            manager_user_name: default_manager_user_name(),
            manager_password: default_manager_password(),
        }
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("enabled", &self.enabled)
            .field("admin_user_name", &self.admin_user_name)
            .field("admin_password", &"[REDACTED]")
            .field("manager_user_name", &self.manager_user_name)
            .field("manager_password", &"[REDACTED]")
            .finish()
    }
}

impl SeedConfig {
    pub fn credentials(&self) -> SeedCredentials {
        SeedCredentials {
            admin_user_name: self.admin_user_name.clone(),
            admin_password: self.admin_password.clone(),
            manager_user_name: self.manager_user_name.clone(),
            manager_password: self.manager_password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Password composition rules
    #[serde(default)]
    pub password: PasswordPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: json, pretty or compact
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// Default value functions
fn default_seed_enabled() -> bool { true }
fn default_admin_user_name() -> String { DEFAULT_ADMIN_USER_NAME.to_string() }
fn default_admin_password() -> String { DEFAULT_ADMIN_PASSWORD.to_string() }
fn default_manager_user_name() -> String { DEFAULT_MANAGER_USER_NAME.to_string() }
fn default_manager_password() -> String { DEFAULT_MANAGER_PASSWORD.to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("CONTACTS").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with the environment layered on top.
    pub fn from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CONTACTS").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_defaults_match_seed_credentials() {
        let cfg = Config::default();
        assert!(cfg.seed.enabled);
        assert_eq!(cfg.seed.credentials(), SeedCredentials::default());
        assert_eq!(cfg.identity.password, PasswordPolicy::default());
        assert_eq!(cfg.observability.log_level, "info");
    }

    #[test]
    fn test_seed_config_debug_redacts() {
        let debug = format!("{:?}", Config::default());
        assert!(!debug.contains(DEFAULT_ADMIN_PASSWORD));
        assert!(!debug.contains(DEFAULT_MANAGER_PASSWORD));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[seed]
admin_user_name = "root@example.com"
manager_password = "Manager#2024"

[identity.password]
required_length = 10
require_non_alphanumeric = false

[observability]
log_format = "pretty"
"#
        )
        .unwrap();

        let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.seed.admin_user_name, "root@example.com");
        assert_eq!(cfg.seed.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert_eq!(cfg.seed.manager_password, "Manager#2024");
        assert_eq!(cfg.identity.password.required_length, 10);
        assert!(!cfg.identity.password.require_non_alphanumeric);
        assert!(cfg.identity.password.require_digit);
        assert_eq!(cfg.observability.log_format, "pretty");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = Config::from_file("/nonexistent/contacts-config.toml").unwrap_err();
        assert!(matches!(
            err.code(),
            ErrorCode::MissingConfiguration | ErrorCode::ConfigurationError
        ));
    }
}
