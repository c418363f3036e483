//! Configuration commands.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use contacts_core::config::Config;

use crate::output::{self, OutputFormat};

const REDACTED: &str = "[REDACTED]";

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

/// Effective configuration with secrets removed.
#[derive(Debug, Serialize)]
struct ConfigView {
    seed_enabled: bool,
    admin_user_name: String,
    admin_password: &'static str,
    manager_user_name: String,
    manager_password: &'static str,
    password_required_length: usize,
    password_require_digit: bool,
    password_require_lowercase: bool,
    password_require_uppercase: bool,
    password_require_non_alphanumeric: bool,
    log_level: String,
    log_format: String,
}

impl From<&Config> for ConfigView {
    fn from(config: &Config) -> Self {
        let policy = &config.identity.password;
        Self {
            seed_enabled: config.seed.enabled,
            admin_user_name: config.seed.admin_user_name.clone(),
            admin_password: REDACTED,
            manager_user_name: config.seed.manager_user_name.clone(),
            manager_password: REDACTED,
            password_required_length: policy.required_length,
            password_require_digit: policy.require_digit,
            password_require_lowercase: policy.require_lowercase,
            password_require_uppercase: policy.require_uppercase,
            password_require_non_alphanumeric: policy.require_non_alphanumeric,
            log_level: config.observability.log_level.clone(),
            log_format: config.observability.log_format.clone(),
        }
    }
}

pub async fn execute(cmd: ConfigCommands, config: &Config, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let view = ConfigView::from(config);
            match format {
                OutputFormat::Table => {
                    output::print_header("Configuration");
                    output::print_detail("Seed enabled", &view.seed_enabled.to_string());
                    output::print_detail("Admin user", &view.admin_user_name);
                    output::print_detail("Admin password", view.admin_password);
                    output::print_detail("Manager user", &view.manager_user_name);
                    output::print_detail("Manager password", view.manager_password);
                    output::print_detail(
                        "Password length",
                        &view.password_required_length.to_string(),
                    );
                    output::print_detail(
                        "Password classes",
                        &format!(
                            "digit={} lower={} upper={} symbol={}",
                            view.password_require_digit,
                            view.password_require_lowercase,
                            view.password_require_uppercase,
                            view.password_require_non_alphanumeric
                        ),
                    );
                    output::print_detail("Log level", &view.log_level);
                    output::print_detail("Log format", &view.log_format);
                }
                _ => output::print_item(&view, format)?,
            }
        }
    }

    Ok(())
}
