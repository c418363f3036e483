//! Contacts CLI - Command-line interface for the contact manager core.
//!
//! Provides commands for seeding, authorization checks, and configuration.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{authorize, config, seed};
use contacts_core::config::Config;
use contacts_core::{telemetry, ContactsError};
use output::OutputFormat;

/// Contacts - contact manager seeding and authorization CLI
#[derive(Parser)]
#[command(
    name = "contacts",
    version = "0.1.0",
    about = "Contacts - contact manager seeding and authorization",
    long_about = "CLI tool for seeding the contact manager and checking contact permissions.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Configuration file layered under CONTACTS__* environment variables
    #[arg(long, global = true, env = "CONTACTS_CONFIG")]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed accounts, roles and sample contacts
    Seed(seed::SeedArgs),

    /// Check whether a user may perform an operation
    Authorize(authorize::AuthorizeArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

/// The core error behind a failed command, if there is one.
fn core_error(error: &anyhow::Error) -> Option<&ContactsError> {
    error.downcast_ref::<ContactsError>()
}

fn load_config(path: Option<&str>) -> contacts_core::Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let app_config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init(&app_config.observability) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
    tracing::debug!(command_output = ?cli.output, "Starting contacts CLI");

    let format = cli.output;
    let result = match cli.command {
        Commands::Seed(args) => seed::execute(args, &app_config, format).await,
        Commands::Authorize(args) => authorize::execute(args, &app_config, format).await,
        Commands::Config(cmd) => config::execute(cmd, &app_config, format).await,
    };

    if let Err(e) = result {
        if let Some(core) = core_error(&e) {
            core.log();
        }
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
