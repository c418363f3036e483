//! `contacts authorize`: run one request through the authorization pipeline.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use serde::Serialize;
use tabled::Tabled;

use contacts_core::config::Config;
use contacts_core::rbac::{
    AuthorizationResult, AuthorizationService, OperationRequirement, Principal,
};
use contacts_core::store::resolve_principal;

use super::Workspace;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct AuthorizeArgs {
    /// Operation name (Create, Read, Update, Delete, Approve, Reject)
    #[arg(short = 'p', long)]
    operation: String,

    /// Seeded user name to act as; anonymous when omitted
    #[arg(short, long)]
    user: Option<String>,

    /// Name of the seeded contact to act on; no resource when omitted
    #[arg(short, long)]
    contact: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct DecisionRow {
    #[tabled(rename = "Handler")]
    handler: String,
    #[tabled(rename = "Decision")]
    decision: String,
}

#[derive(Debug, Serialize)]
struct AuthorizeOutput {
    principal: String,
    operation: String,
    contact: Option<String>,
    allowed: bool,
    granted_by: Option<String>,
    decisions: Vec<DecisionRow>,
}

pub async fn execute(args: AuthorizeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let workspace = Workspace::new(config)?;
    if workspace.seeder.run(&config.seed).await?.is_none() {
        output::print_info("Seeding is disabled (seed.enabled = false); stores are empty");
    }

    let principal = match &args.user {
        Some(user_name) => {
            let user = workspace
                .identities
                .find_by_username(user_name)
                .await?
                .with_context(|| format!("Unknown user: {}", user_name))?;
            resolve_principal(workspace.identities.as_ref(), workspace.roles.as_ref(), &user.id)
                .await?
                .with_context(|| format!("Unknown user: {}", user_name))?
        }
        None => Principal::anonymous(),
    };

    let contact = match &args.contact {
        Some(name) => Some(
            workspace
                .contacts
                .find_by_name(name)
                .await?
                .with_context(|| format!("Unknown contact: {}", name))?,
        ),
        None => None,
    };

    let requirement = OperationRequirement::new(args.operation.as_str());
    let service = AuthorizationService::contacts_default();

    let decisions: Vec<DecisionRow> = service
        .evaluate_all(Some(&principal), &requirement, contact.as_ref())
        .into_iter()
        .map(|(handler, decision)| DecisionRow {
            handler: handler.to_string(),
            decision: format!("{:?}", decision),
        })
        .collect();
    let result = service.authorize(Some(&principal), &requirement, contact.as_ref());

    match format {
        OutputFormat::Table => {
            output::print_header(&format!("Authorize: {}", requirement));
            output::print_detail("Principal", &principal.to_string());
            output::print_detail(
                "Contact",
                contact.as_ref().map(|c| c.name.as_str()).unwrap_or("(none)"),
            );
            println!();
            output::print_list(&decisions, format)?;
            println!();
            if result.is_allowed() {
                println!("{} {}", "ALLOWED".green().bold(), result);
            } else {
                println!("{}", "DENIED".red().bold());
            }
        }
        _ => {
            let granted_by = match &result {
                AuthorizationResult::Allowed { handler } => Some(handler.to_string()),
                AuthorizationResult::Denied => None,
            };
            output::print_item(
                &AuthorizeOutput {
                    principal: principal.to_string(),
                    operation: requirement.name().to_string(),
                    contact: contact.map(|c| c.name),
                    allowed: result.is_allowed(),
                    granted_by,
                    decisions,
                },
                format,
            )?
        }
    }

    Ok(())
}
