//! `contacts seed`: provision accounts, roles and sample contacts.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use contacts_core::config::Config;
use contacts_core::seed::SeedReport;

use super::Workspace;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct SeedArgs {
    /// Run seeding a second time to show that it changes nothing
    #[arg(long)]
    twice: bool,
}

// ── Output rows ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User Name")]
    user_name: String,
    #[tabled(rename = "Roles")]
    roles: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ContactRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

#[derive(Debug, Serialize)]
struct SeedOutput {
    runs: Vec<SeedReport>,
    users: Vec<UserRow>,
    contacts: Vec<ContactRow>,
}

// ── Execution ───────────────────────────────────────────────────────────────

pub async fn execute(args: SeedArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let workspace = Workspace::new(config)?;

    let mut runs = Vec::new();
    let passes = if args.twice { 2 } else { 1 };
    for _ in 0..passes {
        if let Some(report) = workspace.seeder.run(&config.seed).await? {
            runs.push(report);
        }
    }
    if runs.is_empty() {
        output::print_info("Seeding is disabled (seed.enabled = false)");
    }

    let mut users = Vec::new();
    if let Some(first) = runs.first() {
        for user_id in [&first.admin_id, &first.manager_id] {
            let Some(user) = workspace.identities.find_by_id(user_id).await? else {
                continue;
            };
            let roles = workspace.roles.roles_for(&user.id).await?;
            users.push(UserRow {
                id: user.id.to_string(),
                user_name: user.user_name,
                roles: roles.join(", "),
            });
        }
    }

    let contacts: Vec<ContactRow> = workspace
        .contacts
        .all()
        .await?
        .into_iter()
        .map(|c| ContactRow {
            name: c.name,
            city: c.city.unwrap_or_default(),
            email: c.email.unwrap_or_default(),
            status: c.status.as_str().to_string(),
            owner: c.owner_id.to_string(),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            for (i, run) in runs.iter().enumerate() {
                output::print_success(&format!(
                    "Run {}: {} contact(s) inserted",
                    i + 1,
                    run.contacts_inserted
                ));
            }
            output::print_header("Users");
            output::print_list(&users, format)?;
            output::print_header("Contacts");
            output::print_list(&contacts, format)?;
        }
        _ => output::print_item(
            &SeedOutput {
                runs,
                users,
                contacts,
            },
            format,
        )?,
    }

    Ok(())
}
