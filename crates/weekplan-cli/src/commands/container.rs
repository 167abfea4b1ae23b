//! Container management commands for CLI.

use clap::Subcommand;
use weekplan_core::Config;

use super::{open_db, parse_datetime};

#[derive(Subcommand)]
pub enum ContainerAction {
    /// Create a new container
    Add {
        /// Display label (e.g. school name)
        label: String,
        /// Deadline as RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        /// Link inherited by items that have none
        #[arg(long)]
        url: Option<String>,
    },
    /// List containers with their items, deadline first
    List,
    /// Delete a container and all of its items
    Delete {
        /// Container ID
        id: String,
    },
}

pub fn run(action: ContainerAction, user: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db(&Config::load_or_default())?;

    match action {
        ContainerAction::Add {
            label,
            deadline,
            url,
        } => {
            let deadline = parse_datetime(&deadline)?;
            let container = db.create_container(&user, &label, deadline, url.as_deref(), Vec::new())?;
            println!("Container created: {}", container.id);
            println!("{}", serde_json::to_string_pretty(&container)?);
        }
        ContainerAction::List => {
            let containers = db.list_containers(&user)?;
            println!("{}", serde_json::to_string_pretty(&containers)?);
        }
        ContainerAction::Delete { id } => {
            db.delete_container(&id, &user)?;
            println!("Container deleted: {id}");
        }
    }
    Ok(())
}
