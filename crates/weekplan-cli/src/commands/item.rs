//! Work item management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use weekplan_core::item::display_order;
use weekplan_core::{Config, ItemKind, ItemStatus, ItemTab, NewItem};

use super::open_db;

#[derive(Subcommand)]
pub enum ItemAction {
    /// Add an item to a container
    Add {
        /// Container ID
        container_id: String,
        /// Item title, unique within the container
        title: String,
        /// essay-draft, essay-final, timebox or notification
        #[arg(long)]
        kind: String,
        /// Hour estimate; defaults to the catalog value for the kind
        #[arg(long)]
        hours: Option<f64>,
        /// Position within the container
        #[arg(long)]
        order: Option<i64>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },
    /// List items in display order
    List {
        /// essays, tests, recommendations or forms
        #[arg(long)]
        tab: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an item completed
    Complete {
        /// Item ID
        id: String,
    },
    /// Mark a completed item pending again
    Reopen {
        /// Item ID
        id: String,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },
    /// Change an item's hour estimate
    Estimate {
        /// Item ID
        id: String,
        /// New estimate in hours
        #[arg(allow_negative_numbers = true)]
        hours: f64,
    },
}

pub fn run(action: ItemAction, user: String) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db(&Config::load_or_default())?;

    match action {
        ItemAction::Add {
            container_id,
            title,
            kind,
            hours,
            order,
            description,
        } => {
            let mut new_item = NewItem::new(kind.parse::<ItemKind>()?, title);
            new_item.hour_estimate = hours;
            new_item.sequence_position = order;
            new_item.description = description;

            let item = db.add_item(&container_id, &user, new_item)?;
            println!("Item created: {}", item.id);
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        ItemAction::List { tab, json } => {
            let snapshot = db.load_snapshot(&user)?;
            let tab = tab.map(|t| t.parse::<ItemTab>().unwrap_or_default());
            let rows: Vec<_> = display_order(&snapshot.containers)
                .into_iter()
                .filter(|(_, item)| tab.map_or(true, |t| t.matches(item)))
                .collect();

            if json {
                let items: Vec<_> = rows.iter().map(|(_, item)| item).collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if rows.is_empty() {
                println!("No items.");
            } else {
                for (container, item) in rows {
                    let mark = if item.is_completed() { "x" } else { " " };
                    let hours = item
                        .hour_estimate
                        .map(|h| format!("{h:.1}h"))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "[{mark}] {}  [{}] {} ({}, {hours})",
                        item.id, container.label, item.title, item.kind
                    );
                }
            }
        }
        ItemAction::Complete { id } => {
            let item = db.set_item_status(&id, &user, ItemStatus::Completed, Utc::now())?;
            println!("Item completed: {}", item.id);
        }
        ItemAction::Reopen { id } => {
            let item = db.set_item_status(&id, &user, ItemStatus::Pending, Utc::now())?;
            println!("Item reopened: {}", item.id);
        }
        ItemAction::Delete { id } => {
            db.delete_item(&id, &user)?;
            println!("Item deleted: {id}");
        }
        ItemAction::Estimate { id, hours } => {
            let item = db.update_estimate(&id, &user, Some(hours))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
    }
    Ok(())
}
