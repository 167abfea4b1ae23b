//! Plan and progress commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use weekplan_core::{Config, PlanInput, PlanReport, Planner};

use super::{open_db, parse_datetime};

/// Where the snapshot comes from and which instant to plan for.
#[derive(Args)]
pub struct PlanSource {
    /// Plan as of this instant (RFC 3339 or YYYY-MM-DD); defaults to now
    #[arg(long)]
    now: Option<String>,
    /// Read a JSON snapshot instead of the database
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show the weekly plan
    Show {
        #[command(flatten)]
        source: PlanSource,
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Items scheduled for the current week (JSON)
    Current {
        #[command(flatten)]
        source: PlanSource,
    },
    /// Progress figures (JSON)
    Progress {
        #[command(flatten)]
        source: PlanSource,
    },
    /// Hours per week needed to meet the earliest deadline (JSON)
    TimeNeeded {
        #[command(flatten)]
        source: PlanSource,
    },
}

fn compute(source: &PlanSource, user: &str) -> Result<PlanReport, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = match &source.now {
        Some(raw) => parse_datetime(raw)?,
        None => Utc::now(),
    };
    let input: PlanInput = match &source.snapshot {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => open_db(&config)?.load_snapshot(user)?,
    };
    Ok(Planner::from_config(&config).compute(&input, now)?)
}

fn print_plan(report: &PlanReport) {
    if report.weekly_plan.is_empty() {
        println!("Nothing to schedule.");
        return;
    }

    for week in &report.weekly_plan {
        println!(
            "Week {} ({} .. {}): {:.1}h",
            week.week_number,
            week.start_date.format("%Y-%m-%d"),
            week.end_date.format("%Y-%m-%d"),
            week.total_hours
        );
        for planned in &week.items {
            println!(
                "  - [{}] {} ({:.1}h)",
                planned.container_label,
                planned.title(),
                planned.hours
            );
        }
    }
    println!(
        "Remaining: {:.1}h of {:.1}h, {} task(s), {} notification(s)",
        report.remaining_work_hours,
        report.total_work_hours,
        report.remaining_task_count,
        report.notification_count
    );
}

pub fn run(action: PlanAction, user: String) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Show { source, json } => {
            let report = compute(&source, &user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_plan(&report);
            }
        }
        PlanAction::Current { source } => {
            let report = compute(&source, &user)?;
            println!("{}", serde_json::to_string_pretty(&report.current_week_items)?);
        }
        PlanAction::Progress { source } => {
            let report = compute(&source, &user)?;
            let summary = serde_json::json!({
                "totalWorkHours": report.total_work_hours,
                "remainingWorkHours": report.remaining_work_hours,
                "remainingTaskCount": report.remaining_task_count,
                "notificationCount": report.notification_count,
                "progress": report.progress,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        PlanAction::TimeNeeded { source } => {
            let report = compute(&source, &user)?;
            println!("{}", serde_json::to_string_pretty(&report.time_needed)?);
        }
    }
    Ok(())
}
