//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against an isolated data directory and
//! verify outputs.

use std::process::Command;
use tempfile::TempDir;

const NOW: &str = "2025-03-05T12:00:00Z";

struct Cli {
    data_dir: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            data_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_weekplan"))
            .args(args)
            .env("WEEKPLAN_DATA_DIR", self.data_dir.path())
            .env_remove("WEEKPLAN_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Run a CLI command and expect success.
    fn run_ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed {args:?}: {stderr}");
        stdout
    }

    /// Run a CLI command and expect failure.
    fn run_err(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert_eq!(code, 1, "CLI command unexpectedly succeeded: {args:?}");
        assert!(stderr.starts_with("error: "), "unexpected stderr: {stderr}");
        stderr
    }

    /// Run a create command and return the new ID from its first line.
    fn create(&self, args: &[&str]) -> String {
        let stdout = self.run_ok(args);
        let first = stdout.lines().next().unwrap_or_default();
        first
            .rsplit(": ")
            .next()
            .expect("missing ID")
            .trim()
            .to_string()
    }
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

fn seed(cli: &Cli) -> (String, String, String) {
    let container = cli.create(&["container", "add", "Yale", "--deadline", "2025-03-19"]);
    let essay = cli.create(&[
        "item", "add", &container, "Why Yale", "--kind", "essay-draft", "--hours", "5", "--order", "1",
    ]);
    let activities = cli.create(&[
        "item", "add", &container, "Activities", "--kind", "timebox", "--hours", "3", "--order", "2",
    ]);
    (container, essay, activities)
}

#[test]
fn test_plan_from_stored_items() {
    let cli = Cli::new();
    let (_, essay, _) = seed(&cli);

    let report = json(&cli.run_ok(&["plan", "show", "--now", NOW, "--json"]));
    assert_eq!(report["weeklyPlan"].as_array().unwrap().len(), 2);
    assert_eq!(report["totalWorkHours"], 8.0);
    assert_eq!(report["weeklyPlan"][0]["items"][0]["item"]["id"], essay.as_str());
}

#[test]
fn test_plan_show_text() {
    let cli = Cli::new();
    seed(&cli);

    let stdout = cli.run_ok(&["plan", "show", "--now", NOW]);
    assert!(stdout.contains("Week 1"));
    assert!(stdout.contains("[Yale] Why Yale (5.0h)"));
}

#[test]
fn test_complete_and_reopen_update_progress() {
    let cli = Cli::new();
    let (_, essay, _) = seed(&cli);

    cli.run_ok(&["item", "complete", &essay]);
    let progress = json(&cli.run_ok(&["plan", "progress", "--now", NOW]));
    assert_eq!(progress["totalWorkHours"], 8.0);
    assert_eq!(progress["remainingWorkHours"], 3.0);
    assert_eq!(progress["progress"]["essays"], 100);

    cli.run_ok(&["item", "reopen", &essay]);
    let progress = json(&cli.run_ok(&["plan", "progress", "--now", NOW]));
    assert_eq!(progress["remainingWorkHours"], 8.0);
}

#[test]
fn test_current_week_items() {
    let cli = Cli::new();
    let (_, essay, _) = seed(&cli);

    let current = json(&cli.run_ok(&["plan", "current", "--now", NOW]));
    let items = current.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "work");
    assert_eq!(items[0]["item"]["id"], essay.as_str());
}

#[test]
fn test_time_needed_from_snapshot_file() {
    let cli = Cli::new();
    let snapshot = cli.data_dir.path().join("snapshot.json");
    std::fs::write(
        &snapshot,
        r#"{
            "user_id": "someone",
            "containers": [{
                "id": "mit",
                "user_id": "someone",
                "label": "MIT",
                "deadline": "2025-03-19T12:00:00Z",
                "items": [
                    {"id": "a", "container_id": "mit", "kind": "timebox", "title": "Portfolio", "hour_estimate": 8.0}
                ]
            }]
        }"#,
    )
    .unwrap();

    let summary = json(&cli.run_ok(&[
        "plan",
        "time-needed",
        "--now",
        NOW,
        "--snapshot",
        snapshot.to_str().unwrap(),
    ]));
    assert_eq!(summary["weeksUntilDeadline"], 2);
    assert_eq!(summary["weeklyHours"], 4.0);
    assert_eq!(summary["weeklyHoursWithBuffer"], 6.0);
}

#[test]
fn test_empty_user_gets_empty_plan() {
    let cli = Cli::new();
    seed(&cli);

    let report = json(&cli.run_ok(&["--user", "nobody", "plan", "show", "--now", NOW, "--json"]));
    assert!(report["weeklyPlan"].as_array().unwrap().is_empty());
    assert_eq!(report["totalWorkHours"], 0.0);
    let containers = json(&cli.run_ok(&["--user", "nobody", "container", "list"]));
    assert!(containers.as_array().unwrap().is_empty());
}

#[test]
fn test_item_list_tab_filter() {
    let cli = Cli::new();
    let (container, _, _) = seed(&cli);
    cli.run_ok(&[
        "item", "add", &container, "Send test scores", "--kind", "notification",
    ]);

    let essays = json(&cli.run_ok(&["item", "list", "--tab", "essays", "--json"]));
    assert_eq!(essays.as_array().unwrap().len(), 1);
    assert_eq!(essays[0]["title"], "Why Yale");

    let tests = json(&cli.run_ok(&["item", "list", "--tab", "tests", "--json"]));
    assert_eq!(tests.as_array().unwrap().len(), 1);
    assert_eq!(tests[0]["title"], "Send test scores");

    let all = json(&cli.run_ok(&["item", "list", "--json"]));
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[test]
fn test_estimate_and_delete() {
    let cli = Cli::new();
    let (container, essay, activities) = seed(&cli);

    let item = json(&cli.run_ok(&["item", "estimate", &activities, "4.5"]));
    assert_eq!(item["hour_estimate"], 4.5);
    cli.run_err(&["item", "estimate", &activities, "-2"]);

    cli.run_ok(&["item", "delete", &essay]);
    let report = json(&cli.run_ok(&["plan", "show", "--now", NOW, "--json"]));
    assert_eq!(report["totalWorkHours"], 4.5);

    cli.run_ok(&["container", "delete", &container]);
    let report = json(&cli.run_ok(&["plan", "show", "--now", NOW, "--json"]));
    assert!(report["weeklyPlan"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_input_reports_errors() {
    let cli = Cli::new();
    let (container, _, _) = seed(&cli);

    cli.run_err(&["item", "complete", "no-such-item"]);
    cli.run_err(&["item", "add", &container, "Why Yale", "--kind", "essay-draft"]);
    cli.run_err(&["item", "add", &container, "Other", "--kind", "poem"]);
    cli.run_err(&["container", "add", "Bad", "--deadline", "next week"]);
    cli.run_err(&["config", "get", "scheduler.nope"]);
}

#[test]
fn test_config_set_get_reset() {
    let cli = Cli::new();

    assert_eq!(cli.run_ok(&["config", "get", "scheduler.capacity_buffer"]).trim(), "1.1");
    assert_eq!(cli.run_ok(&["config", "set", "scheduler.capacity_buffer", "1.5"]).trim(), "ok");
    assert_eq!(cli.run_ok(&["config", "get", "scheduler.capacity_buffer"]).trim(), "1.5");
    cli.run_err(&["config", "set", "scheduler.capacity_buffer", "-1"]);

    cli.run_ok(&["config", "reset"]);
    assert_eq!(cli.run_ok(&["config", "get", "scheduler.capacity_buffer"]).trim(), "1.1");
    assert_eq!(cli.run_ok(&["config", "get", "catalog.notification_hours"]).trim(), "none");
}

#[test]
fn test_config_clear_estimate_and_bound_lead_time() {
    let cli = Cli::new();

    cli.run_ok(&["config", "set", "catalog.essay_draft_hours", "none"]);
    assert_eq!(cli.run_ok(&["config", "get", "catalog.essay_draft_hours"]).trim(), "none");
    cli.run_ok(&["config", "set", "catalog.notification_hours", "0.5"]);
    cli.run_ok(&["config", "set", "catalog.notification_hours", "none"]);
    assert_eq!(cli.run_ok(&["config", "get", "catalog.notification_hours"]).trim(), "none");

    cli.run_err(&["config", "set", "scheduler.lead_time_days", "200000000000"]);
    assert_eq!(cli.run_ok(&["config", "get", "scheduler.lead_time_days"]).trim(), "2");
    seed(&cli);
    cli.run_ok(&["plan", "show", "--now", NOW]);
}
