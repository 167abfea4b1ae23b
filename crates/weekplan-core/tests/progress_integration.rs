//! Integration tests for progress figures and the time-needed summary.

use chrono::{DateTime, Duration, TimeZone, Utc};

use weekplan_core::{Container, ItemKind, PlanInput, Planner, ProgressAggregator, WorkItem};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap()
}

fn item(kind: ItemKind, title: &str, hours: Option<f64>, done: bool) -> WorkItem {
    let mut item = WorkItem::new("", kind, title);
    item.hour_estimate = hours;
    if done {
        item.complete(now());
    }
    item
}

fn application(days: i64, items: Vec<WorkItem>) -> Container {
    items.into_iter().fold(
        Container::new("u", format!("School {days}"), now() + Duration::days(days)),
        Container::with_item,
    )
}

#[test]
fn essay_hours_and_counts_across_containers() {
    let input = PlanInput::new(
        "u",
        vec![
            application(
                21,
                vec![
                    item(ItemKind::EssayDraft, "Draft", Some(2.0), true),
                    item(ItemKind::EssayFinal, "Final", Some(1.0), false),
                ],
            ),
            application(
                35,
                vec![
                    item(ItemKind::EssayDraft, "Draft", Some(3.0), false),
                    item(ItemKind::EssayFinal, "Final", Some(1.5), false),
                    item(ItemKind::Timebox, "Activities", Some(4.0), true),
                ],
            ),
        ],
    );
    let report = Planner::new().compute(&input, now()).unwrap();

    assert_eq!(report.progress.essays, 25);
    assert_eq!(report.progress.essay_hours.completed, 2.0);
    assert_eq!(report.progress.essay_hours.total, 7.5);
    assert_eq!(report.progress.essay_hours.percentage, 27);
    assert_eq!(report.total_work_hours, 11.5);
    assert_eq!(report.remaining_work_hours, 5.5);
    assert_eq!(report.remaining_task_count, 3);
}

#[test]
fn notification_percentage_reads_zero_once_none_are_pending() {
    let partly = PlanInput::new(
        "u",
        vec![application(
            14,
            vec![
                item(ItemKind::Notification, "Portal", None, true),
                item(ItemKind::Notification, "Fee", None, true),
                item(ItemKind::Notification, "Scores", None, false),
            ],
        )],
    );
    let report = ProgressAggregator::new().aggregate(&partly);
    assert_eq!(report.progress.notifications, 67);
    assert_eq!(report.notification_count, 1);

    let all_done = PlanInput::new(
        "u",
        vec![application(
            14,
            vec![
                item(ItemKind::Notification, "Portal", None, true),
                item(ItemKind::Notification, "Fee", None, true),
            ],
        )],
    );
    let report = ProgressAggregator::new().aggregate(&all_done);
    assert_eq!(report.progress.notifications, 0);
    assert_eq!(report.notification_count, 0);
}

#[test]
fn empty_snapshot_reports_zeros() {
    let report = Planner::new()
        .compute(&PlanInput::new("nobody", vec![]), now())
        .unwrap();

    assert!(report.weekly_plan.is_empty());
    assert!(report.current_week_items.is_empty());
    assert_eq!(report.total_work_hours, 0.0);
    assert_eq!(report.progress.essays, 0);
    assert_eq!(report.progress.notifications, 0);
    assert_eq!(report.progress.essay_hours.percentage, 0);
    assert_eq!(report.time_needed.weeks_until_deadline, 0);
}

#[test]
fn time_needed_uses_the_earliest_deadline() {
    let input = PlanInput::new(
        "u",
        vec![
            application(
                60,
                vec![item(ItemKind::Timebox, "Portfolio", Some(10.0), false)],
            ),
            application(
                14,
                vec![
                    item(ItemKind::Timebox, "Resume", Some(3.0), false),
                    item(ItemKind::Timebox, "Done", Some(5.0), true),
                ],
            ),
        ],
    );
    let summary = Planner::new().compute(&input, now()).unwrap().time_needed;

    assert_eq!(summary.weeks_until_deadline, 2);
    assert_eq!(summary.total_hours, 13.0);
    assert_eq!(summary.weekly_hours, 7.0);
    assert_eq!(summary.weekly_hours_with_buffer, 10.0);
    assert_eq!(summary.remaining_tasks, 2);
}

#[test]
fn custom_time_needed_buffer_is_applied() {
    let input = PlanInput::new(
        "u",
        vec![application(
            14,
            vec![item(ItemKind::Timebox, "Resume", Some(8.0), false)],
        )],
    );
    let summary = Planner::new()
        .with_time_needed_buffer(2.0)
        .compute(&input, now())
        .unwrap()
        .time_needed;
    assert_eq!(summary.weekly_hours, 4.0);
    assert_eq!(summary.weekly_hours_with_buffer, 8.0);
}
