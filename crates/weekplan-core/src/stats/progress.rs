//! Completion metrics over a user's full item set.
//!
//! Unlike the scheduler, which only sees pending items, these figures are
//! computed over every item (pending and completed).

use serde::{Deserialize, Serialize};

use crate::container::PlanInput;
use crate::item::{ItemKind, WorkItem};

/// Hour-weighted essay progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssayHours {
    pub completed: f64,
    pub total: f64,
    /// Rounded percentage, 0 when there are no essay hours
    pub percentage: u32,
}

/// Percentages shown in the overall progress panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Completed essay items out of all essay items
    pub essays: u32,
    /// Completed notification items out of all notification items
    pub notifications: u32,
    pub essay_hours: EssayHours,
}

/// Aggregated figures for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    /// Positive estimates over all items, completed or not
    pub total_work_hours: f64,
    /// Pending items with a positive estimate
    pub remaining_task_count: usize,
    pub remaining_hours: f64,
    /// Pending notification items
    pub notification_count: usize,
    pub progress: Progress,
}

/// Rounded percentage of `part` in `whole`, 0 for an empty whole.
pub fn percent(part: f64, whole: f64) -> u32 {
    if whole > 0.0 {
        (part / whole * 100.0).round() as u32
    } else {
        0
    }
}

/// Computes [`ProgressReport`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAggregator;

impl ProgressAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate over every item of `input`.
    ///
    /// Estimates are expected to be resolved already.
    pub fn aggregate(&self, input: &PlanInput) -> ProgressReport {
        let items: Vec<&WorkItem> = input.all_items().collect();

        let total_work_hours = items
            .iter()
            .filter_map(|i| i.schedulable_hours())
            .fold(0.0_f64, |acc, h| acc + h);

        let pending_positive: Vec<f64> = items
            .iter()
            .filter(|i| !i.is_completed())
            .filter_map(|i| i.schedulable_hours())
            .collect();

        ProgressReport {
            total_work_hours,
            remaining_task_count: pending_positive.len(),
            remaining_hours: pending_positive.iter().fold(0.0_f64, |acc, h| acc + *h),
            notification_count: items
                .iter()
                .filter(|i| i.kind == ItemKind::Notification && !i.is_completed())
                .count(),
            progress: Progress {
                essays: essay_percent(&items),
                notifications: notification_percent(&items),
                essay_hours: essay_hours(&items),
            },
        }
    }
}

fn essay_percent(items: &[&WorkItem]) -> u32 {
    let essays: Vec<_> = items.iter().filter(|i| i.kind.is_essay()).collect();
    let done = essays.iter().filter(|i| i.is_completed()).count();
    percent(done as f64, essays.len() as f64)
}

fn essay_hours(items: &[&WorkItem]) -> EssayHours {
    let (completed, total) = items
        .iter()
        .filter(|i| i.kind.is_essay())
        .fold((0.0, 0.0), |(done, all), i| {
            let hours = i.hours();
            if i.is_completed() {
                (done + hours, all + hours)
            } else {
                (done, all + hours)
            }
        });
    EssayHours {
        completed,
        total,
        percentage: percent(completed, total),
    }
}

/// Completed notifications over all notifications.
///
/// Reported as 0 once no notification is pending, even if some exist and
/// are all completed: the guard looks at the pending set while the ratio
/// uses the all-time set.
fn notification_percent(items: &[&WorkItem]) -> u32 {
    let notifications: Vec<_> = items
        .iter()
        .filter(|i| i.kind == ItemKind::Notification)
        .collect();
    let done = notifications.iter().filter(|i| i.is_completed()).count();
    if done == notifications.len() {
        return 0;
    }
    percent(done as f64, notifications.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;
    use chrono::{TimeZone, Utc};

    fn input(items: Vec<WorkItem>) -> PlanInput {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let container = items
            .into_iter()
            .fold(Container::new("u", "Stanford", deadline), |c, i| c.with_item(i));
        PlanInput::new("u", vec![container])
    }

    fn done(mut item: WorkItem) -> WorkItem {
        item.complete(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        item
    }

    #[test]
    fn essay_hours_from_completed_draft() {
        let report = ProgressAggregator::new().aggregate(&input(vec![
            done(WorkItem::new("", ItemKind::EssayDraft, "Essay 1 Draft").with_hours(2.0)),
            WorkItem::new("", ItemKind::EssayFinal, "Essay 1 Final").with_hours(1.0),
            WorkItem::new("", ItemKind::EssayDraft, "Essay 2 Draft").with_hours(3.0),
            WorkItem::new("", ItemKind::EssayFinal, "Essay 2 Final").with_hours(1.5),
        ]));
        assert_eq!(report.progress.essay_hours.completed, 2.0);
        assert_eq!(report.progress.essay_hours.total, 7.5);
        assert_eq!(report.progress.essay_hours.percentage, 27);
        assert_eq!(report.progress.essays, 25);
    }

    #[test]
    fn no_essays_reports_zero() {
        let report = ProgressAggregator::new().aggregate(&input(vec![
            WorkItem::new("", ItemKind::Timebox, "Review").with_hours(2.0),
        ]));
        assert_eq!(report.progress.essays, 0);
        assert_eq!(report.progress.essay_hours, EssayHours::default());
    }

    #[test]
    fn notification_percentage_rounds() {
        let report = ProgressAggregator::new().aggregate(&input(vec![
            done(WorkItem::new("", ItemKind::Notification, "Notification 1").with_hours(0.0)),
            done(WorkItem::new("", ItemKind::Notification, "Notification 2").with_hours(0.0)),
            WorkItem::new("", ItemKind::Notification, "Notification 3").with_hours(0.0),
        ]));
        assert_eq!(report.progress.notifications, 67);
        assert_eq!(report.notification_count, 1);
    }

    #[test]
    fn all_notifications_completed_reports_zero() {
        let report = ProgressAggregator::new().aggregate(&input(vec![
            done(WorkItem::new("", ItemKind::Notification, "Submit")),
        ]));
        assert_eq!(report.progress.notifications, 0);
        assert_eq!(report.notification_count, 0);
    }

    #[test]
    fn totals_span_completed_and_pending() {
        let report = ProgressAggregator::new().aggregate(&input(vec![
            done(WorkItem::new("", ItemKind::EssayDraft, "Task 1").with_hours(5.0)),
            WorkItem::new("", ItemKind::EssayFinal, "Task 2").with_hours(3.0),
            WorkItem::new("", ItemKind::Timebox, "Task 3").with_hours(2.0),
            WorkItem::new("", ItemKind::Notification, "Submit"),
        ]));
        assert_eq!(report.total_work_hours, 10.0);
        assert_eq!(report.remaining_hours, 5.0);
        assert_eq!(report.remaining_task_count, 2);
        assert_eq!(report.notification_count, 1);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let report = ProgressAggregator::new().aggregate(&PlanInput::default());
        assert_eq!(report, ProgressReport::default());
    }

    #[test]
    fn percent_handles_zero_whole() {
        assert_eq!(percent(1.0, 0.0), 0);
        assert_eq!(percent(1.0, 2.0), 50);
    }
}
