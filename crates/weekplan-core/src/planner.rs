//! Top-level entry point: one snapshot in, one full report out.
//!
//! Every call recomputes the whole plan from the snapshot and `now`;
//! nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::PlanInput;
use crate::error::Result;
use crate::item::catalog::KindCatalog;
use crate::scheduler::{current_week_items, SchedulerConfig, SequentialFillScheduler, TaggedItem, WeekBucket};
use crate::stats::{time_needed, Progress, ProgressAggregator, TimeNeeded, DEFAULT_TIME_NEEDED_BUFFER};
use crate::storage::Config;

/// Everything the dashboard needs for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub weekly_plan: Vec<WeekBucket>,
    /// Positive estimates over all items, completed or not
    pub total_work_hours: f64,
    /// Hours placed in the weekly plan
    pub remaining_work_hours: f64,
    pub remaining_task_count: usize,
    /// Pending notification items
    pub notification_count: usize,
    pub progress: Progress,
    pub current_week_items: Vec<TaggedItem>,
    pub time_needed: TimeNeeded,
}

/// Runs validation, estimate resolution, aggregation and scheduling.
#[derive(Debug, Clone)]
pub struct Planner {
    scheduler: SequentialFillScheduler,
    catalog: KindCatalog,
    time_needed_buffer: f64,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            scheduler: SequentialFillScheduler::new(),
            catalog: KindCatalog::default(),
            time_needed_buffer: DEFAULT_TIME_NEEDED_BUFFER,
        }
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner tuned by the `[scheduler]` and `[catalog]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            scheduler: SequentialFillScheduler::with_config(config.scheduler_config()),
            catalog: config.catalog(),
            time_needed_buffer: config.scheduler.time_needed_buffer,
        }
    }

    pub fn with_scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = SequentialFillScheduler::with_config(config);
        self
    }

    pub fn with_catalog(mut self, catalog: KindCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_time_needed_buffer(mut self, buffer: f64) -> Self {
        self.time_needed_buffer = buffer;
        self
    }

    /// Compute the report for `input` as of `now`.
    ///
    /// # Errors
    /// Returns a validation error for a malformed snapshot. An empty
    /// snapshot is not an error and yields an empty report.
    pub fn compute(&self, input: &PlanInput, now: DateTime<Utc>) -> Result<PlanReport> {
        input.validate()?;
        let resolved = input.resolved(&self.catalog);
        resolved.validate()?;

        let aggregate = ProgressAggregator::new().aggregate(&resolved);
        let pending = resolved.pending_containers();
        let weekly_plan = self
            .scheduler
            .plan(&pending, aggregate.total_work_hours, now)?;

        let current_week_items = current_week_items(&weekly_plan, now);
        let time_needed = time_needed(&resolved, now, self.time_needed_buffer)?;
        let remaining_work_hours = weekly_plan.iter().fold(0.0_f64, |acc, w| acc + w.total_hours);

        if resolved.containers.is_empty() {
            tracing::debug!(user = %input.user_id, "no containers, empty plan");
        } else {
            tracing::debug!(
                user = %input.user_id,
                weeks = weekly_plan.len(),
                total_work_hours = aggregate.total_work_hours,
                remaining_work_hours,
                "computed plan"
            );
        }

        Ok(PlanReport {
            weekly_plan,
            total_work_hours: aggregate.total_work_hours,
            remaining_work_hours,
            remaining_task_count: aggregate.remaining_task_count,
            notification_count: aggregate.notification_count,
            progress: aggregate.progress,
            current_week_items,
            time_needed,
        })
    }

    /// [`Planner::compute`] against the wall clock.
    pub fn compute_now(&self, input: &PlanInput) -> Result<PlanReport> {
        self.compute(input, Utc::now())
    }
}
