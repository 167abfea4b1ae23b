//! Sequential-fill weekly scheduler.
//!
//! This module buckets pending work items into calendar weeks:
//! - Items are visited in container-deadline order
//! - An item whose own deadline week has arrived is placed immediately,
//!   regardless of the week's load
//! - Otherwise an item is placed if it fits under the average weekly
//!   capacity, or if the week is still empty
//! - When neither applies the scheduler rolls over to the next week
//!
//! Capacity starts from the buffered total of the whole workload and is
//! recomputed from the unplaced remainder after every forced placement.

pub mod current_week;
pub mod projector;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::ValidationError;
use crate::week::{week_window, weeks_until_with_lead, DEFAULT_LEAD_TIME_DAYS};

pub use current_week::{current_week, current_week_items, ItemTag, TaggedItem};
pub use projector::{project, PlannedItem};

/// One week of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week_number: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub items: Vec<PlannedItem>,
    pub total_hours: f64,
}

impl WeekBucket {
    fn new(week_number: u32, items: Vec<PlannedItem>, now: DateTime<Utc>) -> Self {
        let window = week_window(week_number, now);
        // Fold from +0.0: an empty float sum is -0.0 and would serialize as such.
        let total_hours = items.iter().fold(0.0_f64, |acc, i| acc + i.hours);
        Self {
            week_number,
            start_date: window.start,
            end_date: window.end,
            items,
            total_hours,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Days subtracted from each deadline before counting weeks
    pub lead_time_days: i64,
    /// Multiplier applied to hour totals when computing weekly capacity
    pub capacity_buffer: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            capacity_buffer: 1.1,
        }
    }
}

/// Capacity-aware bucketing of work items into weeks.
#[derive(Debug, Clone, Default)]
pub struct SequentialFillScheduler {
    config: SchedulerConfig,
}

impl SequentialFillScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Weeks until the latest container deadline, or `None` with no containers.
    pub fn horizon(
        &self,
        containers: &[Container],
        now: DateTime<Utc>,
    ) -> Result<Option<u32>, ValidationError> {
        let mut latest: Option<DateTime<Utc>> = None;
        for container in containers {
            let deadline = container.require_deadline()?;
            latest = Some(latest.map_or(deadline, |l| l.max(deadline)));
        }
        Ok(latest.map(|d| weeks_until_with_lead(d, now, self.config.lead_time_days)))
    }

    /// Build the weekly plan for `pending` containers.
    ///
    /// `pending` holds the containers with completed items already removed;
    /// `total_work_hours` is the positive-estimate total over every item,
    /// completed or not, and sets the initial capacity.
    ///
    /// # Returns
    /// One bucket per week of the horizon, or an empty vector when there is
    /// nothing to schedule.
    pub fn plan(
        &self,
        pending: &[Container],
        total_work_hours: f64,
        now: DateTime<Utc>,
    ) -> Result<Vec<WeekBucket>, ValidationError> {
        let Some(max_weeks) = self.horizon(pending, now)? else {
            return Ok(Vec::new());
        };
        let candidates = project(pending, now, self.config.lead_time_days)?;
        let buffered = total_work_hours * self.config.capacity_buffer;
        Ok(self.schedule(candidates, max_weeks, buffered, now))
    }

    /// Run the sequential fill over an already projected and ordered list.
    pub fn schedule(
        &self,
        candidates: Vec<PlannedItem>,
        max_weeks: u32,
        total_buffered_hours: f64,
        now: DateTime<Utc>,
    ) -> Vec<WeekBucket> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let max_weeks = max_weeks.max(1);
        let mut weeks: Vec<Vec<PlannedItem>> = vec![Vec::new(); max_weeks as usize];
        let mut capacity = total_buffered_hours / max_weeks as f64;
        let mut current_week: u32 = 1;
        let mut cursor = 0;

        tracing::debug!(
            candidates = candidates.len(),
            max_weeks,
            capacity,
            "starting sequential fill"
        );

        while cursor < candidates.len() {
            let item = &candidates[cursor];
            let bucket = &mut weeks[current_week as usize - 1];
            let week_load: f64 = bucket.iter().map(|i| i.hours).sum();

            // The last week takes everything left, which is also what the
            // deadline rule yields since no deadline lies past the horizon.
            if item.deadline_week <= current_week || current_week >= max_weeks {
                bucket.push(item.clone());
                cursor += 1;

                let remaining: f64 = candidates[cursor..].iter().map(|i| i.hours).sum();
                let weeks_left = (max_weeks as i64 - current_week as i64).max(1);
                capacity = remaining * self.config.capacity_buffer / weeks_left as f64;
            } else if bucket.is_empty() || week_load + item.hours < capacity {
                bucket.push(item.clone());
                cursor += 1;
            } else {
                tracing::trace!(week = current_week, load = week_load, capacity, "week full");
                current_week += 1;
            }
        }

        weeks
            .into_iter()
            .zip(1..)
            .map(|(items, number)| WeekBucket::new(number, items, now))
            .collect()
    }
}
