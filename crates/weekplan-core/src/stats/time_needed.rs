//! "Time needed" summary: pending hours spread until the earliest deadline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::PlanInput;
use crate::error::ValidationError;
use crate::week::weeks_until_unbuffered;

/// Default multiplier on the weekly figure.
pub const DEFAULT_TIME_NEEDED_BUFFER: f64 = 1.3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeNeeded {
    /// Sum of pending estimates
    pub total_hours: f64,
    /// `ceil(total_hours / weeks_until_deadline)`
    pub weekly_hours: f64,
    /// `ceil(weekly_hours * buffer)`
    pub weekly_hours_with_buffer: f64,
    /// Pending items with a positive estimate
    pub remaining_tasks: usize,
    /// Weeks until the earliest container deadline, no lead time
    pub weeks_until_deadline: u32,
}

/// Summarise pending work against the earliest deadline.
///
/// Returns all zeros when there are no containers or no pending hours.
pub fn time_needed(
    input: &PlanInput,
    now: DateTime<Utc>,
    buffer: f64,
) -> Result<TimeNeeded, ValidationError> {
    let mut earliest: Option<DateTime<Utc>> = None;
    for container in &input.containers {
        let deadline = container.require_deadline()?;
        earliest = Some(earliest.map_or(deadline, |e| e.min(deadline)));
    }

    let pending = input.all_items().filter(|i| !i.is_completed());
    let (total_hours, remaining_tasks) = pending.fold((0.0_f64, 0_usize), |(hours, count), item| {
        match item.schedulable_hours() {
            Some(h) => (hours + h, count + 1),
            None => (hours, count),
        }
    });

    let Some(earliest) = earliest else {
        return Ok(TimeNeeded::default());
    };
    if total_hours == 0.0 {
        return Ok(TimeNeeded::default());
    }

    let weeks = weeks_until_unbuffered(earliest, now);
    let weekly_hours = (total_hours / weeks as f64).ceil();
    Ok(TimeNeeded {
        total_hours,
        weekly_hours,
        weekly_hours_with_buffer: (weekly_hours * buffer).ceil(),
        remaining_tasks,
        weeks_until_deadline: weeks,
    })
}
