//! Week arithmetic for the planner.
//!
//! Deadlines are converted to a count of whole weeks from "now", after
//! subtracting a lead-time buffer so work lands before the due date rather
//! than on it. Week windows are Sunday-aligned calendar weeks.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Days subtracted from a deadline before counting weeks.
pub const DEFAULT_LEAD_TIME_DAYS: i64 = 2;

const WEEK_MILLIS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Whole weeks between `now` and `deadline` minus the default lead time.
///
/// Rounds up and never returns less than 1, so a deadline that has already
/// passed still maps to the first week.
pub fn weeks_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    weeks_until_with_lead(deadline, now, DEFAULT_LEAD_TIME_DAYS)
}

/// [`weeks_until`] with an explicit lead time in days.
///
/// Negative lead times count as zero. A lead time that pushes the target
/// before chrono's range saturates at the earliest representable instant.
pub fn weeks_until_with_lead(deadline: DateTime<Utc>, now: DateTime<Utc>, lead_days: i64) -> u32 {
    let target = Duration::try_days(lead_days.max(0))
        .and_then(|lead| deadline.checked_sub_signed(lead))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    ceil_weeks(target, now)
}

/// Whole weeks until `deadline` with no lead time, clamped to at least 1.
pub fn weeks_until_unbuffered(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    ceil_weeks(deadline, now)
}

fn ceil_weeks(target: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (target - now).num_milliseconds() as f64;
    let weeks = (millis / WEEK_MILLIS).ceil();
    if weeks < 1.0 {
        1
    } else if weeks > u32::MAX as f64 {
        u32::MAX
    } else {
        weeks as u32
    }
}

/// Inclusive calendar-week boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    /// Sunday-aligned week containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> Self {
        let offset = instant.weekday().num_days_from_sunday() as i64;
        let sunday = (instant - Duration::days(offset)).date_naive();
        let start = sunday.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(7) - Duration::milliseconds(1);
        Self { start, end }
    }

    /// Check if `instant` falls inside this window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Check if two windows share at least one instant.
    pub fn overlaps(&self, other: &WeekWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Window of the 1-based `week_number` counted from `now`.
///
/// Week 1 is the Sunday-aligned week containing `now`; week `n` is the week
/// containing `now + (n - 1) * 7 days`.
pub fn week_window(week_number: u32, now: DateTime<Utc>) -> WeekWindow {
    let offset = Duration::days(7 * (week_number.max(1) as i64 - 1));
    WeekWindow::containing(now + offset)
}
