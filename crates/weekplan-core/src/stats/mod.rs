//! Statistics module for weekplan
//!
//! Progress percentages and hour totals over a user's items, and the
//! "time needed" summary against the earliest deadline.

mod progress;
mod time_needed;

pub use progress::{percent, EssayHours, Progress, ProgressAggregator, ProgressReport};

pub use time_needed::{time_needed, TimeNeeded, DEFAULT_TIME_NEEDED_BUFFER};
