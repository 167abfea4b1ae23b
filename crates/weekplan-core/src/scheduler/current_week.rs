//! Selection of the week that contains "now".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlannedItem, WeekBucket};
use crate::week::WeekWindow;

/// Marks where an item shown in the current week comes from.
///
/// Consumers list notification items next to these; only scheduler
/// output is tagged here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemTag {
    /// Hour-bearing item placed by the scheduler
    Work,
}

/// An item of the current week together with its tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedItem {
    #[serde(rename = "type")]
    pub tag: ItemTag,
    #[serde(flatten)]
    pub item: PlannedItem,
}

/// The bucket whose window overlaps the Sunday-aligned week of `now`.
pub fn current_week(plan: &[WeekBucket], now: DateTime<Utc>) -> Option<&WeekBucket> {
    let this_week = WeekWindow::containing(now);
    plan.iter().find(|bucket| {
        WeekWindow {
            start: bucket.start_date,
            end: bucket.end_date,
        }
        .overlaps(&this_week)
    })
}

/// Items of the current week, tagged as work. Empty if no bucket matches.
pub fn current_week_items(plan: &[WeekBucket], now: DateTime<Utc>) -> Vec<TaggedItem> {
    current_week(plan, now)
        .map(|bucket| {
            bucket
                .items
                .iter()
                .map(|item| TaggedItem {
                    tag: ItemTag::Work,
                    item: item.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}
