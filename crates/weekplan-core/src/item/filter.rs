//! Grouping of items into display tabs, and the global display order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::WorkItem;
use crate::container::Container;

/// Display tab an item is listed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemTab {
    Essays,
    Tests,
    Recommendations,
    /// Everything else ("rest of form")
    #[default]
    Forms,
}

impl FromStr for ItemTab {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`ItemTab::Forms`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "essays" => ItemTab::Essays,
            "tests" => ItemTab::Tests,
            "recommendations" => ItemTab::Recommendations,
            _ => ItemTab::Forms,
        })
    }
}

fn title_mentions(item: &WorkItem, needles: &[&str]) -> bool {
    let title = item.title.to_lowercase();
    needles.iter().any(|n| title.contains(n))
}

fn is_test(item: &WorkItem) -> bool {
    title_mentions(item, &["test", "transcript"])
}

fn is_recommendation(item: &WorkItem) -> bool {
    title_mentions(item, &["recommendation", "reference"])
}

impl ItemTab {
    pub fn matches(&self, item: &WorkItem) -> bool {
        match self {
            ItemTab::Essays => item.kind.is_essay(),
            ItemTab::Tests => is_test(item),
            ItemTab::Recommendations => is_recommendation(item),
            ItemTab::Forms => !item.kind.is_essay() && !is_test(item) && !is_recommendation(item),
        }
    }
}

/// Items shown under `tab`, in input order.
pub fn filter_by_tab<'a>(items: &'a [WorkItem], tab: ItemTab) -> Vec<&'a WorkItem> {
    items.iter().filter(|item| tab.matches(item)).collect()
}

pub(crate) fn cmp_present_first(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// All items of all containers in display order.
///
/// Sorted by container deadline, then global position, then manual
/// sequence position. Completed items are kept.
pub fn display_order(containers: &[Container]) -> Vec<(&Container, &WorkItem)> {
    let mut rows: Vec<_> = containers
        .iter()
        .flat_map(|c| c.items.iter().map(move |item| (c, item)))
        .collect();

    rows.sort_by(|(ca, a), (cb, b)| {
        ca.deadline
            .cmp(&cb.deadline)
            .then_with(|| cmp_present_first(a.global_position, b.global_position))
            .then_with(|| cmp_present_first(a.sequence_position, b.sequence_position))
    });
    rows
}
