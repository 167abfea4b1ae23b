//! Flattens containers into the scheduler's candidate list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::ValidationError;
use crate::item::WorkItem;
use crate::week::weeks_until_with_lead;

/// A work item tagged with its container's deadline and urgency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedItem {
    pub item: WorkItem,
    /// Resolved positive hour estimate
    pub hours: f64,
    pub container_id: String,
    /// Container label (school name)
    pub container_label: String,
    pub container_deadline: DateTime<Utc>,
    /// Week by which this item must be placed
    pub deadline_week: u32,
}

impl PlannedItem {
    pub fn title(&self) -> &str {
        &self.item.title
    }
}

/// Build the ordered candidate list.
///
/// Only items with a positive estimate are kept. The list is ordered by
/// container deadline, not by item urgency; within a container the
/// container's own item order is preserved.
pub fn project(
    containers: &[Container],
    now: DateTime<Utc>,
    lead_days: i64,
) -> Result<Vec<PlannedItem>, ValidationError> {
    let mut candidates = Vec::new();

    for container in containers {
        let deadline = container.require_deadline()?;
        let deadline_week = weeks_until_with_lead(deadline, now, lead_days);

        for item in container.ordered_items() {
            let Some(hours) = item.schedulable_hours() else {
                continue;
            };
            candidates.push(PlannedItem {
                item: item.clone(),
                hours,
                container_id: container.id.clone(),
                container_label: container.label.clone(),
                container_deadline: deadline,
                deadline_week,
            });
        }
    }

    // Stable: equal deadlines keep container order, then item order.
    candidates.sort_by_key(|c| c.container_deadline);

    tracing::debug!(
        candidates = candidates.len(),
        containers = containers.len(),
        "projected work items"
    );
    Ok(candidates)
}
