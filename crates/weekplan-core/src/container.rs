//! Deadline-bearing containers (applications) and the engine's input snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::item::catalog::KindCatalog;
use crate::item::filter::cmp_present_first;
use crate::item::WorkItem;

/// A deadline-bearing goal that owns a set of work items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub user_id: String,
    /// Display label (school name)
    pub label: String,
    /// `None` only when deserialized from a malformed snapshot
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<WorkItem>,
}

impl Container {
    pub fn new(user_id: impl Into<String>, label: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            label: label.into(),
            deadline: Some(deadline),
            url: None,
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach an item, re-parenting it to this container.
    pub fn with_item(mut self, mut item: WorkItem) -> Self {
        item.container_id = self.id.clone();
        self.items.push(item);
        self
    }

    /// The deadline, or a validation error naming this container.
    pub fn require_deadline(&self) -> Result<DateTime<Utc>, ValidationError> {
        self.deadline.ok_or_else(|| ValidationError::MissingDeadline {
            container: self.label.clone(),
        })
    }

    /// Items in the container's own order.
    ///
    /// Manual sequence position first, then global position, with absent
    /// values after present ones. Ties keep input order.
    pub fn ordered_items(&self) -> Vec<&WorkItem> {
        let mut items: Vec<&WorkItem> = self.items.iter().collect();
        items.sort_by(|a, b| {
            cmp_present_first(a.sequence_position, b.sequence_position)
                .then_with(|| cmp_present_first(a.global_position, b.global_position))
        });
        items
    }

    /// Check deadline, estimates and title uniqueness.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.require_deadline()?;
        let mut seen = HashSet::new();
        for item in &self.items {
            item.validate()?;
            if !seen.insert(item.title.trim()) {
                return Err(ValidationError::DuplicateTitle {
                    container: self.label.clone(),
                    title: item.title.trim().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Snapshot of one user's containers handed to the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInput {
    pub user_id: String,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl PlanInput {
    pub fn new(user_id: impl Into<String>, containers: Vec<Container>) -> Self {
        Self {
            user_id: user_id.into(),
            containers,
        }
    }

    /// Validate every container and check they all belong to `user_id`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for container in &self.containers {
            if container.user_id != self.user_id {
                return Err(ValidationError::InvalidValue {
                    field: "user_id".to_string(),
                    message: format!(
                        "container '{}' belongs to another user",
                        container.label
                    ),
                });
            }
            container.validate()?;
        }
        Ok(())
    }

    /// Copy of the snapshot with missing estimates filled from `catalog`.
    pub fn resolved(&self, catalog: &KindCatalog) -> PlanInput {
        let mut copy = self.clone();
        for item in copy.containers.iter_mut().flat_map(|c| c.items.iter_mut()) {
            catalog.resolve_in_place(item);
        }
        copy
    }

    /// Every item of every container.
    pub fn all_items(&self) -> impl Iterator<Item = &WorkItem> {
        self.containers.iter().flat_map(|c| c.items.iter())
    }

    /// Copy of the containers with completed items removed.
    pub fn pending_containers(&self) -> Vec<Container> {
        self.containers
            .iter()
            .map(|c| Container {
                items: c.items.iter().filter(|i| !i.is_completed()).cloned().collect(),
                ..c.clone()
            })
            .collect()
    }
}
