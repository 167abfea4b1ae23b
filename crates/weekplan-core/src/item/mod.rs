//! Work items: the units of effort that get bucketed into weeks.
//!
//! A work item belongs to exactly one container and carries an optional
//! hour estimate. Items without a positive estimate are checklist entries
//! and are never placed in a week bucket.

pub mod catalog;
pub mod filter;

pub use catalog::KindCatalog;
pub use filter::{display_order, filter_by_tab, ItemTab};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Fixed category of a work item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    /// First draft of an essay
    EssayDraft,
    /// Final pass of an essay
    EssayFinal,
    /// Time-boxed task
    Timebox,
    /// Notification / checklist entry with no hours
    Notification,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::EssayDraft,
        ItemKind::EssayFinal,
        ItemKind::Timebox,
        ItemKind::Notification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::EssayDraft => "essay-draft",
            ItemKind::EssayFinal => "essay-final",
            ItemKind::Timebox => "timebox",
            ItemKind::Notification => "notification",
        }
    }

    /// Essay kinds count towards essay progress.
    pub fn is_essay(&self) -> bool {
        matches!(self, ItemKind::EssayDraft | ItemKind::EssayFinal)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "kind".to_string(),
                message: format!("unknown item kind '{s}'"),
            })
    }
}

/// Completion status of a work item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Completed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Completed => "completed",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "completed" => Ok(ItemStatus::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "status".to_string(),
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// A unit of work with an optional hour estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier
    pub id: String,
    /// Owning container
    pub container_id: String,
    pub kind: ItemKind,
    /// Title, unique within the container
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Estimated hours; `None` means "use the kind default" until resolved
    #[serde(default)]
    pub hour_estimate: Option<f64>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Manual order within the container
    #[serde(default)]
    pub sequence_position: Option<i64>,
    /// Global display order
    #[serde(default)]
    pub global_position: Option<i64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    /// Create a pending item with a fresh id.
    pub fn new(container_id: impl Into<String>, kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            container_id: container_id.into(),
            kind,
            title: title.into(),
            description: None,
            url: None,
            hour_estimate: None,
            status: ItemStatus::Pending,
            completed_at: None,
            sequence_position: None,
            global_position: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hour_estimate = Some(hours);
        self
    }

    pub fn with_sequence(mut self, position: i64) -> Self {
        self.sequence_position = Some(position);
        self
    }

    pub fn with_global_position(mut self, position: i64) -> Self {
        self.global_position = Some(position);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == ItemStatus::Completed
    }

    /// Hours counted by the engine (absent counts as zero).
    pub fn hours(&self) -> f64 {
        self.hour_estimate.unwrap_or(0.0)
    }

    /// Estimate if it is strictly positive.
    pub fn schedulable_hours(&self) -> Option<f64> {
        self.hour_estimate.filter(|h| *h > 0.0)
    }

    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.set_status(ItemStatus::Completed, now);
    }

    pub fn reopen(&mut self) {
        self.status = ItemStatus::Pending;
        self.completed_at = None;
    }

    /// Change status, keeping `completed_at` in step with it.
    pub fn set_status(&mut self, status: ItemStatus, now: DateTime<Utc>) {
        match status {
            ItemStatus::Completed => {
                if !self.is_completed() || self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
                self.status = ItemStatus::Completed;
            }
            ItemStatus::Pending => self.reopen(),
        }
    }

    /// Reject estimates the capacity math cannot use.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let Some(hours) = self.hour_estimate {
            if !hours.is_finite() {
                return Err(ValidationError::NonFiniteEstimate {
                    item: self.title.clone(),
                });
            }
            if hours < 0.0 {
                return Err(ValidationError::NegativeEstimate {
                    item: self.title.clone(),
                    hours,
                });
            }
        }
        Ok(())
    }
}
