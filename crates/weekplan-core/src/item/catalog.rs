//! Default hour estimates per item kind.

use serde::{Deserialize, Serialize};

use super::{ItemKind, WorkItem};

/// Kind → default hour estimate table.
///
/// Only consulted when an item carries no estimate of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindCatalog {
    essay_draft: Option<f64>,
    essay_final: Option<f64>,
    timebox: Option<f64>,
    notification: Option<f64>,
}

impl Default for KindCatalog {
    fn default() -> Self {
        Self {
            essay_draft: Some(2.0),
            essay_final: Some(1.0),
            timebox: Some(2.0),
            notification: None,
        }
    }
}

impl KindCatalog {
    /// Build a catalog with explicit defaults.
    pub fn new(
        essay_draft: Option<f64>,
        essay_final: Option<f64>,
        timebox: Option<f64>,
        notification: Option<f64>,
    ) -> Self {
        Self {
            essay_draft,
            essay_final,
            timebox,
            notification,
        }
    }

    pub fn default_hours(&self, kind: ItemKind) -> Option<f64> {
        match kind {
            ItemKind::EssayDraft => self.essay_draft,
            ItemKind::EssayFinal => self.essay_final,
            ItemKind::Timebox => self.timebox,
            ItemKind::Notification => self.notification,
        }
    }

    /// The item's own estimate, else the default for its kind.
    pub fn resolve(&self, item: &WorkItem) -> Option<f64> {
        item.hour_estimate.or_else(|| self.default_hours(item.kind))
    }

    /// Fill in missing estimates in place.
    pub fn resolve_in_place(&self, item: &mut WorkItem) {
        if item.hour_estimate.is_none() {
            item.hour_estimate = self.default_hours(item.kind);
        }
    }
}
