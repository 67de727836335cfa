//! Handler Outcomes

use serde::Serialize;
use uuid::Uuid;

use super::Notification;

/// What happened to the statistics update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stats", rename_all = "snake_case")]
pub enum StatsOutcome {
    /// The handler does not touch statistics
    NotApplicable,
    Updated,
    /// The write failed; it was logged and will not be retried
    Failed { error: String },
}

/// Result of one handler invocation
#[derive(Debug, Clone)]
pub struct HandlerOutcome {
    pub handler: &'static str,
    pub event_id: Uuid,
    pub document_id: String,
    pub notification: Notification,
    pub stats: StatsOutcome,
}

impl HandlerOutcome {
    pub fn is_stats_update_failed(&self) -> bool {
        matches!(self.stats, StatsOutcome::Failed { .. })
    }

    pub fn stats_error(&self) -> Option<&str> {
        match &self.stats {
            StatsOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}
