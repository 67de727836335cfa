//! Lifecycle Events
//!
//! Notifications delivered by the hosting runtime when a document is
//! created, updated or deleted.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DocumentSnapshot;

/// Kind of document transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    /// Get the event kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event envelope as delivered by the runtime, before it is bound to a handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrigger {
    /// Delivery ID assigned by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,

    pub kind: EventKind,

    /// Concrete document path, e.g. `posts/p1`
    pub document: String,

    /// Document state before the transition (updates and deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Document state after the transition (creates and updates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl RawTrigger {
    pub fn created(document: impl Into<String>, after: serde_json::Value) -> Self {
        Self {
            event_id: None,
            kind: EventKind::Created,
            document: document.into(),
            before: None,
            after: Some(after),
        }
    }

    pub fn updated(
        document: impl Into<String>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        Self {
            event_id: None,
            kind: EventKind::Updated,
            document: document.into(),
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn deleted(document: impl Into<String>, before: serde_json::Value) -> Self {
        Self {
            event_id: None,
            kind: EventKind::Deleted,
            document: document.into(),
            before: Some(before),
            after: None,
        }
    }

    pub fn with_event_id(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

/// A lifecycle event resolved against a trigger binding
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub event_id: Uuid,
    pub kind: EventKind,
    pub collection: String,
    pub document_id: String,
    /// Wildcard bindings from the path template, e.g. `postId -> p1`
    pub params: HashMap<String, String>,
    pub before: Option<DocumentSnapshot>,
    pub after: Option<DocumentSnapshot>,
    pub received_at: DateTime<Utc>,
}

impl TriggerEvent {
    /// Snapshot describing the document the event is about.
    ///
    /// Creates and updates report the new state, deletes report the state
    /// that was removed. Whichever side is present is used as a fallback.
    pub fn snapshot(&self) -> DocumentSnapshot {
        let primary = match self.kind {
            EventKind::Created | EventKind::Updated => self.after.as_ref().or(self.before.as_ref()),
            EventKind::Deleted => self.before.as_ref().or(self.after.as_ref()),
        };
        primary.cloned().unwrap_or_default()
    }

    /// State before the transition, empty when absent
    pub fn before_or_empty(&self) -> DocumentSnapshot {
        self.before.clone().unwrap_or_default()
    }

    /// State after the transition, empty when absent
    pub fn after_or_empty(&self) -> DocumentSnapshot {
        self.after.clone().unwrap_or_default()
    }

    /// Look up a path parameter, falling back to the document ID
    pub fn param(&self, name: &str) -> &str {
        self.params
            .get(name)
            .map(String::as_str)
            .unwrap_or(&self.document_id)
    }
}
