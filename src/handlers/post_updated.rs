//! Post Updated Handler
//!
//! Announces an edit with the old and new content. Statistics are untouched.

use async_trait::async_trait;

use crate::domain::{PostDocument, TriggerEvent};

use super::{HandlerOutcome, Notification, StatsOutcome, TriggerHandler};

/// Handler for `posts/{postId}` updates
#[derive(Debug, Default)]
pub struct PostUpdatedHandler;

impl PostUpdatedHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TriggerHandler for PostUpdatedHandler {
    fn name(&self) -> &'static str {
        "on_post_updated"
    }

    async fn handle(&self, event: &TriggerEvent) -> HandlerOutcome {
        let before = PostDocument::from_snapshot(&event.before_or_empty());
        let after = PostDocument::from_snapshot(&event.after_or_empty());
        let post_id = event.param("postId");

        let notification = Notification::new("✏️ POST UPDATED NOTIFICATION ✏️")
            .field("📝 Post ID", post_id)
            .field("👤 Author", &after.username)
            .quoted("📝 Old Content", &before.content)
            .quoted("📝 New Content", &after.content)
            .timestamp("⏰ Updated", event.received_at);
        notification.emit();

        HandlerOutcome {
            handler: self.name(),
            event_id: event.event_id,
            document_id: post_id.to_string(),
            notification,
            stats: StatsOutcome::NotApplicable,
        }
    }
}
