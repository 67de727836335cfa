//! Post Created Handler
//!
//! Announces a new post and counts it in `stats/posts`.

use async_trait::async_trait;

use crate::domain::{PostDocument, TriggerEvent};
use crate::stats::StatsService;

use super::{settle_stats, HandlerOutcome, Notification, TriggerHandler};

/// Handler for `posts/{postId}` creation
pub struct PostCreatedHandler {
    stats: StatsService,
}

impl PostCreatedHandler {
    pub fn new(stats: StatsService) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl TriggerHandler for PostCreatedHandler {
    fn name(&self) -> &'static str {
        "on_post_created"
    }

    async fn handle(&self, event: &TriggerEvent) -> HandlerOutcome {
        let post = PostDocument::from_snapshot(&event.snapshot());
        let post_id = event.param("postId");

        let notification = Notification::new("🎉 NEW POST NOTIFICATION 🎉")
            .field("📝 Post ID", post_id)
            .field("👤 Author", &post.username)
            .field("💬 Content", &post.content)
            .timestamp("⏰ Created", event.received_at);
        notification.emit();

        let result = self.stats.record_post_created(&post.username).await;
        let stats = settle_stats(
            result,
            "📊 Post statistics updated",
            "❌ Error updating statistics:",
        );

        HandlerOutcome {
            handler: self.name(),
            event_id: event.event_id,
            document_id: post_id.to_string(),
            notification,
            stats,
        }
    }
}
