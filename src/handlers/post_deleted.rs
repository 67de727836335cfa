//! Post Deleted Handler
//!
//! Announces a removed post and uncounts it in `stats/posts`.

use async_trait::async_trait;

use crate::domain::{PostDocument, TriggerEvent};
use crate::stats::StatsService;

use super::{settle_stats, HandlerOutcome, Notification, TriggerHandler};

/// Handler for `posts/{postId}` deletion
pub struct PostDeletedHandler {
    stats: StatsService,
}

impl PostDeletedHandler {
    pub fn new(stats: StatsService) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl TriggerHandler for PostDeletedHandler {
    fn name(&self) -> &'static str {
        "on_post_deleted"
    }

    async fn handle(&self, event: &TriggerEvent) -> HandlerOutcome {
        let post = PostDocument::from_snapshot(&event.snapshot());
        let post_id = event.param("postId");

        let notification = Notification::new("🗑️ POST DELETED NOTIFICATION 🗑️")
            .field("📝 Post ID", post_id)
            .field("👤 Author", &post.username)
            .quoted("💬 Content", &post.content)
            .timestamp("⏰ Deleted", event.received_at);
        notification.emit();

        let result = self.stats.record_post_deleted(&post.username).await;
        let stats = settle_stats(
            result,
            "📊 Post statistics updated after deletion",
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
