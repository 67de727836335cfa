//! User Created Handler
//!
//! Announces a registration and counts it in `stats/users`.

use async_trait::async_trait;

use crate::domain::{TriggerEvent, UserDocument};
use crate::stats::StatsService;

use super::{settle_stats, HandlerOutcome, Notification, TriggerHandler};

/// Handler for `users/{userId}` creation
pub struct UserCreatedHandler {
    stats: StatsService,
}

impl UserCreatedHandler {
    pub fn new(stats: StatsService) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl TriggerHandler for UserCreatedHandler {
    fn name(&self) -> &'static str {
        "on_user_created"
    }

    async fn handle(&self, event: &TriggerEvent) -> HandlerOutcome {
        let user = UserDocument::from_snapshot(&event.snapshot());
        let user_id = event.param("userId");

        let notification = Notification::new("👋 NEW USER REGISTERED 👋")
            .field("🆔 User ID", user_id)
            .field("📧 Email", &user.email)
            .field("👤 Username", &user.username)
            .timestamp("⏰ Registered", event.received_at);
        notification.emit();

        let result = self.stats.record_user_registered(&user.username).await;
        let stats = settle_stats(
            result,
            "📊 User statistics updated",
            "❌ Error updating user statistics:",
        );

        HandlerOutcome {
            handler: self.name(),
            event_id: event.event_id,
            document_id: user_id.to_string(),
            notification,
            stats,
        }
    }
}
