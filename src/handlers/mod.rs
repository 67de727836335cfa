//! Trigger Handlers module
//!
//! One handler per lifecycle binding. Each handler logs a notification
//! record and, where applicable, updates the aggregate statistics.
//! Handlers never fail: a stats write error is logged once and reported in
//! the outcome.

mod notification;
mod outcome;
mod post_created;
mod post_deleted;
mod post_updated;
mod user_created;


use async_trait::async_trait;

use crate::domain::TriggerEvent;
use crate::store::StoreError;

pub use notification::Notification;
pub use outcome::{HandlerOutcome, StatsOutcome};
pub use post_created::PostCreatedHandler;
pub use post_deleted::PostDeletedHandler;
pub use post_updated::PostUpdatedHandler;
pub use user_created::UserCreatedHandler;

/// A handler bound to one lifecycle event of one collection
#[async_trait]
pub trait TriggerHandler: Send + Sync {
    /// Name used in logs and adapter responses
    fn name(&self) -> &'static str;

    /// Process one event. Always completes.
    async fn handle(&self, event: &TriggerEvent) -> HandlerOutcome;
}

/// Turn the result of a stats write into an outcome, logging either way
fn settle_stats(result: Result<(), StoreError>, updated: &str, failed: &str) -> StatsOutcome {
    match result {
        Ok(()) => {
            tracing::info!("{}", updated);
            StatsOutcome::Updated
        }
        Err(e) => {
            tracing::error!("{} {}", failed, e);
            StatsOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
