//! Statistics Service
//!
//! Builds the merge patches for the `stats/posts` and `stats/users`
//! documents and submits them to the document store.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::SnapshotField;
use crate::store::{DocumentStore, MergePatch, StoreError};

pub const DEFAULT_STATS_COLLECTION: &str = "stats";
pub const POSTS_STATS_DOC: &str = "posts";
pub const USERS_STATS_DOC: &str = "users";

/// Statistics Service for updating aggregate counters
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl StatsService {
    /// Create a new StatsService writing to the default collection
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_collection(store, DEFAULT_STATS_COLLECTION)
    }

    pub fn with_collection(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Count a new post and remember who wrote it
    pub async fn record_post_created(&self, username: &SnapshotField) -> Result<(), StoreError> {
        let patch = MergePatch::new()
            .increment("totalPosts", 1)
            .server_timestamp("lastPostAt")
            .set("lastPostBy", defined("lastPostBy", username)?);

        self.apply(POSTS_STATS_DOC, patch).await
    }

    /// Uncount a deleted post and remember whose it was
    pub async fn record_post_deleted(&self, username: &SnapshotField) -> Result<(), StoreError> {
        let patch = MergePatch::new()
            .increment("totalPosts", -1)
            .server_timestamp("lastDeletedAt")
            .set("lastDeletedBy", defined("lastDeletedBy", username)?);

        self.apply(POSTS_STATS_DOC, patch).await
    }

    /// Count a new user registration
    pub async fn record_user_registered(&self, username: &SnapshotField) -> Result<(), StoreError> {
        let patch = MergePatch::new()
            .increment("totalUsers", 1)
            .set("lastUserRegistered", defined("lastUserRegistered", username)?)
            .server_timestamp("lastRegistrationAt");

        self.apply(USERS_STATS_DOC, patch).await
    }

    async fn apply(&self, document_id: &str, patch: MergePatch) -> Result<(), StoreError> {
        self.store
            .merge_upsert(&self.collection, document_id, &patch)
            .await?;

        tracing::debug!("Stats updated: {}/{}", self.collection, document_id);

        Ok(())
    }
}

/// Absent source fields cannot be stored; the whole write is rejected
fn defined(target: &str, source: &SnapshotField) -> Result<Value, StoreError> {
    source
        .value()
        .cloned()
        .ok_or_else(|| StoreError::InvalidPatch(format!("cannot use undefined as value of '{}'", target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use serde_json::json;

    fn name(value: &str) -> SnapshotField {
        crate::domain::DocumentSnapshot::from_value(json!({ "username": value })).field("username")
    }

    fn service() -> (InMemoryDocumentStore, StatsService) {
        let store = InMemoryDocumentStore::new();
        let stats = StatsService::new(Arc::new(store.clone()));
        (store, stats)
    }

    #[tokio::test]
    async fn test_post_created_then_deleted() {
        let (store, stats) = service();

        stats.record_post_created(&name("alice")).await.unwrap();
        stats.record_post_created(&name("bob")).await.unwrap();
        stats.record_post_deleted(&name("alice")).await.unwrap();

        let doc = store.get("stats", "posts").await.unwrap().unwrap();
        assert_eq!(doc["totalPosts"], json!(1));
        assert_eq!(doc["lastPostBy"], json!("bob"));
        assert_eq!(doc["lastDeletedBy"], json!("alice"));
        assert!(doc["lastPostAt"].is_string());
        assert!(doc["lastDeletedAt"].is_string());
    }

    #[tokio::test]
    async fn test_user_registered() {
        let (store, stats) = service();

        stats.record_user_registered(&name("carol")).await.unwrap();

        let doc = store.get("stats", "users").await.unwrap().unwrap();
        assert_eq!(doc["totalUsers"], json!(1));
        assert_eq!(doc["lastUserRegistered"], json!("carol"));
        assert!(doc["lastRegistrationAt"].is_string());
        assert!(store.get("stats", "posts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_username_rejects_whole_write() {
        let (store, stats) = service();

        let created = stats.record_post_created(&SnapshotField::default()).await;
        let deleted = stats.record_post_deleted(&SnapshotField::default()).await;
        let registered = stats.record_user_registered(&SnapshotField::default()).await;

        assert!(matches!(created, Err(StoreError::InvalidPatch(_))));
        assert!(matches!(deleted, Err(StoreError::InvalidPatch(_))));
        assert!(matches!(registered, Err(StoreError::InvalidPatch(_))));
        assert!(store.is_empty().await);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_null_username_is_stored() {
        let (store, stats) = service();
        let null_name = crate::domain::DocumentSnapshot::from_value(json!({"username": null}))
            .field("username");

        stats.record_post_created(&null_name).await.unwrap();

        let doc = store.get("stats", "posts").await.unwrap().unwrap();
        assert_eq!(doc["totalPosts"], json!(1));
        assert_eq!(doc["lastPostBy"], Value::Null);
    }

    #[tokio::test]
    async fn test_custom_collection() {
        let store = InMemoryDocumentStore::new();
        let stats = StatsService::with_collection(Arc::new(store.clone()), "metrics");

        stats.record_user_registered(&name("dave")).await.unwrap();

        assert_eq!(stats.collection(), "metrics");
        assert!(store.get("metrics", "users").await.unwrap().is_some());
        assert!(store.get("stats", "users").await.unwrap().is_none());
    }
}
