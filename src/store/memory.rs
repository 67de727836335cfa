//! In-memory Document Store
//!
//! Process-local backend used for development and tests.
//! All merges run under one write lock, so increments are atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{apply_merge, Document, DocumentStore, MergePatch, StoreError};

type DocumentKey = (String, String);

/// Document store backed by a shared map
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentKey, Document>>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful merge-upserts since creation
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn merge_upsert(
        &self,
        collection: &str,
        document_id: &str,
        patch: &MergePatch,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let key = (collection.to_string(), document_id.to_string());

        // Merge into a copy so a rejected patch leaves the document untouched
        let mut merged = documents.get(&key).cloned().unwrap_or_default();
        apply_merge(&mut merged, patch, Utc::now())?;
        documents.insert(key, merged);

        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Merged {:?} into {}/{}", patch, collection, document_id);

        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), document_id.to_string()))
            .cloned())
    }
}
