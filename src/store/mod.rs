//! Document Store module
//!
//! Persistence seam for the statistics documents.
//! Backends implement merge-upsert with server-side timestamps and
//! atomic increments.

mod error;
mod memory;
mod patch;
mod postgres;

use async_trait::async_trait;

pub use error::StoreError;
pub use memory::InMemoryDocumentStore;
pub use patch::{apply_merge, FieldValue, MergePatch};
pub use postgres::PgDocumentStore;

/// Contents of a stored document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A schema-flexible store of key-identified documents grouped in collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the document if absent, otherwise apply only the patched fields
    async fn merge_upsert(
        &self,
        collection: &str,
        document_id: &str,
        patch: &MergePatch,
    ) -> Result<(), StoreError>;

    /// Read a document
    async fn get(&self, collection: &str, document_id: &str)
        -> Result<Option<Document>, StoreError>;
}
