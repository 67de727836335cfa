//! Common test utilities

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use doc_triggers::stats::StatsService;
use doc_triggers::store::{Document, DocumentStore, MergePatch, StoreError};
use doc_triggers::{HandlerRegistry, InMemoryDocumentStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::fmt::MakeWriter;

/// Store whose writes always fail, as during an outage
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    attempts: Arc<AtomicU64>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn merge_upsert(
        &self,
        _collection: &str,
        _document_id: &str,
        _patch: &MergePatch,
    ) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    async fn get(
        &self,
        _collection: &str,
        _document_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(None)
    }
}

/// Standard registry over a fresh in-memory store
pub fn memory_registry() -> (InMemoryDocumentStore, HandlerRegistry) {
    let store = InMemoryDocumentStore::new();
    let registry = HandlerRegistry::standard(StatsService::new(Arc::new(store.clone())));
    (store, registry)
}

/// Standard registry whose stats writes fail
pub fn failing_registry() -> (FailingStore, HandlerRegistry) {
    let store = FailingStore::new();
    let registry = HandlerRegistry::standard(StatsService::new(Arc::new(store.clone())));
    (store, registry)
}

/// Connect to the test database and create the documents table.
/// Returns `None` when DATABASE_URL is not set so callers can skip.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping Postgres test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    doc_triggers::db::ensure_schema(&pool)
        .await
        .expect("Failed to create documents table");

    Some(pool)
}

/// Collection name no other test run writes to
pub fn unique_collection() -> String {
    format!("test_{}", uuid::Uuid::new_v4().simple())
}

/// Read an integer field of a stats document
pub async fn stat(store: &InMemoryDocumentStore, doc: &str, field: &str) -> Option<i64> {
    store
        .get("stats", doc)
        .await
        .expect("in-memory get failed")
        .and_then(|d| d.get(field).and_then(serde_json::Value::as_i64))
}

/// Collects formatted log output for the current thread
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's logs into the capture until the guard is dropped.
    /// Use with the current-thread test runtime.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Lines logged at the given level, e.g. "ERROR"
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| {
                line.trim_start()
                    .strip_prefix(level)
                    .is_some_and(|rest| rest.starts_with(' '))
            })
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .expect("log buffer poisoned")
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
