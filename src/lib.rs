//! doc_triggers Library
//!
//! Document lifecycle trigger handlers with aggregate statistics.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod registry;
pub mod replay;
pub mod stats;
pub mod store;

mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{EventKind, RawTrigger, TriggerEvent};
pub use handlers::{HandlerOutcome, StatsOutcome, TriggerHandler};
pub use registry::HandlerRegistry;
pub use store::{DocumentStore, InMemoryDocumentStore, PgDocumentStore};

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

/// Initialize tracing/logging
pub fn init_tracing(json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "doc_triggers=info,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the document store selected by configuration
pub async fn connect_store(config: &Config) -> AppResult<Arc<dyn DocumentStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, statistics are kept in memory");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    };

    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;

    db::verify_connection(&pool).await?;
    db::ensure_schema(&pool).await?;

    if !db::check_schema(&pool).await? {
        return Err(AppError::Internal("documents table is missing".to_string()));
    }

    tracing::info!("Database connected successfully");

    Ok(Arc::new(PgDocumentStore::new(pool)))
}
