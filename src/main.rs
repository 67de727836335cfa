//! doc_triggers - Document lifecycle trigger service
//!
//! Receives lifecycle events for `posts` and `users` documents from the
//! hosting runtime, logs notification records and keeps the aggregate
//! statistics documents up to date.

use std::net::SocketAddr;
use std::sync::Arc;

use doc_triggers::stats::StatsService;
use doc_triggers::{api, connect_store, init_tracing, Config, HandlerRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.json_logs);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(
        environment = %config.environment,
        backend = if config.uses_database() { "postgres" } else { "memory" },
        "Starting doc_triggers"
    );

    let store = connect_store(&config).await?;
    let stats = StatsService::with_collection(store, config.stats_collection.clone());
    let registry = Arc::new(HandlerRegistry::standard(stats));

    for binding in registry.bindings() {
        tracing::info!("Bound {} on {} -> {}", binding.kind, binding.template, binding.handler);
    }

    let app = api::build_router(registry);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutting down. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
