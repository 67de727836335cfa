//! Replay Tool
//!
//! Dispatches newline-delimited lifecycle events through the standard
//! handlers, then prints the statistics documents.
//!
//! Run with: cargo run --bin replay --release -- events.ndjson --concurrency 16
//! Reads stdin when no file is given.

use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncRead, BufReader};

use doc_triggers::replay::replay;
use doc_triggers::stats::{StatsService, POSTS_STATS_DOC, USERS_STATS_DOC};
use doc_triggers::{connect_store, init_tracing, Config, DocumentStore, HandlerRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.json_logs);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let concurrency: usize = args
        .iter()
        .position(|a| a == "--concurrency")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    let input = args
        .iter()
        .enumerate()
        .find(|(i, a)| !a.starts_with("--") && (*i == 0 || args[i - 1] != "--concurrency"))
        .map(|(_, a)| a.clone());

    let store = connect_store(&config).await?;
    let stats = StatsService::with_collection(store, config.stats_collection.clone());
    let registry = Arc::new(HandlerRegistry::standard(stats.clone()));

    let reader: Box<dyn AsyncRead + Unpin + Send> = match &input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    println!("Replaying events with concurrency {}", concurrency.max(1));

    let start = Instant::now();
    let summary = replay(registry, BufReader::new(reader), concurrency).await?;
    let duration = start.elapsed();

    println!("\n=== Replay Results ===");
    println!("Completed: {}", summary.completed);
    println!("Stats failures: {}", summary.stats_failures);
    println!("Not dispatched: {}", summary.not_dispatched);
    println!("Unparseable: {}", summary.unparseable);
    println!("Aborted: {}", summary.aborted);
    println!("Peak in flight: {}", summary.peak_in_flight);
    println!("Duration: {:.2}s", duration.as_secs_f64());

    for doc in [POSTS_STATS_DOC, USERS_STATS_DOC] {
        let contents = stats.store().get(stats.collection(), doc).await?;
        let rendered = match contents {
            Some(map) => serde_json::to_string_pretty(&map)?,
            None => "(absent)".to_string(),
        };
        println!("{}/{}: {}", stats.collection(), doc, rendered);
    }

    Ok(())
}
