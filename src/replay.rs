//! Event Replay
//!
//! Dispatches newline-delimited `RawTrigger` JSON through a registry with
//! bounded concurrency. Finished tasks are reaped while input is still
//! being read, so memory stays proportional to the concurrency limit rather
//! than to the input size.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use crate::domain::RawTrigger;
use crate::handlers::HandlerOutcome;
use crate::registry::{DispatchError, HandlerRegistry};

type Joined = Result<Result<HandlerOutcome, DispatchError>, JoinError>;

/// Counters for one replay run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Handler ran to completion
    pub completed: u64,
    /// Completed, but the stats write failed
    pub stats_failures: u64,
    /// Rejected before a handler ran (bad path, no binding)
    pub not_dispatched: u64,
    /// Line was not a valid event
    pub unparseable: u64,
    /// Handler task panicked or was cancelled
    pub aborted: u64,
    /// Largest number of tasks held at once
    pub peak_in_flight: usize,
}

impl ReplaySummary {
    fn record(&mut self, joined: Joined) {
        match joined {
            Ok(Ok(outcome)) => {
                self.completed += 1;
                if let Some(error) = outcome.stats_error() {
                    self.stats_failures += 1;
                    tracing::warn!(
                        event_id = %outcome.event_id,
                        handler = outcome.handler,
                        "Stats not updated: {}",
                        error
                    );
                }
            }
            Ok(Err(e)) => {
                self.not_dispatched += 1;
                tracing::warn!("Event not dispatched: {}", e);
            }
            Err(e) => {
                self.aborted += 1;
                tracing::error!("Replay task aborted: {}", e);
            }
        }
    }
}

/// Replay every event in `input`, running at most `concurrency` at a time
pub async fn replay<R>(
    registry: Arc<HandlerRegistry>,
    input: R,
    concurrency: usize,
) -> std::io::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let concurrency = concurrency.max(1);
    let mut summary = ReplaySummary::default();
    let mut tasks = JoinSet::new();
    let mut lines = input.lines();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let trigger: RawTrigger = match serde_json::from_str(&line) {
            Ok(trigger) => trigger,
            Err(e) => {
                tracing::warn!("line {}: {}", line_no, e);
                summary.unparseable += 1;
                continue;
            }
        };

        while let Some(joined) = tasks.try_join_next() {
            summary.record(joined);
        }
        if tasks.len() >= concurrency {
            if let Some(joined) = tasks.join_next().await {
                summary.record(joined);
            }
        }

        let registry = Arc::clone(&registry);
        tasks.spawn(async move { registry.dispatch(trigger).await });
        summary.peak_in_flight = summary.peak_in_flight.max(tasks.len());
    }

    while let Some(joined) = tasks.join_next().await {
        summary.record(joined);
    }

    Ok(summary)
}
