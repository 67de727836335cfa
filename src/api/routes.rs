//! API Routes
//!
//! Event delivery and binding introspection endpoints.

use std::sync::Arc;

use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{EventKind, RawTrigger};
use crate::error::AppError;
use crate::handlers::{HandlerOutcome, StatsOutcome};
use crate::registry::HandlerRegistry;

/// Shared state for the delivery adapter
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HandlerRegistry>,
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub event_id: Uuid,
    pub handler: &'static str,
    pub document_id: String,
    #[serde(flatten)]
    pub stats: StatsOutcome,
}

impl From<HandlerOutcome> for DeliveryResponse {
    fn from(outcome: HandlerOutcome) -> Self {
        Self {
            event_id: outcome.event_id,
            handler: outcome.handler,
            document_id: outcome.document_id,
            stats: outcome.stats,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BindingResponse {
    pub template: String,
    pub kind: EventKind,
    pub handler: &'static str,
}

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/events", post(deliver_event))
        .route("/bindings", get(list_bindings))
}

// =========================================================================
// POST /events
// =========================================================================

/// Deliver one lifecycle event to its bound handler.
///
/// A failed statistics update is still a completed delivery.
async fn deliver_event(
    State(state): State<AppState>,
    Json(trigger): Json<RawTrigger>,
) -> Result<Json<DeliveryResponse>, AppError> {
    let outcome = state.registry.dispatch(trigger).await?;

    Ok(Json(outcome.into()))
}

// =========================================================================
// GET /bindings
// =========================================================================

async fn list_bindings(State(state): State<AppState>) -> Json<Vec<BindingResponse>> {
    let bindings = state
        .registry
        .bindings()
        .into_iter()
        .map(|b| BindingResponse {
            template: b.template,
            kind: b.kind,
            handler: b.handler,
        })
        .collect();

    Json(bindings)
}
