//! API module
//!
//! HTTP delivery adapter: the hosting runtime posts lifecycle events here.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::registry::HandlerRegistry;

pub use routes::{create_router, AppState};

/// Build the application router with logging and request IDs
pub fn build_router(registry: Arc<HandlerRegistry>) -> Router {
    let api_router = create_router().layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Request ID is assigned before tracing and logging see the request
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api_router)
        .layer(layers)
        .with_state(AppState { registry })
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
