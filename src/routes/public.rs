use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without credentials: health probe and category reads.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Load balancer and monitoring probe.
        .route("/health", get(|| async { "ok" }))
        // GET /v1/categories
        // Full listing. Carries Cache-Control/Vary headers.
        .route("/v1/categories", get(handlers::list_categories))
        // GET /v1/categories/{id}
        .route("/v1/categories/{id}", get(handlers::get_category))
}
