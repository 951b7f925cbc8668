use std::sync::Arc;

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{CatalogProvider, RecommendationEngine},
};

pub mod catalog;
pub mod recommendations;

/// Shared application state
///
/// Everything in here is read-only after start-up, so requests never
/// coordinate with each other.
pub struct AppState {
    pub engine: RecommendationEngine,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { engine, catalog }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(catalog::status))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/companies", get(catalog::companies))
        .route("/stats", get(catalog::stats))
        .route("/recommend", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
