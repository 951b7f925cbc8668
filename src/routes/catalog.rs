use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{error::AppResult, models::CatalogStats, routes::AppState};

/// Number of companies listed on the status page
const STATUS_COMPANY_PREVIEW: usize = 10;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub ai_enabled: bool,
    pub catalog_source: &'static str,
    pub total_companies: usize,
    pub companies: Vec<String>,
}

/// Service overview
pub async fn status(State(state): State<Arc<AppState>>) -> AppResult<Json<StatusResponse>> {
    let mut companies = state.catalog.companies().await?;
    let total_companies = companies.len();
    companies.truncate(STATUS_COMPANY_PREVIEW);

    Ok(Json(StatusResponse {
        status: "AI-powered product recommendation API",
        ai_enabled: state.engine.ai_enabled(),
        catalog_source: state.catalog.name(),
        total_companies,
        companies,
    }))
}

/// Handler listing every company in the catalog
pub async fn companies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    let companies = state.catalog.companies().await?;
    Ok(Json(companies))
}

/// Handler for catalog statistics
pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<Json<CatalogStats>> {
    let stats = state.catalog.stats().await?;
    Ok(Json(stats))
}
