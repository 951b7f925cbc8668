use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationMethod, RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations::resolve_products,
};

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationRequest>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(request) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    request.validate()?;

    tracing::info!(
        request_id = %request_id,
        company = %request.company_name,
        product = %request.product_name,
        count = request.count,
        "Processing recommendation request"
    );

    let catalog = state.catalog.products().await?;
    let result = state.engine.recommend(&request, &catalog).await?;
    let recommendations = resolve_products(&result.ordered_ids, &catalog);

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        ai_used = result.ai_used,
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse {
        request,
        total_recommendations: recommendations.len(),
        recommendations,
        ai_used: result.ai_used,
        method: RecommendationMethod::from(result.ai_used),
    }))
}
