use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult, middleware::RequestId, models::RecommendationResponse, routes::AppState,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RecommendationResponse>> {
    let liked = state
        .library
        .liked_movie_ids(state.rating_scale.high_threshold)
        .await?;

    tracing::info!(
        request_id = %request_id,
        liked = liked.len(),
        "Processing recommendation request"
    );

    let response = state.recommender.recommend(&liked).await?;

    tracing::info!(
        request_id = %request_id,
        results = response.results.len(),
        failed_lookups = response.failed_lookups.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
