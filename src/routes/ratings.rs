use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{MessageResponse, RatingCreate, RatingUpsert, RatingView},
    routes::AppState,
    services::library,
};

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<RatingView>>> {
    let ratings = library::ratings_with_movies(&state.library, &state.catalog).await?;
    Ok(Json(ratings))
}

/// Creates the rating (201) or overwrites the existing one (200)
pub async fn add_rating(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RatingCreate>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let outcome = library::rate_movie(&state.library, &state.rating_scale, request).await?;

    let (status, message) = match outcome {
        RatingUpsert::Created(_) => (StatusCode::CREATED, "Rating added"),
        RatingUpsert::Updated(_) => (StatusCode::OK, "Rating updated"),
    };

    Ok((status, Json(MessageResponse::new(message))))
}
