use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{FavoriteCreate, FavoriteView, MessageResponse, MovieId},
    routes::AppState,
    services::library,
};

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<FavoriteView>>> {
    let favorites = library::favorites_with_movies(&state.library, &state.catalog).await?;
    Ok(Json(favorites))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<FavoriteCreate>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    tracing::info!(request_id = %request_id, movie_id = request.movie_id, "Adding favorite");

    state.library.add_favorite(request.movie_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Added to favorites")),
    ))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<MessageResponse>> {
    state.library.remove_favorite(movie_id).await?;
    Ok(Json(MessageResponse::new("Removed from favorites")))
}
