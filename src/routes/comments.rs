use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{CommentCreate, CommentView, MessageResponse, MovieId},
    routes::AppState,
    services::library,
};

/// Comments on a movie, newest first
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<Vec<CommentView>>> {
    let comments = state.library.list_comments(movie_id).await?;
    Ok(Json(comments.into_iter().map(CommentView::from).collect()))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CommentCreate>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    library::post_comment(&state.library, request).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Comment added"))))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.library.delete_comment(comment_id).await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}
