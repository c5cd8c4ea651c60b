use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod comments;
pub mod favorites;
pub mod movies;
pub mod ratings;
pub mod recommendations;
pub mod state;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/movies/popular", get(movies::popular))
        .route("/movies/search", get(movies::search))
        .route("/movies/:movie_id", get(movies::details))
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/:movie_id", delete(favorites::remove_favorite))
        .route("/ratings", get(ratings::list_ratings).post(ratings::add_rating))
        .route("/comments", post(comments::add_comment))
        // GET takes a movie id, DELETE a comment id
        .route(
            "/comments/:id",
            get(comments::list_comments).delete(comments::delete_comment),
        )
        .route("/recommendations", get(recommendations::recommend))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "TakeTwo API is running" }))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
