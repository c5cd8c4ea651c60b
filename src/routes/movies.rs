use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{MovieId, SearchResponse},
    routes::AppState,
};

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "default_page")]
    page: u32,
}

/// Upstream popular-movies listing, unchanged
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    let body = state.catalog.popular(params.page).await?;
    Ok(Json(body))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = state.catalog.search(&params.q, params.page).await?;
    Ok(Json(SearchResponse { results }))
}

/// Upstream movie detail document, unchanged
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<Value>> {
    let body = state.catalog.details(movie_id).await?;
    Ok(Json(body))
}
