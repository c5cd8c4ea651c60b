use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{listing_results, MovieDetails, MovieId, MovieSummary},
    services::providers::{params, MetadataProvider},
};

/// Minimum upstream vote average for genre discovery
pub const DISCOVER_MIN_VOTE_AVERAGE: &str = "7.0";
/// Minimum upstream vote count for genre discovery
pub const DISCOVER_MIN_VOTE_COUNT: &str = "300";

/// Typed lookups against the upstream movie catalog
#[derive(Clone)]
pub struct Catalog {
    provider: Arc<dyn MetadataProvider>,
}

impl Catalog {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Raw popular-movies listing
    pub async fn popular(&self, page: u32) -> AppResult<Value> {
        self.provider
            .fetch("/movie/popular", params([("page", page)]))
            .await
    }

    /// Popular movies, parsed
    pub async fn popular_movies(&self) -> AppResult<Vec<MovieSummary>> {
        let body = self.provider.fetch("/movie/popular", Vec::new()).await?;
        Ok(listing_results(&body))
    }

    /// Search results, passed through as upstream sent them
    pub async fn search(&self, query: &str, page: u32) -> AppResult<Vec<Value>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let body = self
            .provider
            .fetch(
                "/search/movie",
                params([("query", query.to_string()), ("page", page.to_string())]),
            )
            .await?;

        let results = match body.get("results") {
            Some(Value::Array(results)) => results.clone(),
            _ => Vec::new(),
        };

        tracing::info!(query = %query, results = results.len(), "Movie search completed");
        Ok(results)
    }

    /// Raw movie detail document
    pub async fn details(&self, movie_id: MovieId) -> AppResult<Value> {
        self.provider
            .fetch(&format!("/movie/{}", movie_id), Vec::new())
            .await
    }

    /// Genre ids of a movie, in the order upstream lists them
    pub async fn genre_ids(&self, movie_id: MovieId) -> AppResult<Vec<i64>> {
        let body = self.details(movie_id).await?;
        let details: MovieDetails = serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!("Unexpected detail document for {}: {}", movie_id, e))
        })?;
        Ok(details.genres.into_iter().map(|genre| genre.id).collect())
    }

    /// Upstream "similar movies" listing for a movie
    pub async fn similar(&self, movie_id: MovieId) -> AppResult<Vec<MovieSummary>> {
        let body = self
            .provider
            .fetch(&format!("/movie/{}/similar", movie_id), Vec::new())
            .await?;
        Ok(listing_results(&body))
    }

    /// Well-rated popular movies of one genre
    pub async fn discover_by_genre(&self, genre_id: i64) -> AppResult<Vec<MovieSummary>> {
        let body = self
            .provider
            .fetch(
                "/discover/movie",
                params([
                    ("with_genres", genre_id.to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                    ("vote_average.gte", DISCOVER_MIN_VOTE_AVERAGE.to_string()),
                    ("vote_count.gte", DISCOVER_MIN_VOTE_COUNT.to_string()),
                ]),
            )
            .await?;
        Ok(listing_results(&body))
    }
}
