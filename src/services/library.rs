use serde_json::Value;

use crate::{
    db::Library,
    error::AppResult,
    models::{
        CommentCreate, FavoriteView, MovieId, RatingCreate, RatingScale, RatingUpsert, RatingView,
    },
    services::catalog::Catalog,
};

/// Favorites joined with their upstream detail documents
pub async fn favorites_with_movies(
    library: &Library,
    catalog: &Catalog,
) -> AppResult<Vec<FavoriteView>> {
    let records = library.list_favorites().await?;

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(FavoriteView {
            id: record.id,
            movie_id: record.movie_id,
            movie: movie_or_none(catalog, record.movie_id).await,
            created_at: record.created_at,
        });
    }

    Ok(views)
}

/// Ratings joined with their upstream detail documents
pub async fn ratings_with_movies(
    library: &Library,
    catalog: &Catalog,
) -> AppResult<Vec<RatingView>> {
    let records = library.list_ratings().await?;

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(RatingView {
            id: record.id,
            movie_id: record.movie_id,
            movie: movie_or_none(catalog, record.movie_id).await,
            rating: record.rating,
            comment: record.comment,
            created_at: record.created_at,
        });
    }

    Ok(views)
}

/// Checks the rating against the scale, then stores it
pub async fn rate_movie(
    library: &Library,
    scale: &RatingScale,
    request: RatingCreate,
) -> AppResult<RatingUpsert> {
    let rating = scale.validate(request.rating)?;
    library
        .upsert_rating(request.movie_id, rating, request.comment)
        .await
}

pub async fn post_comment(library: &Library, request: CommentCreate) -> AppResult<i64> {
    let record = library
        .add_comment(request.movie_id, &request.username, &request.comment)
        .await?;
    Ok(record.id)
}

async fn movie_or_none(catalog: &Catalog, movie_id: MovieId) -> Option<Value> {
    match catalog.details(movie_id).await {
        Ok(movie) => Some(movie),
        Err(e) => {
            tracing::warn!(movie_id, error = %e, "Movie details unavailable for listing");
            None
        }
    }
}
