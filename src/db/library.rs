//! Favorites, ratings and comments kept in SQLite.
//!
//! Uniqueness of favorites and ratings per movie is enforced by the schema, so
//! concurrent duplicate writes resolve inside the database rather than here.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{CommentRecord, FavoriteRecord, MovieId, RatingRecord, RatingUpsert},
};

/// Handle to the user's local movie library
#[derive(Clone)]
pub struct Library {
    pool: SqlitePool,
}

impl Library {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    /// Marks a movie as favorite, failing if it already is one
    pub async fn add_favorite(&self, movie_id: MovieId) -> AppResult<FavoriteRecord> {
        let result = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            INSERT INTO favorites (movie_id, created_at)
            VALUES (?, ?)
            RETURNING id, movie_id, created_at
            "#,
        )
        .bind(movie_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => {
                tracing::info!(movie_id, favorite_id = record.id, "Favorite added");
                Ok(record)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Duplicate(
                format!("Movie {} is already in favorites", movie_id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_favorite(&self, movie_id: MovieId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE movie_id = ?")
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Movie {} is not in favorites",
                movie_id
            )));
        }

        tracing::info!(movie_id, "Favorite removed");
        Ok(())
    }

    pub async fn list_favorites(&self) -> AppResult<Vec<FavoriteRecord>> {
        let records = sqlx::query_as::<_, FavoriteRecord>(
            "SELECT id, movie_id, created_at FROM favorites ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    // ------------------------------------------------------------------
    // Ratings
    // ------------------------------------------------------------------

    /// Inserts a rating, or overwrites rating and comment if the movie has one
    ///
    /// Bounds are not checked here; see [`crate::models::RatingScale`].
    pub async fn upsert_rating(
        &self,
        movie_id: MovieId,
        rating: f64,
        comment: Option<String>,
    ) -> AppResult<RatingUpsert> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, RatingRecord>(
            r#"
            UPDATE ratings SET rating = ?, comment = ?
            WHERE movie_id = ?
            RETURNING id, movie_id, rating, comment, created_at
            "#,
        )
        .bind(rating)
        .bind(&comment)
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match updated {
            Some(record) => RatingUpsert::Updated(record),
            None => {
                let record = sqlx::query_as::<_, RatingRecord>(
                    r#"
                    INSERT INTO ratings (movie_id, rating, comment, created_at)
                    VALUES (?, ?, ?, ?)
                    RETURNING id, movie_id, rating, comment, created_at
                    "#,
                )
                .bind(movie_id)
                .bind(rating)
                .bind(&comment)
                .bind(Utc::now())
                .fetch_one(&mut *tx)
                .await?;
                RatingUpsert::Created(record)
            }
        };

        tx.commit().await?;

        tracing::info!(
            movie_id,
            rating,
            created = matches!(outcome, RatingUpsert::Created(_)),
            "Rating saved"
        );

        Ok(outcome)
    }

    pub async fn list_ratings(&self) -> AppResult<Vec<RatingRecord>> {
        let records = sqlx::query_as::<_, RatingRecord>(
            "SELECT id, movie_id, rating, comment, created_at FROM ratings ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn add_comment(
        &self,
        movie_id: MovieId,
        username: &str,
        comment: &str,
    ) -> AppResult<CommentRecord> {
        let record = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (movie_id, username, comment, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, movie_id, username, comment, created_at
            "#,
        )
        .bind(movie_id)
        .bind(username)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(movie_id, comment_id = record.id, "Comment added");
        Ok(record)
    }

    /// Comments on a movie, newest first
    pub async fn list_comments(&self, movie_id: MovieId) -> AppResult<Vec<CommentRecord>> {
        let records = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, movie_id, username, comment, created_at
            FROM comments
            WHERE movie_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn delete_comment(&self, comment_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Comment {} not found",
                comment_id
            )));
        }

        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Liked set
    // ------------------------------------------------------------------

    /// Movies the user likes: favorites first, then ratings at or above `min_rating`
    ///
    /// Both groups are taken in insertion order and duplicates keep their first
    /// position, so the result is stable for the same library contents.
    pub async fn liked_movie_ids(&self, min_rating: f64) -> AppResult<Vec<MovieId>> {
        let favorites: Vec<(MovieId,)> =
            sqlx::query_as("SELECT movie_id FROM favorites ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let rated: Vec<(MovieId,)> =
            sqlx::query_as("SELECT movie_id FROM ratings WHERE rating >= ? ORDER BY id")
                .bind(min_rating)
                .fetch_all(&self.pool)
                .await?;

        let mut seen = HashSet::new();
        let liked: Vec<MovieId> = favorites
            .into_iter()
            .chain(rated)
            .map(|(movie_id,)| movie_id)
            .filter(|movie_id| seen.insert(*movie_id))
            .collect();

        tracing::debug!(liked = liked.len(), min_rating, "Liked set loaded");
        Ok(liked)
    }
}
