use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub mod movie;

pub use movie::{listing_results, Genre, MovieDetails, MovieId, MovieSummary};

/// Username stored when a comment is posted without one
pub const DEFAULT_USERNAME: &str = "Demo User";

// ============================================================================
// Stored records
// ============================================================================

/// A movie the user marked as favorite
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct FavoriteRecord {
    pub id: i64,
    pub movie_id: MovieId,
    pub created_at: DateTime<Utc>,
}

/// The user's rating of a movie, one per movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct RatingRecord {
    pub id: i64,
    pub movie_id: MovieId,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A free-form comment left on a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: i64,
    pub movie_id: MovieId,
    pub username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Result of writing a rating
#[derive(Debug, Clone, PartialEq)]
pub enum RatingUpsert {
    Created(RatingRecord),
    Updated(RatingRecord),
}

#[cfg(test)]
impl RatingUpsert {
    pub fn record(&self) -> &RatingRecord {
        match self {
            RatingUpsert::Created(record) | RatingUpsert::Updated(record) => record,
        }
    }
}

/// Bounds for accepted ratings and the cut-off for "liked"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub max: f64,
    pub high_threshold: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            max: 5.0,
            high_threshold: 4.0,
        }
    }
}

impl RatingScale {
    /// Returns the rating unchanged if it lies within `0..=max`
    pub fn validate(&self, rating: f64) -> AppResult<f64> {
        if rating.is_finite() && (0.0..=self.max).contains(&rating) {
            Ok(rating)
        } else {
            Err(AppError::InvalidInput(format!(
                "Rating must be between 0 and {}, got {}",
                self.max, rating
            )))
        }
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FavoriteCreate {
    pub movie_id: MovieId,
}

#[derive(Debug, Deserialize)]
pub struct RatingCreate {
    pub movie_id: MovieId,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreate {
    pub movie_id: MovieId,
    #[serde(default = "default_username")]
    pub username: String,
    pub comment: String,
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A favorite joined with the upstream detail document
///
/// `movie` is `null` when the upstream lookup failed.
#[derive(Debug, Serialize)]
pub struct FavoriteView {
    pub id: i64,
    pub movie_id: MovieId,
    pub movie: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RatingView {
    pub id: i64,
    pub movie_id: MovieId,
    pub movie: Option<Value>,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentView {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
}

/// Which upstream lookup a recommendation failure came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LookupStage {
    Similar,
    Details,
    Discover,
}

/// An upstream lookup that failed while building recommendations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LookupFailure {
    pub stage: LookupStage,
    /// Movie id for `similar`/`details`, genre id for `discover`
    pub id: i64,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub message: String,
    pub results: Vec<MovieSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_lookups: Vec<LookupFailure>,
}
