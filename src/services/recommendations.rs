use std::collections::HashSet;

use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    models::{LookupFailure, LookupStage, MovieId, MovieSummary, RecommendationResponse},
    services::catalog::Catalog,
};

/// Size of the popular-movies answer for a user with no liked movies
pub const COLD_START_LIMIT: usize = 12;
/// Hard cap on the number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 20;
/// The genre fallback only runs when similarity produced fewer candidates than this
pub const GENRE_FALLBACK_TRIGGER: usize = 15;
pub const SIMILAR_MIN_VOTE_AVERAGE: f64 = 6.5;
pub const SIMILAR_MIN_VOTE_COUNT: u64 = 100;

const GENRE_SEED_MOVIES: usize = 3;
const GENRE_LIMIT: usize = 2;
const PER_GENRE_LIMIT: usize = 10;

pub const COLD_START_MESSAGE: &str =
    "Rate or favorite movies to get personalized recommendations!";

/// Builds movie recommendations from the user's liked set
///
/// Candidates come from the upstream "similar movies" listing of every liked
/// movie. When that yields too little, genre discovery seeded by the first few
/// liked movies tops the pool up. A failed upstream lookup never aborts a pass;
/// it is logged and reported back in `failed_lookups`.
#[derive(Clone)]
pub struct Recommender {
    catalog: Catalog,
}

impl Recommender {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// `liked` must be free of duplicates; its order decides which movies seed
    /// the genre fallback.
    pub async fn recommend(&self, liked: &[MovieId]) -> AppResult<RecommendationResponse> {
        if liked.is_empty() {
            let mut results = self.catalog.popular_movies().await?;
            results.truncate(COLD_START_LIMIT);

            tracing::info!(results = results.len(), "No liked movies, serving popular");

            return Ok(RecommendationResponse {
                message: COLD_START_MESSAGE.to_string(),
                results,
                failed_lookups: Vec::new(),
            });
        }

        let mut pool = CandidatePool::new(liked);
        let mut failures = Vec::new();

        self.similarity_pass(liked, &mut pool, &mut failures).await?;

        tracing::info!(
            liked = liked.len(),
            candidates = pool.len(),
            "Similarity pass completed"
        );

        if pool.len() < GENRE_FALLBACK_TRIGGER {
            self.genre_fallback(liked, &mut pool, &mut failures).await?;

            tracing::info!(candidates = pool.len(), "Genre fallback completed");
        }

        if !failures.is_empty() {
            tracing::warn!(
                failed = failures.len(),
                "Recommendations built with failed upstream lookups"
            );
        }

        let results = pool.into_ranked(MAX_RECOMMENDATIONS);

        Ok(RecommendationResponse {
            message: format!("Based on {} movies you liked!", liked.len()),
            results,
            failed_lookups: failures,
        })
    }

    async fn similarity_pass(
        &self,
        liked: &[MovieId],
        pool: &mut CandidatePool,
        failures: &mut Vec<LookupFailure>,
    ) -> AppResult<()> {
        let tasks: Vec<(MovieId, JoinHandle<AppResult<Vec<MovieSummary>>>)> = liked
            .iter()
            .map(|&movie_id| {
                let catalog = self.catalog.clone();
                let task = tokio::spawn(async move { catalog.similar(movie_id).await });
                (movie_id, task)
            })
            .collect();

        // Joined in liked order so admission does not depend on completion order.
        for (movie_id, task) in tasks {
            match join(task).await? {
                Ok(similar) => {
                    let admitted = similar
                        .into_iter()
                        .filter(|movie| {
                            movie.vote_average >= SIMILAR_MIN_VOTE_AVERAGE
                                && movie.vote_count >= SIMILAR_MIN_VOTE_COUNT
                        })
                        .filter(|movie| pool.admit(movie.clone()))
                        .count();
                    tracing::debug!(movie_id, admitted, "Similar movies admitted");
                }
                Err(e) => failures.push(lookup_failed(LookupStage::Similar, movie_id, e)),
            }
        }

        Ok(())
    }

    async fn genre_fallback(
        &self,
        liked: &[MovieId],
        pool: &mut CandidatePool,
        failures: &mut Vec<LookupFailure>,
    ) -> AppResult<()> {
        let tasks: Vec<(MovieId, JoinHandle<AppResult<Vec<i64>>>)> = liked
            .iter()
            .take(GENRE_SEED_MOVIES)
            .map(|&movie_id| {
                let catalog = self.catalog.clone();
                let task = tokio::spawn(async move { catalog.genre_ids(movie_id).await });
                (movie_id, task)
            })
            .collect();

        let mut genres: Vec<i64> = Vec::new();
        for (movie_id, task) in tasks {
            match join(task).await? {
                Ok(ids) => {
                    for id in ids {
                        if !genres.contains(&id) {
                            genres.push(id);
                        }
                    }
                }
                Err(e) => failures.push(lookup_failed(LookupStage::Details, movie_id, e)),
            }
        }
        genres.truncate(GENRE_LIMIT);

        tracing::debug!(genres = ?genres, "Genre fallback seeded");

        for genre_id in genres {
            if pool.len() >= MAX_RECOMMENDATIONS {
                break;
            }

            match self.catalog.discover_by_genre(genre_id).await {
                Ok(movies) => {
                    for movie in movies.into_iter().take(PER_GENRE_LIMIT) {
                        pool.admit(movie);
                        if pool.len() >= MAX_RECOMMENDATIONS {
                            break;
                        }
                    }
                }
                Err(e) => failures.push(lookup_failed(LookupStage::Discover, genre_id, e)),
            }
        }

        Ok(())
    }
}

async fn join<T>(task: JoinHandle<AppResult<T>>) -> AppResult<AppResult<T>> {
    task.await
        .map_err(|e| AppError::Internal(format!("Upstream lookup task failed: {}", e)))
}

fn lookup_failed(stage: LookupStage, id: i64, error: AppError) -> LookupFailure {
    tracing::warn!(stage = ?stage, id, error = %error, "Upstream lookup failed");
    LookupFailure {
        stage,
        id,
        error: error.to_string(),
    }
}

/// Deduplicated recommendation candidates that never include a liked movie
struct CandidatePool {
    excluded: HashSet<MovieId>,
    movies: Vec<MovieSummary>,
}

impl CandidatePool {
    fn new(liked: &[MovieId]) -> Self {
        Self {
            excluded: liked.iter().copied().collect(),
            movies: Vec::new(),
        }
    }

    /// Adds the movie unless it is liked or already present
    fn admit(&mut self, movie: MovieSummary) -> bool {
        if !self.excluded.insert(movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    fn len(&self) -> usize {
        self.movies.len()
    }

    /// Best rated first, then most voted, then lowest id
    fn into_ranked(mut self, limit: usize) -> Vec<MovieSummary> {
        self.movies.sort_by(|a, b| {
            b.vote_average
                .total_cmp(&a.vote_average)
                .then_with(|| b.vote_count.cmp(&a.vote_count))
                .then_with(|| a.id.cmp(&b.id))
        });
        self.movies.truncate(limit);
        self.movies
    }
}
