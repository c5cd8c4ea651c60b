use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier the upstream catalog uses for a movie
pub type MovieId = i64;

/// A movie entry as it appears in upstream listings (popular, similar, discover)
///
/// The recommender only reads the id and the vote fields. The entry itself is
/// kept as received and serialized back out byte for byte, nulls included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Value", into = "Value")]
pub struct MovieSummary {
    pub id: MovieId,
    /// Missing or null counts as 0
    pub vote_average: f64,
    /// Missing or null counts as 0
    pub vote_count: u64,
    raw: Value,
}

impl MovieSummary {
    #[cfg(test)]
    pub fn new(id: MovieId, vote_average: f64, vote_count: u64) -> Self {
        Self {
            id,
            vote_average,
            vote_count,
            raw: serde_json::json!({
                "id": id,
                "vote_average": vote_average,
                "vote_count": vote_count,
            }),
        }
    }
}

impl TryFrom<Value> for MovieSummary {
    type Error = String;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let id = raw
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| "movie entry has no integer id".to_string())?;

        let vote_average = raw
            .get("vote_average")
            .and_then(Value::as_f64)
            .unwrap_or_default();

        let vote_count = raw
            .get("vote_count")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or_default();

        Ok(Self {
            id,
            vote_average,
            vote_count,
            raw,
        })
    }
}

impl From<MovieSummary> for Value {
    fn from(movie: MovieSummary) -> Self {
        movie.raw
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
}

/// The slice of the upstream detail document used for genre lookups
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Extracts the `results` array of an upstream listing
///
/// A body without `results` is treated as an empty listing. Entries that don't
/// look like a movie (no integer id) are skipped.
pub fn listing_results(body: &Value) -> Vec<MovieSummary> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        tracing::debug!("Upstream listing has no results array");
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|entry| match MovieSummary::try_from(entry.clone()) {
            Ok(movie) => Some(movie),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed listing entry");
                None
            }
        })
        .collect()
}
