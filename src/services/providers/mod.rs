/// Movie metadata provider abstraction
///
/// The rest of the service only needs one capability from the upstream catalog:
/// issue a GET against an endpoint path with some query parameters and get JSON
/// back. Typed lookups live in [`crate::services::catalog`].
use serde_json::Value;

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Query parameters for an upstream call, in the order they are sent
pub type QueryParams = Vec<(String, String)>;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch `endpoint` (e.g. `/movie/550/similar`) and decode the body as JSON
    ///
    /// Implementations add their own credentials and locale; entries in `params`
    /// take precedence over those defaults.
    async fn fetch(&self, endpoint: &str, params: QueryParams) -> AppResult<Value>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Overlays `overrides` on `defaults`, replacing any default with the same key
pub fn merge_params(defaults: QueryParams, overrides: QueryParams) -> QueryParams {
    let mut merged: QueryParams = defaults
        .into_iter()
        .filter(|(key, _)| !overrides.iter().any(|(k, _)| k == key))
        .collect();
    merged.extend(overrides);
    merged
}

/// Builds [`QueryParams`] from borrowed pairs
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> QueryParams
where
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}
