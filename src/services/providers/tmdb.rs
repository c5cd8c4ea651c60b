/// TMDb (The Movie Database) API provider
///
/// Every request carries the configured API key and locale as query parameters.
/// Responses are passed through as raw JSON; non-2xx statuses and undecodable
/// bodies are reported as [`AppError::ExternalApi`].
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    services::providers::{merge_params, params, MetadataProvider, QueryParams},
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn default_params(&self) -> QueryParams {
        params([
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ])
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch(&self, endpoint: &str, extra: QueryParams) -> AppResult<Value> {
        let url = self.url_for(endpoint);
        let query = merge_params(self.default_params(), extra);

        tracing::debug!(endpoint = %endpoint, provider = "tmdb", "Fetching from TMDb");

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                endpoint = %endpoint,
                status = %status,
                "TMDb request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {} for {}: {}",
                status, endpoint, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(endpoint = %endpoint, error = %e, "Failed to decode TMDb response");
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
