use serde::Deserialize;

use crate::models::RatingScale;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound for the SQLite connection pool
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    /// TMDb API key (v3)
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Locale sent with every TMDb request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Origin allowed by the CORS layer
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Highest accepted rating value
    #[serde(default = "default_rating_scale_max")]
    pub rating_scale_max: f64,

    /// Ratings at or above this value count as "liked"
    #[serde(default = "default_high_rating_threshold")]
    pub high_rating_threshold: f64,
}

fn default_database_url() -> String {
    "sqlite://taketwo.db".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "pt-BR".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_rating_scale_max() -> f64 {
    5.0
}

fn default_high_rating_threshold() -> f64 {
    4.0
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects combinations the rest of the service cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("TMDB_API_KEY must not be empty");
        }
        if !(self.rating_scale_max.is_finite() && self.rating_scale_max > 0.0) {
            anyhow::bail!(
                "RATING_SCALE_MAX must be a positive number, got {}",
                self.rating_scale_max
            );
        }
        if !(0.0..=self.rating_scale_max).contains(&self.high_rating_threshold) {
            anyhow::bail!(
                "HIGH_RATING_THRESHOLD {} is outside the rating scale 0..={}",
                self.high_rating_threshold,
                self.rating_scale_max
            );
        }
        Ok(())
    }

    pub fn rating_scale(&self) -> RatingScale {
        RatingScale {
            max: self.rating_scale_max,
            high_threshold: self.high_rating_threshold,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
