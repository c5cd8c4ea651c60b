use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    db::Library,
    models::RatingScale,
    services::{Catalog, MetadataProvider, Recommender},
};

/// Shared application state, built once at startup
pub struct AppState {
    pub library: Library,
    pub catalog: Catalog,
    pub recommender: Recommender,
    pub rating_scale: RatingScale,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn MetadataProvider>,
        rating_scale: RatingScale,
    ) -> Self {
        let catalog = Catalog::new(provider);
        Self {
            library: Library::new(pool),
            recommender: Recommender::new(catalog.clone()),
            catalog,
            rating_scale,
        }
    }
}
