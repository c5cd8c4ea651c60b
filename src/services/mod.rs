pub mod catalog;
pub mod library;
pub mod providers;
pub mod recommendations;

pub use catalog::Catalog;
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::Recommender;
