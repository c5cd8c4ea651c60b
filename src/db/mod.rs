pub mod library;
pub mod sqlite;

pub use library::Library;
pub use sqlite::{connect_in_memory, create_pool};
