//! Services module
//!
//! Catalog queries, pagination, browse sessions, and the clients for the
//! metadata (TMDB) and video-embed providers.

pub mod browse;
pub mod catalog;
pub mod embed;
pub mod metrics;
pub mod pagination;
pub mod search;
pub mod seed;
pub mod sessions;
pub mod tmdb;

// Re-export commonly used items
pub use browse::SectionLists;
pub use catalog::{CatalogLimits, CatalogProvider, CatalogSnapshot, CatalogStats};
pub use embed::EmbedClient;
pub use pagination::{PageView, Paginator};
pub use search::SearchService;
pub use sessions::SessionStore;
pub use tmdb::TmdbClient;
