//! TMDB Integration
//!
//! Client and wire types for The Movie Database v3 API, the metadata
//! provider behind search, the popular movies collection, and the episodes
//! proxy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::services::tmdb::TmdbClient;
//!
//! let tmdb = TmdbClient::new(http, &config.tmdb_api_url, &config.tmdb_api_key);
//! let found = tmdb.find_by_imdb_id("tt0903747").await?;
//! if let Some(show) = found.tv_results.first() {
//!     let season = tmdb.tv_season(show.id, 1).await?;
//! }
//! ```

pub mod client;
pub mod types;

// Re-exports for convenience
pub use client::TmdbClient;
pub use types::{TmdbDetails, TmdbEpisode, TmdbGenre};
