//! TMDB API Client
//!
//! HTTP client for the TMDB v3 endpoints used by search, the popular
//! collection, and the episodes proxy. Every call is single-shot.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::types::*;
use crate::error::TmdbError;
use crate::models::ContentKind;
use crate::services::metrics;

/// TMDB API Client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client (timeouts and User-Agent already set)
    /// * `base_url` - API base (e.g., "https://api.themoviedb.org/3")
    /// * `api_key` - v3 API key, sent as the `api_key` query parameter
    pub fn new(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        debug!("TMDB API request: {}", path);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream("tmdb", "network_error");
                TmdbError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            metrics::record_upstream("tmdb", "not_found");
            return Err(TmdbError::NotFound);
        }
        if !status.is_success() {
            metrics::record_upstream("tmdb", "http_error");
            return Err(TmdbError::Http(status.as_u16()));
        }

        let text = response.text().await.map_err(|e| {
            metrics::record_upstream("tmdb", "network_error");
            TmdbError::Network(e.to_string())
        })?;

        serde_json::from_str(&text)
            .map(|parsed| {
                metrics::record_upstream("tmdb", "ok");
                parsed
            })
            .map_err(|e| {
                error!("Failed to parse TMDB response for '{}': {}", path, e);
                debug!("Response text: {}", truncate_chars(&text, 500));
                metrics::record_upstream("tmdb", "parse_error");
                TmdbError::Parse(e.to_string())
            })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Resolve an IMDb id to TMDB movie/TV records
    pub async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<FindResponse, TmdbError> {
        let path = format!("find/{}", urlencoding::encode(imdb_id));
        self.get(&path, &[("external_source", "imdb_id".to_string())])
            .await
    }

    /// Season details with episodes; a missing season is `TmdbError::NotFound`
    pub async fn tv_season(&self, tv_id: u64, season: u32) -> Result<TmdbSeason, TmdbError> {
        self.get(&format!("tv/{}/season/{}", tv_id, season), &[])
            .await
    }

    /// Movie or TV details including external ids
    pub async fn details(&self, kind: ContentKind, id: u64) -> Result<TmdbDetails, TmdbError> {
        let path = format!("{}/{}", kind.embed_segment(), id);
        self.get(&path, &[("append_to_response", "external_ids".to_string())])
            .await
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Search movies, TV shows and people at once
    pub async fn search_multi(&self, query: &str) -> Result<MultiSearchResponse, TmdbError> {
        self.get("search/multi", &[("query", query.to_string())])
            .await
    }

    pub async fn popular_movies(&self, page: u32) -> Result<PopularResponse, TmdbError> {
        self.get(
            "movie/popular",
            &[("language", "en-US".to_string()), ("page", page.to_string())],
        )
        .await
    }

    pub async fn movie_genres(&self) -> Result<GenreList, TmdbError> {
        self.get("genre/movie/list", &[]).await
    }

    pub async fn tv_genres(&self) -> Result<GenreList, TmdbError> {
        self.get("genre/tv/list", &[]).await
    }
}

/// First `max` characters of `text`, never splitting a UTF-8 sequence
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
