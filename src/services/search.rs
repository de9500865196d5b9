//! Search and popular collection
//!
//! Turns TMDB search/discovery results into playable [`ContentItem`]s. An
//! item is only kept once its details call has produced an IMDb id, since
//! the embed provider is keyed on it.

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{clamp_rating, ContentItem, ContentKind};
use crate::services::tmdb::{TmdbClient, TmdbDetails, TmdbGenre};

/// Prefix for TMDB poster paths
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Result of a search or collection fetch. Upstream failures surface as an
/// empty list with `error` set, never as a hard error.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub items: Vec<ContentItem>,
    pub error: Option<String>,
}

impl SearchOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Genre tagged with the media type it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreEntry {
    pub id: u64,
    pub name: String,
    /// "movie" or "tv"
    #[serde(rename = "type")]
    pub media_type: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenresOutcome {
    pub genres: Vec<GenreEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchService {
    tmdb: TmdbClient,
    result_limit: usize,
    popular_pages: u32,
    popular_cache: Arc<OnceCell<Arc<[ContentItem]>>>,
}

impl SearchService {
    pub fn new(tmdb: TmdbClient, result_limit: usize, popular_pages: u32) -> Self {
        Self {
            tmdb,
            result_limit,
            popular_pages,
            popular_cache: Arc::new(OnceCell::new()),
        }
    }

    pub fn from_config(tmdb: TmdbClient, config: &Config) -> Self {
        Self::new(tmdb, config.search_result_limit, config.popular_pages)
    }

    /// Movies and TV shows matching `query`. A blank query returns nothing
    /// without contacting the provider.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::default();
        }

        let response = match self.tmdb.search_multi(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                return SearchOutcome::failed(format!("Search failed: {}", e));
            }
        };

        let candidates: Vec<(ContentKind, u64, String)> = response
            .results
            .into_iter()
            .filter_map(|hit| {
                let kind = ContentKind::from_media_type(hit.media_type.as_deref()?)?;
                let poster = non_blank(hit.poster_path)?;
                Some((kind, hit.id, poster))
            })
            .take(self.result_limit)
            .collect();

        let items = self.resolve(candidates).await;
        info!("Search '{}' produced {} playable items", query, items.len());

        SearchOutcome { items, error: None }
    }

    /// The first `popular_pages` pages of popular movies
    pub async fn popular_movies(&self) -> SearchOutcome {
        let mut candidates = Vec::new();

        // Pages are fetched in order so the collection keeps TMDB's ranking
        for page in 1..=self.popular_pages {
            match self.tmdb.popular_movies(page).await {
                Ok(response) => {
                    let last_page = response.total_pages;
                    candidates.extend(response.results.into_iter().filter_map(|movie| {
                        non_blank(movie.poster_path).map(|p| (ContentKind::Movie, movie.id, p))
                    }));
                    if last_page > 0 && page >= last_page {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Popular movies page {} failed: {}", page, e);
                    return SearchOutcome::failed(format!("Failed to fetch popular movies: {}", e));
                }
            }
        }

        let items = self.resolve(candidates).await;
        info!("Popular collection holds {} playable movies", items.len());

        SearchOutcome { items, error: None }
    }

    /// Popular collection, fetched on first use and shared afterwards.
    /// A failed fetch is not cached; the next call retries.
    pub async fn popular_collection(&self) -> Result<Arc<[ContentItem]>, String> {
        self.popular_cache
            .get_or_try_init(|| async {
                let outcome = self.popular_movies().await;
                match outcome.error {
                    Some(error) => Err(error),
                    None => Ok(Arc::from(outcome.items)),
                }
            })
            .await
            .map(Arc::clone)
    }

    /// Movie and TV genre lists, movie genres first
    pub async fn genres(&self) -> GenresOutcome {
        let (movie, tv) = tokio::join!(self.tmdb.movie_genres(), self.tmdb.tv_genres());

        match (movie, tv) {
            (Ok(movie), Ok(tv)) => {
                let genres = tag_genres(movie.genres, "movie")
                    .chain(tag_genres(tv.genres, "tv"))
                    .collect();
                GenresOutcome {
                    genres,
                    error: None,
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Genre lists failed: {}", e);
                GenresOutcome {
                    genres: Vec::new(),
                    error: Some("Failed to fetch genres from TMDB.".to_string()),
                }
            }
        }
    }

    /// Fetch details for every candidate concurrently and keep the ones
    /// that map to a playable item. Order follows `candidates`.
    async fn resolve(&self, candidates: Vec<(ContentKind, u64, String)>) -> Vec<ContentItem> {
        let lookups = candidates.iter().map(|(kind, id, _)| self.tmdb.details(*kind, *id));
        let details = join_all(lookups).await;

        candidates
            .into_iter()
            .zip(details)
            .filter_map(|((kind, id, poster), result)| match result {
                Ok(details) => item_from_details(kind, &details, &poster),
                Err(e) => {
                    debug!("Dropping {} {}: details failed: {}", kind, id, e);
                    None
                }
            })
            .collect()
    }
}

/// Map provider details to a catalog item; `None` without an IMDb id or title
pub fn item_from_details(
    kind: ContentKind,
    details: &TmdbDetails,
    poster_path: &str,
) -> Option<ContentItem> {
    let imdb_id = details.imdb_id()?;
    let title = details.display_title()?;
    let id = details.id.to_string();
    let year = details.year();

    let builder = match kind {
        ContentKind::Movie => {
            let builder = ContentItem::movie(id, title, year);
            match details.runtime.filter(|minutes| *minutes > 0) {
                Some(minutes) => builder.duration_label(format!("{} min", minutes)),
                None => builder,
            }
        }
        ContentKind::Series => {
            let mut builder = ContentItem::series(id, title, year);
            if let Some(seasons) = details.number_of_seasons.filter(|n| *n > 0) {
                builder = builder.season_count(seasons);
            }
            if let Some(episodes) = details.number_of_episodes.filter(|n| *n > 0) {
                builder = builder.episode_count(episodes);
            }
            builder
        }
    };

    let mut builder = builder
        .rating(clamp_rating(details.vote_average))
        .genres(details.genres.iter().map(|g| g.name.clone()))
        .poster_url(format!("{}{}", POSTER_BASE_URL, poster_path))
        .external_id(imdb_id)
        .tmdb_id(details.id);
    if let Some(overview) = &details.overview {
        builder = builder.description(overview.clone());
    }

    match builder.build() {
        Ok(item) => Some(item),
        Err(e) => {
            debug!("Skipping TMDB {} {}: {}", kind, details.id, e);
            None
        }
    }
}

fn tag_genres(
    genres: Vec<TmdbGenre>,
    media_type: &'static str,
) -> impl Iterator<Item = GenreEntry> {
    genres.into_iter().map(move |g| GenreEntry {
        id: g.id,
        name: g.name,
        media_type,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, popular_pages: u32) -> SearchService {
        let tmdb = TmdbClient::new(Client::new(), &server.uri(), "key");
        SearchService::new(tmdb, 20, popular_pages)
    }

    async fn mount_details(server: &MockServer, segment: &str, id: u64, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/{}", segment, id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_blank_query_skips_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = service(&server, 1).search("   ").await;
        assert!(outcome.items.is_empty());
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_search_filters_and_maps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("query", "breaking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    {"id": 1396, "media_type": "tv", "poster_path": "/bb.jpg", "name": "Breaking Bad"},
                    {"id": 17419, "media_type": "person", "poster_path": "/p.jpg"},
                    {"id": 559969, "media_type": "movie", "poster_path": null},
                    {"id": 550, "media_type": "movie", "poster_path": "/fc.jpg"},
                    {"id": 999, "media_type": "movie", "poster_path": "/x.jpg"}
                ]
            })))
            .mount(&server)
            .await;
        mount_details(&server, "tv", 1396, json!({
            "id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20",
            "vote_average": 8.9, "number_of_seasons": 5, "number_of_episodes": 62,
            "genres": [{"id": 18, "name": "Drama"}],
            "external_ids": {"imdb_id": "tt0903747"}
        }))
        .await;
        mount_details(&server, "movie", 550, json!({
            "id": 550, "title": "Fight Club", "release_date": "1999-10-15",
            "vote_average": 8.4, "runtime": 139,
            "external_ids": {"imdb_id": "tt0137523"}
        }))
        .await;
        // No IMDb id: dropped
        mount_details(&server, "movie", 999, json!({"id": 999, "title": "Obscure", "external_ids": {}})).await;

        let outcome = service(&server, 1).search("breaking").await;
        assert!(outcome.error.is_none());
        assert_eq!(outcome.items.len(), 2);

        let show = &outcome.items[0];
        assert_eq!(show.id(), "1396");
        assert_eq!(show.kind(), ContentKind::Series);
        assert_eq!(show.year(), 2008);
        assert_eq!(show.season_count(), Some(5));
        assert_eq!(show.external_id(), Some("tt0903747"));
        assert_eq!(show.poster_url(), Some("https://image.tmdb.org/t/p/w500/bb.jpg"));
        assert_eq!(show.genres(), ["Drama".to_string()]);

        let movie = &outcome.items[1];
        assert_eq!(movie.duration_label(), Some("139 min"));
        assert_eq!(serde_json::to_value(movie).unwrap()["tmdbId"], 550);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let outcome = service(&server, 1).search("dune").await;
        assert!(outcome.items.is_empty());
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_popular_fetches_each_page() {
        let server = MockServer::start().await;
        for (page, id) in [(1u32, 10u64), (2, 20)] {
            Mock::given(method("GET"))
                .and(path("/movie/popular"))
                .and(query_param("page", page.to_string().as_str()))
                .and(query_param("language", "en-US"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "page": page,
                    "results": [{"id": id, "title": "T", "poster_path": "/p.jpg"}]
                })))
                .expect(1)
                .mount(&server)
                .await;
            mount_details(&server, "movie", id, json!({
                "id": id, "title": format!("Movie {}", id), "release_date": "2021-05-01",
                "vote_average": 7.0, "external_ids": {"imdb_id": format!("tt00000{}", id)}
            }))
            .await;
        }

        let outcome = service(&server, 2).popular_movies().await;
        assert!(outcome.error.is_none());
        let ids: Vec<&str> = outcome.items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["10", "20"]);
    }

    #[tokio::test]
    async fn test_popular_stops_at_last_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "total_pages": 1,
                "results": [{"id": 3, "poster_path": "/3.jpg"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        mount_details(&server, "movie", 3, json!({
            "id": 3, "title": "Three", "external_ids": {"imdb_id": "tt0000003"}
        }))
        .await;

        let outcome = service(&server, 5).popular_movies().await;
        assert!(outcome.error.is_none());
        assert_eq!(outcome.items.len(), 1);
    }

    #[tokio::test]
    async fn test_popular_collection_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [{"id": 7, "title": "Seven", "poster_path": "/7.jpg"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_details(&server, "movie", 7, json!({
            "id": 7, "title": "Seven", "external_ids": {"imdb_id": "tt0114369"}
        }))
        .await;

        let search = service(&server, 1);
        let first = search.popular_collection().await.unwrap();
        let second = search.popular_collection().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_popular_failure_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let search = service(&server, 1);
        assert!(search.popular_collection().await.is_err());
        assert!(search.popular_collection().await.is_err());
    }

    #[tokio::test]
    async fn test_genres_tagged_by_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genres": [{"id": 28, "name": "Action"}]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/genre/tv/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"genres": [{"id": 10765, "name": "Sci-Fi & Fantasy"}]})))
            .mount(&server)
            .await;

        let outcome = service(&server, 1).genres().await;
        assert_eq!(outcome.genres.len(), 2);
        assert_eq!(outcome.genres[0].media_type, "movie");
        assert_eq!(outcome.genres[1].media_type, "tv");

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["genres"][1]["type"], "tv");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_genres_failure_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let outcome = service(&server, 1).genres().await;
        assert!(outcome.genres.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("Failed to fetch genres from TMDB."));
    }

    #[test]
    fn test_item_from_details_clamps_rating() {
        let details: TmdbDetails = serde_json::from_value(json!({
            "id": 1, "title": "Odd", "vote_average": 11.5,
            "external_ids": {"imdb_id": "tt1"}
        }))
        .unwrap();
        let item = item_from_details(ContentKind::Movie, &details, "/o.jpg").unwrap();
        assert_eq!(item.rating(), 10.0);
        assert_eq!(item.year(), 0);
        assert_eq!(item.duration_label(), None);
    }
}
