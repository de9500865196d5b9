//! HTTP routes
//!
//! Health and metrics, the catalog/search API, the provider proxies, and
//! browse sessions.

pub mod catalog;
pub mod health;
pub mod proxy;
pub mod search;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{ContentItem, Section};
use crate::AppState;

/// `?page=` on paginated endpoints; anything unparseable means page 1
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// List for a section that is fetched upstream rather than read from the
/// catalog, plus an error when that fetch failed. `None` means the section
/// is served straight from the catalog.
///
/// Movies come from the TMDB popular collection when an API key is set.
/// A failed or empty fetch falls back to the catalog's movies.
pub async fn fetched_section(
    state: &AppState,
    section: Section,
) -> Option<(Arc<[ContentItem]>, Option<String>)> {
    if section != Section::Movies || state.config.tmdb_api_key.is_empty() {
        return None;
    }

    let fetched = match state.search.popular_collection().await {
        Ok(popular) if !popular.is_empty() => (popular, None),
        Ok(_) => (state.sections.get(section), None),
        Err(error) => {
            tracing::warn!("Movies section falling back to catalog: {}", error);
            (state.sections.get(section), Some(error))
        }
    };
    Some(fetched)
}

/// Build the application router (middleware is layered by the caller)
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/live", get(health::live))
        // Provider proxies
        .route("/api/check-availability", get(proxy::check_availability))
        .route("/api/episodes", get(proxy::episodes))
        // Catalog
        .route("/api/catalog/:section", get(catalog::get_section))
        .route("/api/items/:id", get(catalog::get_item))
        .route("/api/embed", get(catalog::get_embed_url))
        // Search (stateless)
        .route("/api/search", get(search::search))
        .route("/api/movies/popular", get(search::popular_movies))
        .route("/api/genres", get(search::genres))
        // Browse sessions
        .route("/api/sessions", post(session::create_session))
        .route("/api/sessions/:id", get(session::get_session))
        .route("/api/sessions/:id/section", put(session::select_section))
        .route("/api/sessions/:id/page", put(session::go_to_page))
        .route("/api/sessions/:id/page/next", post(session::next_page))
        .route("/api/sessions/:id/page/prev", post(session::prev_page))
        .route(
            "/api/sessions/:id/search",
            post(session::search).delete(session::clear_search),
        )
        .with_state(state)
}
