use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::ContentItem;
use crate::routes::PageQuery;
use crate::services::{PageView, Paginator};
use crate::AppState;

/// Query parameters for stateless search
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub page: Option<String>,
}

/// Paginated result list with an optional upstream error
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(flatten)]
    page: PageView<ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn paginate(items: Arc<[ContentItem]>, page_size: usize, page: i64) -> PageView<ContentItem> {
    let mut paginator = Paginator::new(items, page_size);
    paginator.go_to_page(page);
    paginator.view()
}

/// GET /api/search?query=<text>&page=<n>
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let page = PageQuery { page: query.page }.page();
    let outcome = state.search.search(&query.query).await;

    Json(ResultsPage {
        query: Some(query.query.trim().to_string()),
        page: paginate(Arc::from(outcome.items), state.config.page_size, page),
        error: outcome.error,
    })
}

/// GET /api/movies/popular?page=<n>
pub async fn popular_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let (items, error) = match state.search.popular_collection().await {
        Ok(items) => (items, None),
        Err(error) => (Arc::from(Vec::new()), Some(error)),
    };

    Json(ResultsPage {
        query: None,
        page: paginate(items, state.config.page_size, query.page()),
        error,
    })
}

/// GET /api/genres
pub async fn genres(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.search.genres().await)
}
