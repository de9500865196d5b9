use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{ContentItem, ContentKind, Section};
use crate::routes::{fetched_section, PageQuery};
use crate::services::{PageView, Paginator};
use crate::AppState;

/// One page of a catalog section
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionPageResponse {
    section: Section,
    title: &'static str,
    description: &'static str,
    summary: String,
    #[serde(flatten)]
    page: PageView<ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Everything the player needs for one catalog title
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerView {
    item: ContentItem,
    meta: Vec<String>,
    /// Movie page, or season 1 episode 1 for series; absent without an IMDb id
    #[serde(skip_serializing_if = "Option::is_none")]
    embed_url: Option<String>,
    /// Season picker entries; empty for movies
    seasons: Vec<u32>,
}

/// Query parameters for embed URL lookup
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedQuery {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
}

/// GET /api/catalog/:section?page=<n>
pub async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let section: Section = section.parse().map_err(|e: String| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": e })),
        )
    })?;

    let (items, error) = fetched_section(&state, section)
        .await
        .unwrap_or_else(|| (state.sections.get(section), None));
    let mut paginator = Paginator::new(items, state.config.page_size);
    paginator.go_to_page(query.page());

    Ok(Json(SectionPageResponse {
        section,
        title: section.title(),
        description: section.description(),
        summary: format!("{} results", paginator.range_label()),
        page: paginator.view(),
        error,
    }))
}

/// GET /api/items/:id - Player view for a catalog item
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let item = state.catalog.find(&id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Item {} not found", id) })),
        )
    })?;

    let (embed_url, seasons) = match item.kind() {
        ContentKind::Movie => (
            item.external_id()
                .map(|external_id| state.embed.embed_url(ContentKind::Movie, external_id)),
            Vec::new(),
        ),
        ContentKind::Series => (
            item.external_id()
                .map(|external_id| state.embed.episode_url(external_id, 1, 1)),
            (1..=item.season_count().unwrap_or(1)).collect(),
        ),
    };

    Ok(Json(PlayerView {
        item: item.clone(),
        meta: item.meta_labels(),
        embed_url,
        seasons,
    }))
}

/// GET /api/embed?externalId=<tt...>&kind=<movie|tv>&season=<n>&episode=<n>
/// Player URL for a title, or for one episode when season and episode are given.
pub async fn get_embed_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmbedQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let bad_request = |message: &str| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
    };

    let external_id = query
        .external_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| bad_request("externalId is required"))?;

    let kind = match query.kind.as_deref() {
        None => ContentKind::Movie,
        Some(raw) => ContentKind::from_media_type(raw)
            .ok_or_else(|| bad_request("kind must be 'movie' or 'tv'"))?,
    };

    let url = match (kind, query.season, query.episode) {
        (ContentKind::Series, Some(season), Some(episode)) => {
            state.embed.episode_url(external_id, season, episode)
        }
        _ => state.embed.embed_url(kind, external_id),
    };

    Ok(Json(serde_json::json!({ "url": url })))
}
