use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::{
    CreateSessionResponse, GoToPageRequest, SearchRequest, SelectSectionRequest,
    SessionSearchResponse,
};
use crate::routes::fetched_section;
use crate::AppState;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn session_not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Session not found or expired" })),
    )
}

/// POST /api/sessions - Create a browse session
pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (session_id, expires_at) = state.sessions.create().await;

    tracing::info!(
        "Session created: {} (expires in {}s)",
        session_id,
        state.config.session_ttl_seconds
    );

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            expires_at,
        }),
    )
}

/// GET /api/sessions/:id - Current view
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .with_session(&id, |session| Json(session.view(&id)))
        .await
        .ok_or_else(session_not_found)
}

/// PUT /api/sessions/:id/section - Switch tab (clears any search)
///
/// The section list is loaded before the session is locked, since the
/// Movies tab may need the TMDB popular collection.
pub async fn select_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SelectSectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fetched = fetched_section(&state, body.section).await;

    state
        .sessions
        .with_session(&id, |session| {
            match fetched {
                Some((items, error)) => session.show_section(body.section, items, error),
                None => session.select_section(body.section),
            }
            Json(session.view(&id))
        })
        .await
        .ok_or_else(session_not_found)
}

/// PUT /api/sessions/:id/page - Navigate; out-of-range pages are clamped
pub async fn go_to_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<GoToPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .with_session(&id, |session| {
            session.go_to_page(body.page);
            Json(session.view(&id))
        })
        .await
        .ok_or_else(session_not_found)
}

/// POST /api/sessions/:id/page/next
pub async fn next_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .with_session(&id, |session| {
            session.next_page();
            Json(session.view(&id))
        })
        .await
        .ok_or_else(session_not_found)
}

/// POST /api/sessions/:id/page/prev
pub async fn prev_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .with_session(&id, |session| {
            session.prev_page();
            Json(session.view(&id))
        })
        .await
        .ok_or_else(session_not_found)
}

/// POST /api/sessions/:id/search - Run a search for this session
///
/// The session is only locked to issue the ticket and to apply the result;
/// the upstream call runs unlocked. A result overtaken by a newer search,
/// a clear, or a section switch is discarded and reported as `applied: false`.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state
        .sessions
        .with_session(&id, |session| session.begin_search(&body.query))
        .await
        .ok_or_else(session_not_found)?;

    let response = match ticket {
        // Blank query: results were cleared synchronously
        None => state
            .sessions
            .with_session(&id, |session| SessionSearchResponse {
                applied: true,
                session: session.view(&id),
            })
            .await,
        Some(ticket) => {
            let outcome = state.search.search(ticket.query()).await;
            state
                .sessions
                .with_session(&id, |session| {
                    let applied = session.finish_search(&ticket, outcome);
                    if !applied {
                        tracing::debug!(
                            "Session {}: discarded stale search '{}' (generation {})",
                            id,
                            ticket.query(),
                            ticket.generation()
                        );
                    }
                    SessionSearchResponse {
                        applied,
                        session: session.view(&id),
                    }
                })
                .await
        }
    };

    response.map(Json).ok_or_else(session_not_found)
}

/// DELETE /api/sessions/:id/search - Back to the section list
pub async fn clear_search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .with_session(&id, |session| {
            session.clear_search();
            Json(session.view(&id))
        })
        .await
        .ok_or_else(session_not_found)
}
