use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::error::TmdbError;
use crate::models::{
    AvailabilityQuery, AvailabilityResponse, ContentKind, Episode, EpisodesQuery,
    EpisodesResponse,
};
use crate::services::tmdb::TmdbEpisode;
use crate::AppState;

lazy_static! {
    static ref IMDB_ID: Regex = Regex::new(r"^tt\d+$").unwrap();
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

/// Season number; missing or blank means season 1
fn parse_season(raw: Option<&str>) -> Option<u32> {
    match raw.map(str::trim) {
        None | Some("") => Some(1),
        Some(value) => value.parse().ok(),
    }
}

fn to_episode(ep: TmdbEpisode) -> Episode {
    let number = ep.episode_number;
    Episode {
        id: ep.id.to_string(),
        number,
        title: ep
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Episode {}", number)),
        description: ep
            .overview
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| format!("Description for Episode {}.", number)),
    }
}

/// GET /api/check-availability?imdbId=<id>&type=<movie|tv>
/// HEADs the embed page; a transport failure answers 500 with `isAvailable: false`.
pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let imdb_id = query
        .imdb_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| bad_request("IMDB ID is required"))?;

    let kind = match query.media_type.as_deref().map(str::trim) {
        None | Some("") => ContentKind::Movie,
        Some(raw) => ContentKind::from_media_type(raw)
            .ok_or_else(|| bad_request("type must be 'movie' or 'tv'"))?,
    };

    match state.embed.check_availability(kind, imdb_id).await {
        Ok(is_available) => Ok((StatusCode::OK, Json(AvailabilityResponse { is_available }))),
        Err(e) => {
            tracing::error!("Error checking availability for {}: {}", imdb_id, e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AvailabilityResponse {
                    is_available: false,
                }),
            ))
        }
    }
}

/// GET /api/episodes?imdbId=<tt...>&season=<n>
/// Episode list for one season of a TV show, resolved through TMDB.
pub async fn episodes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EpisodesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let imdb_id = query
        .imdb_id
        .as_deref()
        .map(str::trim)
        .filter(|id| IMDB_ID.is_match(id));
    let season = parse_season(query.season.as_deref());

    let (imdb_id, season) = match (imdb_id, season) {
        (Some(imdb_id), Some(season)) => (imdb_id, season),
        _ => return Err(bad_request("Invalid request parameters")),
    };

    // 1. Resolve the TMDB show id
    let found = match state.tmdb.find_by_imdb_id(imdb_id).await {
        Ok(found) => found,
        Err(TmdbError::NotFound) | Err(TmdbError::Http(_)) => {
            tracing::warn!("Failed to find TMDB ID for IMDB ID {}", imdb_id);
            return Ok((
                StatusCode::NOT_FOUND,
                Json(EpisodesResponse::failed("Failed to find show on TMDB")),
            ));
        }
        Err(e) => {
            tracing::error!("Error fetching episodes from TMDB: {}", e);
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(EpisodesResponse::failed("An internal error occurred")),
            ));
        }
    };

    let tmdb_id = match found.tv_results.first() {
        Some(show) => {
            tracing::debug!(
                "{} is TMDB show {} ({})",
                imdb_id,
                show.id,
                show.name.as_deref().unwrap_or("untitled")
            );
            show.id
        }
        None => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(EpisodesResponse::failed("TV show not found on TMDB")),
            ));
        }
    };

    // 2. Fetch the season
    match state.tmdb.tv_season(tmdb_id, season).await {
        Ok(data) => {
            let episodes: Vec<Episode> = data.episodes.into_iter().map(to_episode).collect();
            tracing::debug!("{} season {}: {} episodes", imdb_id, season, episodes.len());
            Ok((StatusCode::OK, Json(EpisodesResponse::found(episodes))))
        }
        // Season does not exist
        Err(TmdbError::NotFound) => Ok((StatusCode::OK, Json(EpisodesResponse::found(Vec::new())))),
        Err(TmdbError::Http(status)) => {
            tracing::error!(
                "Failed to fetch season details for TMDB ID {}, Season {}: HTTP {}",
                tmdb_id,
                season,
                status
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(EpisodesResponse::failed("Failed to fetch season details")),
            ))
        }
        Err(e) => {
            tracing::error!("Error fetching episodes from TMDB: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(EpisodesResponse::failed("An internal error occurred")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, test_app, TestUpstreams};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn test_parse_season() {
        assert_eq!(parse_season(None), Some(1));
        assert_eq!(parse_season(Some("")), Some(1));
        assert_eq!(parse_season(Some("3")), Some(3));
        assert_eq!(parse_season(Some("0")), Some(0));
        assert_eq!(parse_season(Some("two")), None);
        assert_eq!(parse_season(Some("-1")), None);
    }

    #[test]
    fn test_episode_defaults() {
        let ep = to_episode(TmdbEpisode {
            id: 62085,
            episode_number: 4,
            name: None,
            overview: Some("  ".to_string()),
        });
        assert_eq!(ep.id, "62085");
        assert_eq!(ep.title, "Episode 4");
        assert_eq!(ep.description, "Description for Episode 4.");
    }

    #[tokio::test]
    async fn test_availability_requires_imdb_id() {
        let upstreams = TestUpstreams::start().await;
        let app = test_app(&upstreams);

        let (status, body) = get_json(app, "/api/check-availability").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "IMDB ID is required");
    }

    #[tokio::test]
    async fn test_availability_defaults_to_movie() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("HEAD"))
            .and(path("/embed/movie/tt0111161"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&upstreams.embed)
            .await;

        let (status, body) =
            get_json(test_app(&upstreams), "/api/check-availability?imdbId=tt0111161").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"isAvailable": true}));
    }

    #[tokio::test]
    async fn test_availability_tv_unavailable() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("HEAD"))
            .and(path("/embed/tv/tt0903747"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstreams.embed)
            .await;

        let (status, body) = get_json(
            test_app(&upstreams),
            "/api/check-availability?imdbId=tt0903747&type=tv",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isAvailable"], false);
    }

    #[tokio::test]
    async fn test_availability_rejects_unknown_type() {
        let upstreams = TestUpstreams::start().await;
        let (status, _) = get_json(
            test_app(&upstreams),
            "/api/check-availability?imdbId=tt1&type=podcast",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_episodes_invalid_params() {
        let upstreams = TestUpstreams::start().await;
        for uri in [
            "/api/episodes",
            "/api/episodes?imdbId=0903747",
            "/api/episodes?imdbId=tt0903747&season=abc",
        ] {
            let (status, body) = get_json(test_app(&upstreams), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "Invalid request parameters");
        }
    }

    #[tokio::test]
    async fn test_episodes_maps_season() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0903747"))
            .and(query_param("external_source", "imdb_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": [], "tv_results": [{"id": 1396}]
            })))
            .mount(&upstreams.tmdb)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "season_number": 2,
                "episodes": [
                    {"id": 62092, "episode_number": 1, "name": "Seven Thirty-Seven", "overview": "Walt and Jesse..."},
                    {"id": 62093, "episode_number": 2, "name": "", "overview": null}
                ]
            })))
            .mount(&upstreams.tmdb)
            .await;

        let (status, body) = get_json(
            test_app(&upstreams),
            "/api/episodes?imdbId=tt0903747&season=2",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["episodes"][0]["title"], "Seven Thirty-Seven");
        assert_eq!(body["episodes"][1]["id"], "62093");
        assert_eq!(body["episodes"][1]["title"], "Episode 2");
        assert_eq!(body["episodes"][1]["description"], "Description for Episode 2.");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_episodes_show_not_found() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0111161"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": [{"id": 278}], "tv_results": []
            })))
            .mount(&upstreams.tmdb)
            .await;

        let (status, body) =
            get_json(test_app(&upstreams), "/api/episodes?imdbId=tt0111161").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"episodes": [], "error": "TV show not found on TMDB"}));
    }

    #[tokio::test]
    async fn test_episodes_find_failure_is_404() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0903747"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&upstreams.tmdb)
            .await;

        let (status, body) =
            get_json(test_app(&upstreams), "/api/episodes?imdbId=tt0903747").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Failed to find show on TMDB");
    }

    #[tokio::test]
    async fn test_episodes_missing_season_is_empty() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0903747"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tv_results": [{"id": 1396}]})))
            .mount(&upstreams.tmdb)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"episodes": []})))
            .mount(&upstreams.tmdb)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstreams.tmdb)
            .await;

        let (status, body) =
            get_json(test_app(&upstreams), "/api/episodes?imdbId=tt0903747&season=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"episodes": []}));

        // Season defaults to 1
        let (status, _) = get_json(test_app(&upstreams), "/api/episodes?imdbId=tt0903747").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_episodes_season_server_error() {
        let upstreams = TestUpstreams::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0903747"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tv_results": [{"id": 1396}]})))
            .mount(&upstreams.tmdb)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396/season/1"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&upstreams.tmdb)
            .await;

        let (status, body) =
            get_json(test_app(&upstreams), "/api/episodes?imdbId=tt0903747").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"episodes": [], "error": "Failed to fetch season details"}));
    }
}
