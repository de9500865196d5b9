use serde::{Deserialize, Serialize};

/// Single episode returned by the episodes proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub number: u32,
    pub title: String,
    pub description: String,
}

/// GET /api/episodes response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodesResponse {
    pub episodes: Vec<Episode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EpisodesResponse {
    pub fn found(episodes: Vec<Episode>) -> Self {
        Self {
            episodes,
            error: None,
        }
    }

    /// Empty list carrying an error message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            episodes: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Query parameters for the episodes proxy
#[derive(Debug, Deserialize)]
pub struct EpisodesQuery {
    #[serde(rename = "imdbId", default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

/// Query parameters for the availability proxy
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(rename = "imdbId", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}

/// GET /api/check-availability response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub is_available: bool,
}
