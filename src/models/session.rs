use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::ContentItem;
use crate::services::pagination::PageView;

/// Browsable catalog section (one navigation tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Trending,
    Movies,
    Series,
    #[serde(alias = "4k")]
    Premium,
    TopRated,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Trending,
        Section::Movies,
        Section::Series,
        Section::Premium,
        Section::TopRated,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Trending => "trending",
            Section::Movies => "movies",
            Section::Series => "series",
            Section::Premium => "premium",
            Section::TopRated => "top-rated",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Trending => "Trending Now",
            Section::Movies => "Movies Collection",
            Section::Series => "TV Series",
            Section::Premium => "4K Premium",
            Section::TopRated => "Top Rated",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Section::Trending => "The hottest and most popular content right now",
            Section::Movies => "Discover amazing movies from every genre and era",
            Section::Series => "Binge-watch the best television series and shows",
            Section::Premium => "Ultra high-quality content with exceptional ratings",
            Section::TopRated => {
                "The highest rated movies and series according to critics and audiences"
            }
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(Section::Trending),
            "movies" => Ok(Section::Movies),
            "series" => Ok(Section::Series),
            "premium" | "4k" => Ok(Section::Premium),
            "top-rated" => Ok(Section::TopRated),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Response for session creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub expires_at: i64,
}

/// Request to switch section
#[derive(Debug, Deserialize)]
pub struct SelectSectionRequest {
    pub section: Section,
}

/// Request to navigate pages
#[derive(Debug, Deserialize)]
pub struct GoToPageRequest {
    pub page: i64,
}

/// Request to run a search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// What a client renders for its session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub section: Section,
    pub title: String,
    pub description: String,
    pub showing_search: bool,
    pub is_searching: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_error: Option<String>,
    /// Set when the section's own source failed and a fallback is shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_error: Option<String>,
    pub search_generation: u64,
    pub summary: String,
    pub page: PageView<ContentItem>,
}

/// Response for a session search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSearchResponse {
    /// False when a newer search superseded this one
    pub applied: bool,
    pub session: SessionView,
}
