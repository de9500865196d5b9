//! TMDB API Types
//!
//! Subset of the TMDB v3 response shapes this service reads. Every field the
//! API may omit or null out is optional.

use serde::Deserialize;

/// `/find/{external_id}` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FindResponse {
    #[serde(default)]
    pub movie_results: Vec<FindResult>,
    #[serde(default)]
    pub tv_results: Vec<FindResult>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FindResult {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// `/tv/{id}/season/{n}` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TmdbSeason {
    #[serde(default)]
    pub episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TmdbEpisode {
    pub id: u64,
    pub episode_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// `/search/multi` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MultiSearchResponse {
    #[serde(default)]
    pub results: Vec<MultiSearchItem>,
}

/// Search hit; may be a movie, a TV show or a person
#[derive(Debug, Deserialize, Clone)]
pub struct MultiSearchItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// `/movie/popular` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PopularResponse {
    /// 0 when TMDB leaves it out
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<PopularMovie>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PopularMovie {
    pub id: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// `/{movie|tv}/{id}?append_to_response=external_ids` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TmdbDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Minutes (movies)
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    /// Present on movie details only
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
}

impl TmdbDetails {
    /// IMDb id from `external_ids`, falling back to the movie-level field
    pub fn imdb_id(&self) -> Option<&str> {
        self.external_ids
            .as_ref()
            .and_then(|ids| ids.imdb_id.as_deref())
            .or(self.imdb_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Year from release or first-air date, 0 when unknown
    pub fn year(&self) -> u16 {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|date| date.get(..4))
            .and_then(|y| y.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// `/genre/{movie|tv}/list` response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}
