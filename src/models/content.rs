use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::error::ContentError;

/// Highest score a rating can carry
pub const MAX_RATING: f32 = 10.0;

/// Content type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    #[serde(alias = "tv")]
    Series,
}

impl ContentKind {
    /// Path segment the embed provider expects for this kind
    pub fn embed_segment(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        }
    }

    /// Map a provider media type ("movie", "tv") to a kind
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(ContentKind::Movie),
            "tv" | "series" => Some(ContentKind::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Movie => write!(f, "movie"),
            ContentKind::Series => write!(f, "series"),
        }
    }
}

/// Quality label used by the premium section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityTag {
    #[serde(rename = "4K")]
    Uhd4k,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd,
}

impl QualityTag {
    pub const ALL: [QualityTag; 3] = [QualityTag::Uhd4k, QualityTag::FullHd, QualityTag::Hd];
}

/// Fields that only make sense for one kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KindDetails {
    #[serde(rename_all = "camelCase")]
    Movie {
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Series {
        #[serde(skip_serializing_if = "Option::is_none")]
        season_count: Option<NonZeroU32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        episode_count: Option<NonZeroU32>,
    },
}

impl KindDetails {
    pub fn kind(&self) -> ContentKind {
        match self {
            KindDetails::Movie { .. } => ContentKind::Movie,
            KindDetails::Series { .. } => ContentKind::Series,
        }
    }
}

/// A single catalog entry (movie or series).
///
/// Built once through [`ContentItemBuilder`] and never edited afterwards;
/// catalog views clone or reference items, they never mutate them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    id: String,
    title: String,
    year: u16,
    rating: f32,
    genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tmdb_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality_tag: Option<QualityTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    details: KindDetails,
}

impl ContentItem {
    /// Start building a movie
    pub fn movie(id: impl Into<String>, title: impl Into<String>, year: u16) -> ContentItemBuilder {
        ContentItemBuilder::new(ContentKind::Movie, id.into(), title.into(), year)
    }

    /// Start building a series
    pub fn series(id: impl Into<String>, title: impl Into<String>, year: u16) -> ContentItemBuilder {
        ContentItemBuilder::new(ContentKind::Series, id.into(), title.into(), year)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Release year, 0 when unknown
    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn kind(&self) -> ContentKind {
        self.details.kind()
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url.as_deref()
    }

    /// IMDb id used by the embed and metadata providers
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn quality_tag(&self) -> Option<QualityTag> {
        self.quality_tag
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration_label(&self) -> Option<&str> {
        match &self.details {
            KindDetails::Movie { duration_label } => duration_label.as_deref(),
            KindDetails::Series { .. } => None,
        }
    }

    pub fn season_count(&self) -> Option<u32> {
        match &self.details {
            KindDetails::Series { season_count, .. } => season_count.map(NonZeroU32::get),
            KindDetails::Movie { .. } => None,
        }
    }

    pub fn episode_count(&self) -> Option<u32> {
        match &self.details {
            KindDetails::Series { episode_count, .. } => episode_count.map(NonZeroU32::get),
            KindDetails::Movie { .. } => None,
        }
    }

    /// Short labels under the title: year, then runtime or season/episode counts
    pub fn meta_labels(&self) -> Vec<String> {
        let mut labels = vec![self.year.to_string()];
        if let Some(duration) = self.duration_label() {
            labels.push(duration.to_string());
        }
        if let Some(seasons) = self.season_count() {
            let plural = if seasons == 1 { "" } else { "s" };
            labels.push(format!("{} Season{}", seasons, plural));
        }
        if let Some(episodes) = self.episode_count() {
            labels.push(format!("{} Episodes", episodes));
        }
        labels
    }
}

/// Validating builder for [`ContentItem`]
#[derive(Debug, Clone)]
pub struct ContentItemBuilder {
    kind: ContentKind,
    id: String,
    title: String,
    year: u16,
    rating: f32,
    genres: Vec<String>,
    poster_url: Option<String>,
    external_id: Option<String>,
    tmdb_id: Option<u64>,
    quality_tag: Option<QualityTag>,
    description: Option<String>,
    duration_label: Option<String>,
    season_count: Option<u32>,
    episode_count: Option<u32>,
}

impl ContentItemBuilder {
    fn new(kind: ContentKind, id: String, title: String, year: u16) -> Self {
        Self {
            kind,
            id,
            title,
            year,
            rating: 0.0,
            genres: Vec::new(),
            poster_url: None,
            external_id: None,
            tmdb_id: None,
            quality_tag: None,
            description: None,
            duration_label: None,
            season_count: None,
            episode_count: None,
        }
    }

    pub fn rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn poster_url(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }

    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    pub fn tmdb_id(mut self, id: u64) -> Self {
        self.tmdb_id = Some(id);
        self
    }

    pub fn quality_tag(mut self, tag: QualityTag) -> Self {
        self.quality_tag = Some(tag);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Movie only
    pub fn duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = Some(label.into());
        self
    }

    /// Series only
    pub fn season_count(mut self, seasons: u32) -> Self {
        self.season_count = Some(seasons);
        self
    }

    /// Series only
    pub fn episode_count(mut self, episodes: u32) -> Self {
        self.episode_count = Some(episodes);
        self
    }

    pub fn build(self) -> Result<ContentItem, ContentError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(ContentError::EmptyId);
        }

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ContentError::EmptyTitle(id));
        }

        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(ContentError::RatingOutOfRange {
                id,
                rating: self.rating,
            });
        }

        let details = match self.kind {
            ContentKind::Movie => {
                if self.season_count.is_some() {
                    return Err(ContentError::FieldNotAllowed {
                        field: "seasonCount",
                        kind: ContentKind::Movie,
                    });
                }
                if self.episode_count.is_some() {
                    return Err(ContentError::FieldNotAllowed {
                        field: "episodeCount",
                        kind: ContentKind::Movie,
                    });
                }
                KindDetails::Movie {
                    duration_label: non_blank(self.duration_label),
                }
            }
            ContentKind::Series => {
                if self.duration_label.is_some() {
                    return Err(ContentError::FieldNotAllowed {
                        field: "durationLabel",
                        kind: ContentKind::Series,
                    });
                }
                KindDetails::Series {
                    season_count: positive(self.season_count, "seasonCount")?,
                    episode_count: positive(self.episode_count, "episodeCount")?,
                }
            }
        };

        Ok(ContentItem {
            id,
            title,
            year: self.year,
            rating: self.rating,
            genres: self.genres,
            poster_url: non_blank(self.poster_url),
            external_id: non_blank(self.external_id),
            tmdb_id: self.tmdb_id,
            quality_tag: self.quality_tag,
            description: non_blank(self.description),
            details,
        })
    }
}

/// Squeeze an upstream score into the accepted rating range
pub fn clamp_rating(raw: Option<f32>) -> f32 {
    match raw {
        Some(r) if r.is_finite() => r.clamp(0.0, MAX_RATING),
        _ => 0.0,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive(value: Option<u32>, field: &'static str) -> Result<Option<NonZeroU32>, ContentError> {
    match value {
        None => Ok(None),
        Some(v) => NonZeroU32::new(v)
            .map(Some)
            .ok_or(ContentError::NonPositiveCount { field }),
    }
}
