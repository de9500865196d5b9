//! Catalog provider
//!
//! Read-only queries over an immutable [`CatalogSnapshot`]. Every query is
//! pure: it filters and orders a copy of the snapshot and never touches the
//! items themselves. Sorting uses the standard library's stable sort, so
//! items with equal keys keep their snapshot order on every call.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::error::ContentError;
use crate::models::{ContentItem, ContentKind, QualityTag, Section};

/// Immutable list of catalog items
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    items: Arc<[ContentItem]>,
}

impl CatalogSnapshot {
    /// Build a snapshot, rejecting duplicate ids
    pub fn new(items: Vec<ContentItem>) -> Result<Self, ContentError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(ContentError::DuplicateId(item.id().to_string()));
            }
        }
        Ok(Self {
            items: items.into(),
        })
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Caps and thresholds for section queries
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLimits {
    pub kind_cap: usize,
    pub top_rated_limit: usize,
    pub trending_min_rating: f32,
    pub trending_limit: usize,
    /// Trending only admits posters under this prefix (None: any http(s) URL)
    pub trending_poster_prefix: Option<String>,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            kind_cap: 50,
            top_rated_limit: 100,
            trending_min_rating: 8.0,
            trending_limit: 50,
            trending_poster_prefix: Some("https://image.tmdb.org/t/p/".to_string()),
        }
    }
}

impl CatalogLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            kind_cap: config.kind_section_cap,
            top_rated_limit: config.top_rated_limit,
            trending_min_rating: config.trending_min_rating,
            trending_limit: config.trending_limit,
            trending_poster_prefix: config.trending_poster_prefix.clone(),
        }
    }
}

/// Catalog counts for the landing stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_items: usize,
    pub movie_count: usize,
    pub series_count: usize,
    pub premium_count: usize,
}

/// Answers filter/sort queries against a snapshot
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    snapshot: CatalogSnapshot,
    limits: CatalogLimits,
}

impl CatalogProvider {
    pub fn new(snapshot: CatalogSnapshot, limits: CatalogLimits) -> Self {
        Self { snapshot, limits }
    }

    pub fn find(&self, id: &str) -> Option<&ContentItem> {
        self.snapshot.items().iter().find(|item| item.id() == id)
    }

    /// Items of `kind`, newest year first, capped at `kind_cap`
    pub fn by_kind(&self, kind: ContentKind) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .snapshot
            .items()
            .iter()
            .filter(|item| item.kind() == kind)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.year().cmp(&a.year()));
        items.truncate(self.limits.kind_cap);
        items
    }

    /// Items tagged with `tag`, in snapshot order, uncapped
    pub fn by_quality_tag(&self, tag: QualityTag) -> Vec<ContentItem> {
        self.snapshot
            .items()
            .iter()
            .filter(|item| item.quality_tag() == Some(tag))
            .cloned()
            .collect()
    }

    /// Highest rated first; ties keep snapshot order
    pub fn top_rated(&self, limit: usize) -> Vec<ContentItem> {
        let mut items = self.snapshot.items().to_vec();
        sort_by_rating_desc(&mut items);
        items.truncate(limit);
        items
    }

    /// Movies rated strictly above `min_rating` with a usable poster
    pub fn trending(&self, min_rating: f32, limit: usize) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .snapshot
            .items()
            .iter()
            .filter(|item| item.kind() == ContentKind::Movie && item.rating() > min_rating)
            .filter(|item| {
                item.poster_url()
                    .map(|poster| {
                        is_well_formed_poster(poster, self.limits.trending_poster_prefix.as_deref())
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        sort_by_rating_desc(&mut items);
        items.truncate(limit);
        items
    }

    /// Movies with any poster, best rated first
    pub fn top_with_poster(&self, limit: usize) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .snapshot
            .items()
            .iter()
            .filter(|item| item.kind() == ContentKind::Movie && item.poster_url().is_some())
            .cloned()
            .collect();
        sort_by_rating_desc(&mut items);
        items.truncate(limit);
        items
    }

    /// Content for a navigation section, using the configured limits
    pub fn section(&self, section: Section) -> Vec<ContentItem> {
        match section {
            Section::Trending => {
                self.trending(self.limits.trending_min_rating, self.limits.trending_limit)
            }
            Section::Movies => self.by_kind(ContentKind::Movie),
            Section::Series => self.by_kind(ContentKind::Series),
            Section::Premium => self.by_quality_tag(QualityTag::Uhd4k),
            Section::TopRated => self.top_rated(self.limits.top_rated_limit),
        }
    }

    pub fn stats(&self) -> CatalogStats {
        let items = self.snapshot.items();
        CatalogStats {
            total_items: items.len(),
            movie_count: items.iter().filter(|i| i.kind() == ContentKind::Movie).count(),
            series_count: items.iter().filter(|i| i.kind() == ContentKind::Series).count(),
            premium_count: items
                .iter()
                .filter(|i| i.quality_tag() == Some(QualityTag::Uhd4k))
                .count(),
        }
    }
}

fn sort_by_rating_desc(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
}

/// An absolute http(s) URL with a host, optionally under `prefix`
fn is_well_formed_poster(poster: &str, prefix: Option<&str>) -> bool {
    let parsed = match Url::parse(poster) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return false;
    }
    match prefix {
        Some(prefix) if !prefix.is_empty() => poster.starts_with(prefix),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TMDB_POSTER: &str = "https://image.tmdb.org/t/p/w500/poster.jpg";

    fn movie(id: &str, year: u16, rating: f32) -> ContentItem {
        ContentItem::movie(id, format!("Movie {}", id), year)
            .rating(rating)
            .build()
            .unwrap()
    }

    fn series(id: &str, year: u16, rating: f32) -> ContentItem {
        ContentItem::series(id, format!("Series {}", id), year)
            .rating(rating)
            .build()
            .unwrap()
    }

    fn provider(items: Vec<ContentItem>) -> CatalogProvider {
        CatalogProvider::new(CatalogSnapshot::new(items).unwrap(), CatalogLimits::default())
    }

    fn ids(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_snapshot_rejects_duplicate_ids() {
        let err = CatalogSnapshot::new(vec![movie("1", 2000, 5.0), series("1", 2001, 6.0)])
            .unwrap_err();
        assert_eq!(err, ContentError::DuplicateId("1".to_string()));
    }

    #[test]
    fn test_by_kind_newest_first_and_capped() {
        let mut items: Vec<ContentItem> = (0..60)
            .map(|i| movie(&format!("m{}", i), 1950 + i as u16, 5.0))
            .collect();
        items.push(series("s1", 2030, 9.0));

        let movies = provider(items).by_kind(ContentKind::Movie);
        assert_eq!(movies.len(), 50);
        assert_eq!(movies[0].id(), "m59");
        assert!(movies.iter().all(|i| i.kind() == ContentKind::Movie));
        assert!(movies.windows(2).all(|w| w[0].year() >= w[1].year()));
    }

    #[test]
    fn test_by_kind_cap_is_configurable() {
        let limits = CatalogLimits {
            kind_cap: 2,
            ..CatalogLimits::default()
        };
        let snapshot = CatalogSnapshot::new(vec![
            series("a", 2001, 5.0),
            series("b", 2003, 5.0),
            series("c", 2002, 5.0),
        ])
        .unwrap();

        let result = CatalogProvider::new(snapshot, limits).by_kind(ContentKind::Series);
        assert_eq!(ids(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_by_quality_tag_keeps_snapshot_order() {
        let tagged = |id: &str, tag: QualityTag| {
            ContentItem::movie(id, "T", 2000)
                .quality_tag(tag)
                .build()
                .unwrap()
        };
        let catalog = provider(vec![
            tagged("1", QualityTag::Uhd4k),
            tagged("2", QualityTag::Hd),
            movie("3", 2000, 1.0),
            tagged("4", QualityTag::Uhd4k),
        ]);

        let premium = catalog.by_quality_tag(QualityTag::Uhd4k);
        assert_eq!(ids(&premium), vec!["1", "4"]);
        assert!(premium.iter().all(|i| i.quality_tag() == Some(QualityTag::Uhd4k)));
        assert!(catalog.by_quality_tag(QualityTag::FullHd).is_empty());
    }

    #[test]
    fn test_top_rated_is_stable() {
        let catalog = provider(vec![
            movie("a", 2000, 7.0),
            series("b", 2000, 9.0),
            movie("c", 2000, 7.0),
            movie("d", 2000, 9.0),
            series("e", 2000, 7.0),
        ]);

        let first = catalog.top_rated(10);
        assert_eq!(ids(&first), vec!["b", "d", "a", "c", "e"]);
        assert!(first.windows(2).all(|w| w[0].rating() >= w[1].rating()));

        let second = catalog.top_rated(10);
        assert_eq!(ids(&first), ids(&second));

        assert_eq!(catalog.top_rated(2).len(), 2);
    }

    #[test]
    fn test_trending_filters() {
        let with_poster = |id: &str, rating: f32, poster: &str| {
            ContentItem::movie(id, "T", 2020)
                .rating(rating)
                .poster_url(poster)
                .build()
                .unwrap()
        };
        let tv_with_poster = ContentItem::series("tv", "T", 2020)
            .rating(9.9)
            .poster_url(TMDB_POSTER)
            .build()
            .unwrap();

        let catalog = provider(vec![
            with_poster("low", 8.0, TMDB_POSTER),
            with_poster("good", 8.5, TMDB_POSTER),
            with_poster("best", 9.1, TMDB_POSTER),
            with_poster("other-host", 9.5, "https://images.example.com/p.jpg"),
            with_poster("broken", 9.5, "not a url"),
            movie("no-poster", 2020, 9.9),
            tv_with_poster,
        ]);

        let trending = catalog.trending(8.0, 50);
        assert_eq!(ids(&trending), vec!["best", "good"]);
        assert_eq!(catalog.trending(8.0, 1).len(), 1);
    }

    #[test]
    fn test_trending_without_prefix_accepts_any_http_poster() {
        let limits = CatalogLimits {
            trending_poster_prefix: None,
            ..CatalogLimits::default()
        };
        let snapshot = CatalogSnapshot::new(vec![
            ContentItem::movie("a", "T", 2020)
                .rating(9.0)
                .poster_url("https://images.example.com/p.jpg")
                .build()
                .unwrap(),
            ContentItem::movie("b", "T", 2020)
                .rating(9.0)
                .poster_url("ftp://images.example.com/p.jpg")
                .build()
                .unwrap(),
        ])
        .unwrap();

        let catalog = CatalogProvider::new(snapshot, limits);
        assert_eq!(ids(&catalog.trending(8.0, 10)), vec!["a"]);
    }

    #[test]
    fn test_empty_snapshot_queries() {
        let catalog = CatalogProvider::new(CatalogSnapshot::new(Vec::new()).unwrap(), CatalogLimits::default());
        assert!(catalog.by_kind(ContentKind::Movie).is_empty());
        assert!(catalog.by_quality_tag(QualityTag::Uhd4k).is_empty());
        assert!(catalog.top_rated(100).is_empty());
        assert!(catalog.trending(8.0, 50).is_empty());
        assert_eq!(catalog.stats(), CatalogStats::default());
    }

    #[test]
    fn test_queries_do_not_touch_snapshot() {
        let snapshot = CatalogSnapshot::new(vec![movie("a", 2000, 1.0), movie("b", 2001, 9.0)]).unwrap();
        let catalog = CatalogProvider::new(snapshot.clone(), CatalogLimits::default());
        let _ = catalog.top_rated(10);
        let _ = catalog.by_kind(ContentKind::Movie);
        assert_eq!(ids(snapshot.items()), vec!["a", "b"]);
        assert_eq!(ids(&catalog.top_rated(10)), vec!["b", "a"]);
    }

    #[test]
    fn test_sections_and_stats() {
        let catalog = provider(vec![
            ContentItem::movie("a", "T", 2020)
                .rating(9.0)
                .poster_url(TMDB_POSTER)
                .quality_tag(QualityTag::Uhd4k)
                .build()
                .unwrap(),
            series("b", 2021, 8.0),
        ]);

        assert_eq!(ids(&catalog.section(Section::Trending)), vec!["a"]);
        assert_eq!(ids(&catalog.section(Section::Series)), vec!["b"]);
        assert_eq!(ids(&catalog.section(Section::Premium)), vec!["a"]);
        assert_eq!(ids(&catalog.section(Section::TopRated)), vec!["a", "b"]);
        assert_eq!(ids(&catalog.top_with_poster(10)), vec!["a"]);

        assert_eq!(catalog.find("b").map(|i| i.title()), Some("Series b"));
        assert!(catalog.find("zz").is_none());

        let stats = catalog.stats();
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.movie_count, 1);
        assert_eq!(stats.series_count, 1);
        assert_eq!(stats.premium_count, 1);
    }
}
