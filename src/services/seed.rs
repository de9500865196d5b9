//! Startup catalog
//!
//! A short curated list of well-known titles followed by randomly generated
//! filler, so every section has enough items to paginate. Generation is
//! reproducible when a seed is given.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::error::ContentError;
use crate::models::{ContentItem, QualityTag};
use crate::services::catalog::CatalogSnapshot;

/// How much filler to generate
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    pub generated_movies: usize,
    pub generated_series: usize,
    pub rng_seed: Option<u64>,
}

impl SeedConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            generated_movies: config.seed_generated_movies,
            generated_series: config.seed_generated_series,
            rng_seed: config.seed_rng_seed,
        }
    }
}

struct CuratedMovie {
    title: &'static str,
    year: u16,
    imdb_id: &'static str,
    rating: f32,
    genres: &'static [&'static str],
    duration: &'static str,
    poster: Option<&'static str>,
}

struct CuratedSeries {
    title: &'static str,
    year: u16,
    imdb_id: &'static str,
    rating: f32,
    genres: &'static [&'static str],
    seasons: u32,
    episodes: u32,
    poster: Option<&'static str>,
}

const CURATED_MOVIES: &[CuratedMovie] = &[
    CuratedMovie { title: "The Shawshank Redemption", year: 1994, imdb_id: "tt0111161", rating: 9.3, genres: &["Drama"], duration: "2h 22min", poster: Some("https://image.tmdb.org/t/p/w500/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg") },
    CuratedMovie { title: "The Godfather", year: 1972, imdb_id: "tt0068646", rating: 9.2, genres: &["Crime", "Drama"], duration: "2h 55min", poster: Some("https://image.tmdb.org/t/p/w500/3bhkrj58Vtu7enYsRolD1fZdja1.jpg") },
    CuratedMovie { title: "The Dark Knight", year: 2008, imdb_id: "tt0468569", rating: 9.0, genres: &["Action", "Crime", "Drama"], duration: "2h 32min", poster: Some("https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg") },
    CuratedMovie { title: "Pulp Fiction", year: 1994, imdb_id: "tt0110912", rating: 8.9, genres: &["Crime", "Drama"], duration: "2h 34min", poster: Some("https://image.tmdb.org/t/p/w500/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg") },
    CuratedMovie { title: "Forrest Gump", year: 1994, imdb_id: "tt0109830", rating: 8.8, genres: &["Drama", "Romance"], duration: "2h 22min", poster: Some("https://image.tmdb.org/t/p/w500/saHP97rTPS5eLmrLQEcANmKrsFl.jpg") },
    CuratedMovie { title: "Inception", year: 2010, imdb_id: "tt1375666", rating: 8.8, genres: &["Action", "Sci-Fi", "Thriller"], duration: "2h 28min", poster: Some("https://image.tmdb.org/t/p/w500/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg") },
    CuratedMovie { title: "The Matrix", year: 1999, imdb_id: "tt0133093", rating: 8.7, genres: &["Action", "Sci-Fi"], duration: "2h 16min", poster: Some("https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg") },
    CuratedMovie { title: "Se7en", year: 1995, imdb_id: "tt0114369", rating: 8.6, genres: &["Crime", "Drama", "Mystery"], duration: "2h 7min", poster: Some("https://image.tmdb.org/t/p/w500/69Sns8WoET6CfaYlIkHbla4l7nC.jpg") },
    CuratedMovie { title: "Gladiator", year: 2000, imdb_id: "tt0172495", rating: 8.5, genres: &["Action", "Adventure", "Drama"], duration: "2h 35min", poster: Some("https://image.tmdb.org/t/p/w500/ty8TGRuvJLPUmAR1H1nRIsgwvim.jpg") },
    CuratedMovie { title: "Interstellar", year: 2014, imdb_id: "tt0816692", rating: 8.6, genres: &["Adventure", "Drama", "Sci-Fi"], duration: "2h 49min", poster: None },
    CuratedMovie { title: "Parasite", year: 2019, imdb_id: "tt6751668", rating: 8.5, genres: &["Comedy", "Drama", "Thriller"], duration: "2h 12min", poster: None },
    CuratedMovie { title: "Oppenheimer", year: 2023, imdb_id: "tt15398776", rating: 8.4, genres: &["Biography", "Drama", "History"], duration: "3h 0min", poster: None },
    CuratedMovie { title: "Dune", year: 2021, imdb_id: "tt1160419", rating: 8.0, genres: &["Action", "Adventure", "Drama"], duration: "2h 35min", poster: None },
    CuratedMovie { title: "John Wick", year: 2014, imdb_id: "tt2911666", rating: 7.4, genres: &["Action", "Crime", "Thriller"], duration: "1h 41min", poster: None },
];

const CURATED_SERIES: &[CuratedSeries] = &[
    CuratedSeries { title: "Breaking Bad", year: 2008, imdb_id: "tt0903747", rating: 9.5, genres: &["Crime", "Drama", "Thriller"], seasons: 5, episodes: 62, poster: None },
    CuratedSeries { title: "Game of Thrones", year: 2011, imdb_id: "tt0944947", rating: 9.2, genres: &["Action", "Adventure", "Drama"], seasons: 8, episodes: 73, poster: None },
    CuratedSeries { title: "Death Note", year: 2006, imdb_id: "tt0877057", rating: 9.0, genres: &["Animation", "Crime", "Drama"], seasons: 1, episodes: 37, poster: Some("https://image.tmdb.org/t/p/w500/4MoypKQEOHTpoI7hJYJ8pG9uJp6.jpg") },
    CuratedSeries { title: "Attack on Titan", year: 2013, imdb_id: "tt2560140", rating: 9.0, genres: &["Animation", "Action", "Adventure"], seasons: 4, episodes: 87, poster: Some("https://image.tmdb.org/t/p/w500/hTP1DtLGFamjfu8WqjnuQdP1n4i.jpg") },
    CuratedSeries { title: "Stranger Things", year: 2016, imdb_id: "tt4574334", rating: 8.7, genres: &["Drama", "Fantasy", "Horror"], seasons: 4, episodes: 42, poster: None },
    CuratedSeries { title: "The Office", year: 2005, imdb_id: "tt0386676", rating: 9.0, genres: &["Comedy"], seasons: 9, episodes: 201, poster: None },
    CuratedSeries { title: "Better Call Saul", year: 2015, imdb_id: "tt3110726", rating: 8.9, genres: &["Crime", "Drama"], seasons: 6, episodes: 63, poster: None },
    CuratedSeries { title: "The Last of Us", year: 2023, imdb_id: "tt3581920", rating: 8.7, genres: &["Action", "Adventure", "Drama"], seasons: 1, episodes: 9, poster: None },
];

const TITLE_PREFIXES: &[&str] = &[
    "The Last", "Dark", "Silent", "Broken", "Hidden", "Lost", "Final", "Eternal", "Crimson",
    "Midnight", "Golden", "Shadow", "Frozen", "Burning", "Wild",
];

const TITLE_SUFFIXES: &[&str] = &[
    "Kingdom", "Horizon", "Protocol", "Legacy", "Empire", "Frontier", "Echo", "Signal", "Storm",
    "Harbor", "Covenant", "Dominion", "Paradox", "Requiem", "Odyssey",
];

const GENRES: &[&str] = &[
    "Action", "Adventure", "Comedy", "Crime", "Drama", "Fantasy", "Horror", "Mystery", "Romance",
    "Sci-Fi", "Thriller",
];

/// Placeholder poster base for generated items
const PLACEHOLDER_POSTER_BASE: u64 = 1_440_404_653_325;

/// Build the startup snapshot
pub fn generate(config: &SeedConfig) -> Result<CatalogSnapshot, ContentError> {
    let mut rng = match config.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };

    let capacity =
        CURATED_MOVIES.len() + CURATED_SERIES.len() + config.generated_movies + config.generated_series;
    let mut items = Vec::with_capacity(capacity);
    let mut next_id: u64 = 1;

    for curated in CURATED_MOVIES {
        let mut builder = ContentItem::movie(next_id.to_string(), curated.title, curated.year)
            .rating(curated.rating)
            .genres(curated.genres.iter().copied())
            .external_id(curated.imdb_id)
            .duration_label(curated.duration);
        if let Some(poster) = curated.poster {
            builder = builder.poster_url(poster);
        }
        items.push(builder.build()?);
        next_id += 1;
    }

    for curated in CURATED_SERIES {
        let mut builder = ContentItem::series(next_id.to_string(), curated.title, curated.year)
            .rating(curated.rating)
            .genres(curated.genres.iter().copied())
            .external_id(curated.imdb_id)
            .season_count(curated.seasons)
            .episode_count(curated.episodes);
        if let Some(poster) = curated.poster {
            builder = builder.poster_url(poster);
        }
        items.push(builder.build()?);
        next_id += 1;
    }

    for _ in 0..config.generated_movies {
        let title = random_title(&mut rng);
        let genres = random_genres(&mut rng);
        let description = format!(
            "An epic {} film that takes viewers on an unforgettable journey through {}.",
            genres[0].to_lowercase(),
            title.to_lowercase()
        );
        let item = ContentItem::movie(next_id.to_string(), title, rng.random_range(2010..=2023))
            .rating(random_rating(&mut rng))
            .genres(genres)
            .description(description)
            .duration_label(format!(
                "{}h {}min",
                rng.random_range(1..=2),
                rng.random_range(0..60)
            ))
            .external_id(random_imdb_id(&mut rng))
            .poster_url(placeholder_poster(next_id))
            .quality_tag(random_quality(&mut rng))
            .build()?;
        items.push(item);
        next_id += 1;
    }

    for _ in 0..config.generated_series {
        let title = random_title(&mut rng);
        let genres = random_genres(&mut rng);
        let seasons: u32 = rng.random_range(1..=8);
        let episodes = seasons * rng.random_range(8..=23u32);
        let description = format!(
            "A captivating {} series that follows the incredible story of {}.",
            genres[0].to_lowercase(),
            title.to_lowercase()
        );
        let item = ContentItem::series(next_id.to_string(), title, rng.random_range(2010..=2023))
            .rating(random_rating(&mut rng))
            .genres(genres)
            .description(description)
            .season_count(seasons)
            .episode_count(episodes)
            .external_id(random_imdb_id(&mut rng))
            .poster_url(placeholder_poster(next_id))
            .quality_tag(random_quality(&mut rng))
            .build()?;
        items.push(item);
        next_id += 1;
    }

    tracing::debug!("Generated {} catalog items", items.len());
    CatalogSnapshot::new(items)
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.random_range(0..values.len())]
}

fn random_title<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, TITLE_PREFIXES), pick(rng, TITLE_SUFFIXES))
}

/// One or two distinct genres
fn random_genres<R: Rng>(rng: &mut R) -> Vec<String> {
    let first = pick(rng, GENRES);
    let mut genres = vec![first.to_string()];
    if rng.random_bool(0.5) {
        let second = pick(rng, GENRES);
        if second != first {
            genres.push(second.to_string());
        }
    }
    genres
}

/// 6.0..9.5, one decimal
fn random_rating<R: Rng>(rng: &mut R) -> f32 {
    let raw: f32 = rng.random_range(6.0..9.5);
    (raw * 10.0).round() / 10.0
}

fn random_quality<R: Rng>(rng: &mut R) -> QualityTag {
    QualityTag::ALL[rng.random_range(0..QualityTag::ALL.len())]
}

fn random_imdb_id<R: Rng>(rng: &mut R) -> String {
    format!("tt{:07}", rng.random_range(0..10_000_000u32))
}

fn placeholder_poster(id: u64) -> String {
    format!(
        "https://images.unsplash.com/photo-{}?w=300&h=450&fit=crop&auto=format",
        PLACEHOLDER_POSTER_BASE + id
    )
}
