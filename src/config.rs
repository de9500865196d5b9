use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub app_env: String,

    // Metadata provider (TMDB)
    pub tmdb_api_url: String,
    pub tmdb_api_key: String,

    // Video-embed provider
    pub embed_base_url: String,

    // Outbound HTTP
    pub upstream_timeout_ms: u64,
    pub user_agent: String,

    // Catalog sections
    pub page_size: usize,
    pub kind_section_cap: usize,
    pub top_rated_limit: usize,
    pub trending_min_rating: f32,
    pub trending_limit: usize,
    pub trending_poster_prefix: Option<String>,

    // Search
    pub search_result_limit: usize,
    pub popular_pages: u32,

    // Seed catalog
    pub seed_generated_movies: usize,
    pub seed_generated_series: usize,
    pub seed_rng_seed: Option<u64>,

    // Browse sessions
    pub session_capacity: usize,
    pub session_ttl_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    /// Missing or unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            // Server
            port: parse_or(&lookup, "PORT", 3001),
            app_env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),

            // Metadata provider
            tmdb_api_url: lookup("TMDB_API_URL")
                .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string()),
            tmdb_api_key: lookup("TMDB_API_KEY").unwrap_or_default(),

            // Video-embed provider
            embed_base_url: lookup("EMBED_BASE_URL")
                .unwrap_or_else(|| "https://vidsrc.xyz/embed".to_string()),

            // Outbound HTTP
            upstream_timeout_ms: parse_or(&lookup, "UPSTREAM_TIMEOUT_MS", 15_000), // 15 seconds
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| "VidStream/1.0".to_string()),

            // Catalog sections
            page_size: parse_or(&lookup, "PAGE_SIZE", 20),
            kind_section_cap: parse_or(&lookup, "KIND_SECTION_CAP", 50),
            top_rated_limit: parse_or(&lookup, "TOP_RATED_LIMIT", 100),
            trending_min_rating: parse_or(&lookup, "TRENDING_MIN_RATING", 8.0),
            trending_limit: parse_or(&lookup, "TRENDING_LIMIT", 50),
            // Empty value disables the prefix requirement
            trending_poster_prefix: match lookup("TRENDING_POSTER_PREFIX") {
                Some(prefix) if prefix.trim().is_empty() => None,
                Some(prefix) => Some(prefix),
                None => Some("https://image.tmdb.org/t/p/".to_string()),
            },

            // Search
            search_result_limit: parse_or(&lookup, "SEARCH_RESULT_LIMIT", 20),
            popular_pages: parse_or(&lookup, "POPULAR_PAGES", 5),

            // Seed catalog
            seed_generated_movies: parse_or(&lookup, "SEED_GENERATED_MOVIES", 500),
            seed_generated_series: parse_or(&lookup, "SEED_GENERATED_SERIES", 500),
            seed_rng_seed: lookup("SEED_RNG_SEED").and_then(|v| v.trim().parse().ok()),

            // Browse sessions
            session_capacity: parse_or(&lookup, "SESSION_CAPACITY", 10_000),
            session_ttl_seconds: parse_or(&lookup, "SESSION_TTL_SECONDS", 3600), // 1 hour
        }
    }
}

impl Default for Config {
    /// Built-in defaults, ignoring the environment
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
