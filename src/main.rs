mod config;
mod error;
mod models;
mod routes;
mod services;

use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::TmdbError;
use crate::services::{
    seed::{self, SeedConfig},
    CatalogLimits, CatalogProvider, CatalogSnapshot, EmbedClient, SearchService, SectionLists,
    SessionStore, TmdbClient,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogProvider,
    pub sections: Arc<SectionLists>,
    pub tmdb: TmdbClient,
    pub embed: EmbedClient,
    pub search: SearchService,
    pub sessions: SessionStore,
    pub start_time: Instant,
}

impl AppState {
    /// Wire every service around a catalog snapshot
    pub fn new(config: Config, snapshot: CatalogSnapshot) -> Result<Self, TmdbError> {
        // Redirects are followed (reqwest default: up to 10)
        let http = Client::builder()
            .timeout(Duration::from_millis(config.upstream_timeout_ms))
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .build()
            .map_err(|e| TmdbError::Client(e.to_string()))?;

        let catalog = CatalogProvider::new(snapshot, CatalogLimits::from_config(&config));
        let sections = Arc::new(SectionLists::from_provider(&catalog));
        let tmdb = TmdbClient::new(http.clone(), &config.tmdb_api_url, &config.tmdb_api_key);
        let embed = EmbedClient::new(http, &config.embed_base_url);
        let search = SearchService::from_config(tmdb.clone(), &config);
        let sessions = SessionStore::from_config(Arc::clone(&sections), &config);

        Ok(Self {
            config,
            catalog,
            sections,
            tmdb,
            embed,
            search,
            sessions,
            start_time: Instant::now(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidstream_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting VidStream Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app_env);

    if config.tmdb_api_key.is_empty() {
        tracing::warn!("TMDB_API_KEY is not set; search and episode lookups will fail, movies come from the seed catalog");
    }

    // Seed catalog
    let snapshot = seed::generate(&SeedConfig::from_config(&config))?;
    tracing::info!("Catalog seeded with {} items", snapshot.len());

    // Build application state
    let state = Arc::new(AppState::new(config, snapshot)?);
    let stats = state.catalog.stats();
    tracing::info!(
        "Catalog ready: {} movies, {} series, {} premium",
        stats.movie_count,
        stats.series_count,
        stats.premium_count
    );
    tracing::info!("TMDB API: {}", state.tmdb.base_url());

    // Build router
    let app = routes::router(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
