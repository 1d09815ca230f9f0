mod cache;
mod config;
mod errors;
mod models;
mod pipeline;
mod routes;
mod screening;
mod state;
mod talent_client;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{CacheBackend, FileBackend, LocalCache, MemoryBackend, RedisBackend};
use crate::config::Config;
use crate::routes::build_router;
use crate::screening::scoring::HeuristicScoreEstimator;
use crate::state::AppState;
use crate::talent_client::WebhookCandidateSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize candidate cache
    let backend = build_cache_backend(&config)?;
    let cache = Arc::new(LocalCache::new(
        backend,
        chrono::Duration::seconds(config.cache_ttl_secs),
    ));
    info!("Candidate cache TTL: {}s", config.cache_ttl_secs);

    // Initialize talent source client
    let source = Arc::new(WebhookCandidateSource::new(config.talent_source_url.clone())?);
    info!("Talent source: {}", config.talent_source_url);

    // Initialize score estimator
    let scorer = Arc::new(HeuristicScoreEstimator::new(config.scoring.clone()));
    info!("Scoring weights: {:?}", config.scoring);

    // Build app state
    let state = AppState {
        scorer,
        cache,
        source,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when `REDIS_URL` is set, else a file cache under `CACHE_DIR`,
/// else an in-process map.
fn build_cache_backend(config: &Config) -> Result<Arc<dyn CacheBackend>> {
    if let Some(url) = &config.redis_url {
        let client = redis::Client::open(url.as_str())?;
        info!("Cache backend: redis");
        return Ok(Arc::new(RedisBackend::new(client, "recruit:")));
    }
    if let Some(dir) = &config.cache_dir {
        info!("Cache backend: files in {dir}");
        return Ok(Arc::new(FileBackend::new(dir)?));
    }
    info!("Cache backend: memory");
    let max_age = std::time::Duration::from_secs(config.cache_ttl_secs.unsigned_abs());
    Ok(Arc::new(MemoryBackend::with_max_age(max_age)))
}
