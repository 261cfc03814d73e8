use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinematch_api::{
    cache::{create_redis_client, Cache},
    catalog,
    config::Config,
    routes::{create_router, AppState},
    services::{PosterResolver, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let bundle = catalog::load_bundle(
        &config.catalog_path,
        &config.embeddings_path,
        &config.index_path,
    )
    .context("Failed to load catalog artifacts")?;

    let redis_client =
        create_redis_client(&config.redis_url).context("Failed to create Redis client")?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let metadata = TmdbProvider::new(
        cache.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )
    .context("Failed to create TMDB provider")?;
    let posters = PosterResolver::new(cache, config.image_base_url.clone())
        .context("Failed to create poster resolver")?;

    let state = AppState {
        catalog: Arc::new(bundle.catalog),
        index: Arc::new(bundle.index),
        metadata: Arc::new(metadata),
        posters: Arc::new(posters),
        default_k: config.default_recommendation_count,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "cinematch-api listening");

    axum::serve(listener, app).await.context("Server error")?;

    cache_writer.shutdown().await;
    Ok(())
}
