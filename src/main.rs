use std::sync::Arc;

use moodspot_api::{
    api::{create_router, AppState},
    config::Config,
    db::Cache,
    services::{
        providers::GooglePlacesProvider, Catalog, EngineSettings, RecommendationEngine,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moodspot_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Catalog is loaded once and shared read-only
    let catalog = Arc::new(Catalog::load(config.catalog_path.as_deref())?);
    let engine = RecommendationEngine::new(
        catalog,
        EngineSettings {
            random_sample_size: config.random_sample_size,
        },
    );

    let mut state = AppState::new(engine).with_limits(config.default_limit, config.max_limit);

    let mut cache_writer = None;
    match config.places_api_key.clone() {
        Some(api_key) => {
            let cache = match Cache::connect(&config.redis_url).await {
                Ok((cache, handle)) => {
                    cache_writer = Some(handle);
                    Some(cache)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Redis unavailable, places lookups will not be cached");
                    None
                }
            };
            let provider = GooglePlacesProvider::new(cache, api_key, config.places_api_url.clone());
            state = state.with_places(Arc::new(provider));
            tracing::info!("External places provider enabled");
        }
        None => tracing::info!("PLACES_API_KEY not set, serving catalog venues only"),
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
