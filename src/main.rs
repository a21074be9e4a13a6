use std::sync::Arc;
use std::time::Duration;

use reel_finder::{
    api::{create_router, AppState},
    config::Config,
    controller::{ControllerSettings, ViewController},
    db::{create_redis_client, RedisTrendStore, TrendStore},
    services::{CatalogClient, TmdbCatalog, TrendRecorder},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_finder=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbCatalog::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let redis_client = create_redis_client(&config.redis_url)?;
    let trend_store: Arc<dyn TrendStore> = Arc::new(RedisTrendStore::new(
        redis_client,
        config.tmdb_image_url.clone(),
    ));
    let (recorder, recorder_handle) = TrendRecorder::new(trend_store.clone());

    let controller = Arc::new(ViewController::new(
        catalog,
        trend_store,
        recorder,
        ControllerSettings {
            debounce: Duration::from_millis(config.debounce_ms),
            refresh: Duration::from_millis(config.refresh_ms),
            trending_limit: config.trending_limit,
            image_base_url: config.tmdb_image_url.clone(),
        },
    )?);
    let watcher = controller.start();

    let app = create_router(AppState::new(controller));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    watcher.abort();
    recorder_handle.shutdown().await;

    Ok(())
}
