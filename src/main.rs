use order_tracker::{
    AnalyticsStore, AppState, Config, router,
    storage::{KvStorage, SeedSource},
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let store = AnalyticsStore::new(
        KvStorage::new(&config.data_dir),
        SeedSource::new(&config.seed_path),
    );
    if let Err(err) = store.seed_if_needed().await {
        warn!("starting without analytics snapshot: {err}");
    }

    let app = router(AppState::new(store, &config.whatsapp_number));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
