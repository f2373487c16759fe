//! GamePilot Recommender — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the mood catalog, shared state, and
//! the Prometheus exporter.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gamepilot_recommender::api::{self, AppState};
use gamepilot_recommender::catalog::{start_hot_reload_thread, MoodCatalog};
use gamepilot_recommender::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gamepilot_recommender=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments. This enables
    // MOODS_CONFIG_PATH / RECOMMENDER_MIN_SCORE from .env.
    let _ = dotenvy::dotenv();

    init_tracing();

    let catalog = MoodCatalog::from_toml()?;
    info!(
        moods = catalog.len(),
        min_score = catalog.min_score,
        "mood catalog loaded"
    );

    let metrics = Metrics::init(catalog.len(), catalog.min_score);

    let state = AppState::new(catalog);

    // If hot reload is enabled, spawn the background watcher.
    start_hot_reload_thread(state.catalog.clone(), MoodCatalog::config_path());

    let router = api::create_router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
