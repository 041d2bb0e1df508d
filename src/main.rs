use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedreader::config::Config;
use feedreader::fetcher::HttpFeedSource;
use feedreader::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feedreader=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("FEEDREADER_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load(&config_path)?;
    let registry = config.seed_registry()?;
    info!("Loaded {} seed feeds from {}", registry.count(), config_path);

    let source = Arc::new(HttpFeedSource::new(config.request_timeout())?);
    let state = Arc::new(AppState::new(registry, source));

    // Show the first feed as soon as it arrives
    state.loader.spawn_load(0, |outcome| match outcome.view.error {
        Some(e) => error!("Initial load of '{}' failed: {}", outcome.view.name, e),
        None => info!("Initial feed '{}' loaded", outcome.view.name),
    })?;

    let app = routes::router(state);

    // Start server
    let bind = std::env::var("FEEDREADER_BIND").unwrap_or(config.bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server starting on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
