//! # forum-server
//!
//! Assembles configuration, logging, the SQLite store, the services and
//! the axum router, then serves until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{AppConfig, LogFormat, LoggingConfig};
use secrecy::ExposeSecret;
use services::AggregateService;
use storage_adapters::{SqliteStore, StoreSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.logging);

    let settings = StoreSettings {
        max_connections: config.database.max_connections,
        busy_timeout: config.database.busy_timeout(),
    };
    let store = SqliteStore::connect(config.database.url.expose_secret(), &settings)
        .await
        .context("opening the database")?;

    let service = AggregateService::new(Arc::new(store));
    let app = router(AppState::new(service));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("forum server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("forum server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("forum_server={0},services={0},storage_adapters={0},api_adapters={0},tower_http=debug", logging.level))
    });
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}
