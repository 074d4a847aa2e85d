mod api_doc;
mod codec;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod service;
mod state;
mod store;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::{Config, StoreBackend};
use state::AppState;
use store::{MemoryStore, SharedStore, SpannerStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    tracing::info!("ikutio-kv starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store: SharedStore = match (config.backend, &config.spanner) {
        (StoreBackend::Spanner, Some(spanner)) => Arc::new(SpannerStore::from_config(spanner).await?),
        (StoreBackend::Spanner, None) => anyhow::bail!("Spanner backend selected without Spanner settings"),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app = routes::build_router(
        AppState::new(store),
        routes::cors_layer(config.allowed_origins.clone()),
    );

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("ikutio-kv stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
