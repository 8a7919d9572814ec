use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use guitar_club_api::app::{router, AppState};
use guitar_club_api::config::AppConfig;
use guitar_club_api::models;
use guitar_club_api::services::{bootstrap, cleanup};
use guitar_club_api::store::{DocumentStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let collections = models::collections();

    let store: Arc<dyn DocumentStore> = match &config.database.url {
        Some(url) => {
            let store = PgStore::connect(url, config.database.max_connections, &collections)
                .await
                .context("failed to connect to postgres")?;
            info!("connected to postgres store");
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, using volatile in-memory store");
            Arc::new(MemoryStore::new(&collections))
        }
    };

    let state = AppState::new(store, config);

    bootstrap::ensure_admin(&state)
        .await
        .context("admin bootstrap failed")?;

    if let Err(e) = cleanup::sweep_orphan_comments(&state).await {
        warn!("orphan comment sweep failed: {}", e);
    }

    let addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("guitar club api listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
