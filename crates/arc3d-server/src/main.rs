//! Arc3D Project Server
//!
//! Stores projects and their version snapshots behind a small REST API and
//! relays save notifications to clients watching the same project.

mod config;
mod rooms;
mod routes;
mod ws;

use arc3d_core::FileStore;
use config::ServerConfig;
use routes::{AppState, router};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arc3d_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store = match &config.data_dir {
        Some(dir) => FileStore::new(dir.clone()),
        None => FileStore::default_location(),
    }
    .map_err(|e| {
        error!("Cannot open project store: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("Storing projects in {}", store.base_path().display());

    let app = router(AppState::new(Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Arc3D server listening on {}", config.addr);
    info!("WebSocket endpoint: ws://{}/ws", config.addr);
    axum::serve(listener, app).await
}
