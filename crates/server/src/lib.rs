//! REST surface for the dexter catalog
//!
//! Serves filtered catalog pages, batch triggers, loading status and
//! single-entity detail records over HTTP, backed by one shared
//! [`CatalogSession`](dexter_catalog::CatalogSession).

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod models;
mod rest_server;

pub use models::{BatchResponse, CatalogQuery, CatalogResponse, EntityCard};
pub use rest_server::{build_router, ApiError, AppState};

// Re-export error types from core
pub use dexter_core::error::{Error, Result};

use dexter_catalog::CatalogSession;
use dexter_core::config::Config;
use std::sync::Arc;
use tracing::{error, info};

/// Run the REST server with the given configuration.
///
/// 1. Validates the configuration and creates the catalog session
/// 2. Starts loading the catalog in the background
/// 3. Serves the router on `server.host:server.port`
/// 4. Shuts down on Ctrl+C
pub async fn run_server(config: Config) -> Result<()> {
    let session = Arc::new(CatalogSession::from_config(&config)?);
    let loader = session.spawn_background_load();

    let app = build_router(AppState::new(Arc::clone(&session)), &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    info!("REST server listening on http://{addr}");

    let server_task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| Error::config(format!("Server error: {e}")))
    });

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        Err(e) => {
            error!("Error setting up signal handler: {e}");
        }
    }

    server_task.abort();
    let _ = server_task.await;
    loader.abort();
    let _ = loader.await;

    info!(
        "Dexter server shut down with {} entities loaded",
        session.status().loaded
    );

    Ok(())
}
