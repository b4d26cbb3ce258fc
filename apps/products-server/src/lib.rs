#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Reference service for `pagekit`: a product catalogue over SQLite served at
//! `GET /products/all` with DataTables-style paging parameters.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod logging;
pub mod query;
pub mod shutdown;

pub use api::{AppState, router};
pub use config::AppConfig;

/// Connect, optionally seed, and serve until `cancel` fires.
///
/// # Errors
/// Database setup failures, an unusable bind address or a server I/O error.
pub async fn serve(config: AppConfig, cancel: CancellationToken) -> Result<()> {
    let conn = db::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    if config.database.seed {
        db::prepare(&conn).await.context("failed to prepare the database")?;
    }

    let state = AppState::new(conn, config.pagination, cancel.clone());
    let app = router(state, Duration::from_secs(config.server.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "Products Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Products Server stopped");
    Ok(())
}
