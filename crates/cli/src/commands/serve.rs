use std::sync::Arc;

use anyhow::Result;
use onyx_ext_core::AppConfig;
use onyx_ext_http::{create_router, AppState};
use onyx_ext_storage::PgStorage;

pub(crate) async fn run(config: &AppConfig, host: &str, port: u16) -> Result<()> {
    let storage = PgStorage::new(&config.database).await?;
    let state = Arc::new(AppState::from_config(config, storage)?);
    let router = create_router(state, config.cors_origin.as_deref());

    let addr = format!("{host}:{port}");
    tracing::info!(onyx = %config.onyx_api_url, "Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
