//! Gazetteer API Server Entry Point
//!
//! Bootstraps configuration and the document store, then starts the Axum
//! HTTP server. The store connection itself is lazy: the first request
//! that needs it opens it.

use std::sync::Arc;

use gazetteer_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("gazetteer_api=info,gazetteer_storage=info,tower_http=info")
            }),
        )
        .init();

    let config = ApiConfig::from_env();
    let state = Arc::new(AppState::open(
        &config.data_dir,
        config.store_map_size_mb,
    ));

    let app = create_api_router(state, &config)?;

    let addr = config.bind_addr()?;
    tracing::info!(%addr, data_dir = %config.data_dir.display(), "Starting gazetteer API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
