//! REST API Routes Module
//!
//! Route handlers organized by entity type, plus health checks, service
//! metadata, and the OpenAPI document. The full router nests the entity
//! routers under /api/v1 and layers CORS and request tracing on top.

pub mod cities;
pub mod countries;
pub mod health;
pub mod meta;
pub mod states;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::openapi::ApiDoc;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use cities::create_router as cities_router;
pub use countries::create_router as countries_router;
pub use health::create_router as health_router;
pub use meta::create_router as meta_router;
pub use states::create_router as states_router;

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Build the CORS layer from configuration. An empty origin list means
/// dev mode: allow everything.
fn build_cors_layer(config: &ApiConfig) -> ApiResult<CorsLayer> {
    if config.cors_origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                ApiError::invalid_input(format!("Invalid CORS origin {}: {}", origin, e))
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Create the complete API router.
pub fn create_api_router(state: Arc<AppState>, config: &ApiConfig) -> ApiResult<Router> {
    let api_routes = Router::new()
        .nest("/cities", cities::create_router(Arc::clone(&state)))
        .nest("/states", states::create_router(Arc::clone(&state)))
        .nest("/countries", countries::create_router(Arc::clone(&state)));

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health::create_router(state))
        .merge(meta::create_router())
        .route("/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config)?);

    Ok(router)
}
