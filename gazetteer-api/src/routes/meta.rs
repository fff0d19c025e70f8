//! Service metadata endpoints
//!
//! Small fetchable documentation of the running service: a hello probe,
//! version information, and the list of available endpoints.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Every route the service exposes, kept sorted. The list is maintained by
/// hand next to the routers; `test_endpoint_list_is_sorted` keeps it honest.
pub const ENDPOINTS: &[&str] = &[
    "/api/v1/cities",
    "/api/v1/cities/by-name/{name}",
    "/api/v1/cities/by-state/{state_code}",
    "/api/v1/cities/count",
    "/api/v1/cities/{name}/{state_code}/{country_code}",
    "/api/v1/countries",
    "/api/v1/countries/count",
    "/api/v1/countries/{id}",
    "/api/v1/states",
    "/api/v1/states/by-country/{country_code}",
    "/api/v1/states/count",
    "/api/v1/states/{code}/{country_code}",
    "/endpoints",
    "/health/live",
    "/health/ping",
    "/health/ready",
    "/hello",
    "/openapi.json",
    "/version",
];

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EndpointsResponse {
    pub endpoints: Vec<String>,
}

/// GET /hello - A trivial endpoint to see if the server is running.
#[utoipa::path(
    get,
    path = "/hello",
    tag = "Meta",
    responses(
        (status = 200, description = "Greeting"),
    ),
)]
pub async fn hello() -> impl IntoResponse {
    Json(serde_json::json!({ "hello": "world" }))
}

/// GET /version - Version information
#[utoipa::path(
    get,
    path = "/version",
    tag = "Meta",
    responses(
        (status = 200, description = "Version information", body = VersionResponse),
    ),
)]
pub async fn version() -> impl IntoResponse {
    let response = VersionResponse {
        name: std::env::var("APP_NAME")
            .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string()),
        version: std::env::var("APP_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
        env: std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string()),
    };
    (StatusCode::OK, Json(response))
}

/// GET /endpoints - Sorted list of available endpoints.
#[utoipa::path(
    get,
    path = "/endpoints",
    tag = "Meta",
    responses(
        (status = 200, description = "Available endpoints", body = EndpointsResponse),
    ),
)]
pub async fn endpoints() -> impl IntoResponse {
    Json(EndpointsResponse {
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// Create the metadata router (mounted at the root, not under /api/v1).
pub fn create_router() -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/version", get(version))
        .route("/endpoints", get(endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_list_is_sorted() {
        let mut sorted = ENDPOINTS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ENDPOINTS);
    }

    #[test]
    fn test_endpoint_list_covers_entities() {
        for prefix in ["/api/v1/cities", "/api/v1/states", "/api/v1/countries"] {
            assert!(ENDPOINTS.iter().any(|e| e.starts_with(prefix)));
        }
    }
}
