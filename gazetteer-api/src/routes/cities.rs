//! City REST API Routes
//!
//! Axum route handlers for city operations, layered on `CityService`.
//! Creates upsert on duplicate natural keys; the by-name delete treats
//! zero deletions as NotFound.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use gazetteer_core::City;
use gazetteer_storage::CreateOutcome;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    types::{CreateCityRequest, CreateRecordResponse, CreateStatus, CountResponse, ListCitiesResponse, UpdateRecordResponse},
    validation::{require_object, ValidateNonEmpty},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/cities - Create (or upsert) a city
#[utoipa::path(
    post,
    path = "/api/v1/cities",
    tag = "Cities",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City created", body = CreateRecordResponse),
        (status = 200, description = "Existing city updated", body = CreateRecordResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
)]
pub async fn create_city(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let body = require_object(body)?;
    let req: CreateCityRequest = serde_json::from_value(serde_json::Value::Object(body))?;

    req.name.validate_non_empty("name")?;
    req.state_code.validate_non_empty("state_code")?;
    req.country_code.validate_non_empty("country_code")?;

    let mut city = City::new(
        req.name.unwrap_or_default(),
        req.state_code.unwrap_or_default(),
        req.country_code.unwrap_or_default(),
        req.rec_restaurant.unwrap_or_else(|| "N/A".to_string()),
    );
    city.extra = req.extra;

    let outcome = state.cities.create(city).await?;
    Ok(create_response(outcome))
}

/// GET /api/v1/cities - Full cache contents keyed by natural key
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "Cities",
    responses(
        (status = 200, description = "All cities", body = ListCitiesResponse),
        (status = 503, description = "Store unavailable", body = ApiError),
    ),
)]
pub async fn list_cities(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let cities = state.cities.read_all().await?;
    Ok(Json(ListCitiesResponse { cities }))
}

/// GET /api/v1/cities/count - Number of cached cities
#[utoipa::path(
    get,
    path = "/api/v1/cities/count",
    tag = "Cities",
    responses(
        (status = 200, description = "City count", body = CountResponse),
    ),
)]
pub async fn count_cities(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let count = state.cities.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/v1/cities/by-state/{state_code} - Cities in one state
#[utoipa::path(
    get,
    path = "/api/v1/cities/by-state/{state_code}",
    tag = "Cities",
    params(
        ("state_code" = String, Path, description = "State code (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Matching cities (may be empty)", body = ListCitiesResponse),
        (status = 400, description = "Blank state code", body = ApiError),
    ),
)]
pub async fn cities_by_state(
    State(state): State<Arc<AppState>>,
    Path(state_code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let cities = state.cities.by_state(&state_code).await?;
    Ok(Json(ListCitiesResponse { cities }))
}

/// GET /api/v1/cities/{name}/{state_code}/{country_code} - One city by key
#[utoipa::path(
    get,
    path = "/api/v1/cities/{name}/{state_code}/{country_code}",
    tag = "Cities",
    params(
        ("name" = String, Path, description = "City name"),
        ("state_code" = String, Path, description = "State code"),
        ("country_code" = String, Path, description = "Country code"),
    ),
    responses(
        (status = 200, description = "City details", body = City),
        (status = 404, description = "City not found", body = ApiError),
    ),
)]
pub async fn get_city(
    State(state): State<Arc<AppState>>,
    Path((name, state_code, country_code)): Path<(String, String, String)>,
) -> ApiResult<impl IntoResponse> {
    let city = state.cities.get(&name, &state_code, &country_code).await?;
    Ok(Json(city))
}

/// PATCH /api/v1/cities/{name}/{state_code}/{country_code} - Patch a city
#[utoipa::path(
    patch,
    path = "/api/v1/cities/{name}/{state_code}/{country_code}",
    tag = "Cities",
    responses(
        (status = 200, description = "City updated", body = UpdateRecordResponse),
        (status = 400, description = "Empty patch", body = ApiError),
        (status = 404, description = "City not found", body = ApiError),
    ),
)]
pub async fn update_city(
    State(state): State<Arc<AppState>>,
    Path((name, state_code, country_code)): Path<(String, String, String)>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let patch = require_object(body)?;
    let modified = state
        .cities
        .update(&name, &state_code, &country_code, patch)
        .await?;
    Ok(Json(UpdateRecordResponse { modified }))
}

/// DELETE /api/v1/cities/{name}/{state_code}/{country_code} - Delete a city
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{name}/{state_code}/{country_code}",
    tag = "Cities",
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found", body = ApiError),
    ),
)]
pub async fn delete_city(
    State(state): State<Arc<AppState>>,
    Path((name, state_code, country_code)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    state.cities.delete(&name, &state_code, &country_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cities/by-name/{name} - Delete the first city with a name
#[utoipa::path(
    delete,
    path = "/api/v1/cities/by-name/{name}",
    tag = "Cities",
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found", body = ApiError),
    ),
)]
pub async fn delete_city_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.cities.delete_by_name(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn create_response(outcome: CreateOutcome) -> impl IntoResponse {
    match outcome {
        CreateOutcome::Created(id) => (
            StatusCode::CREATED,
            Json(CreateRecordResponse {
                status: CreateStatus::Created,
                id: Some(id),
            }),
        ),
        CreateOutcome::Updated => (
            StatusCode::OK,
            Json(CreateRecordResponse {
                status: CreateStatus::Updated,
                id: None,
            }),
        ),
    }
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the city routes router.
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_city))
        .route("/", axum::routing::get(list_cities))
        .route("/count", axum::routing::get(count_cities))
        .route("/by-state/:state_code", axum::routing::get(cities_by_state))
        .route(
            "/by-name/:name",
            axum::routing::delete(delete_city_by_name),
        )
        .route(
            "/:name/:state_code/:country_code",
            axum::routing::get(get_city)
                .patch(update_city)
                .delete(delete_city),
        )
        .with_state(state)
}
