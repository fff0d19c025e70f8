//! State REST API Routes
//!
//! States use the strict-insert policy: POSTing an existing
//! (code, country) pair answers 409 rather than merging.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use gazetteer_core::State as StateRecord;

use crate::{
    error::{ApiError, ApiResult},
    routes::cities::create_response,
    state::AppState,
    types::{CountResponse, CreateRecordResponse, CreateStateRequest, ListStatesResponse, UpdateRecordResponse},
    validation::{require_object, ValidateNonEmpty},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/states - Create a state (strict insert)
#[utoipa::path(
    post,
    path = "/api/v1/states",
    tag = "States",
    request_body = CreateStateRequest,
    responses(
        (status = 201, description = "State created", body = CreateRecordResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "State already exists", body = ApiError),
    ),
)]
pub async fn create_state(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let body = require_object(body)?;
    let req: CreateStateRequest = serde_json::from_value(serde_json::Value::Object(body))?;

    req.name.validate_non_empty("name")?;
    req.code.validate_non_empty("code")?;
    req.country_code.validate_non_empty("country_code")?;

    let record = StateRecord::new(
        req.name.unwrap_or_default(),
        req.code.unwrap_or_default(),
        req.country_code.unwrap_or_default(),
    );

    let outcome = state.states.create(record).await?;
    Ok(create_response(outcome))
}

/// GET /api/v1/states - Full cache contents keyed by natural key
#[utoipa::path(
    get,
    path = "/api/v1/states",
    tag = "States",
    responses(
        (status = 200, description = "All states", body = ListStatesResponse),
    ),
)]
pub async fn list_states(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let states = state.states.read_all().await?;
    Ok(Json(ListStatesResponse { states }))
}

/// GET /api/v1/states/count - Number of cached states
#[utoipa::path(
    get,
    path = "/api/v1/states/count",
    tag = "States",
    responses(
        (status = 200, description = "State count", body = CountResponse),
    ),
)]
pub async fn count_states(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let count = state.states.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/v1/states/by-country/{country_code} - States of one country
#[utoipa::path(
    get,
    path = "/api/v1/states/by-country/{country_code}",
    tag = "States",
    params(
        ("country_code" = String, Path, description = "Country code (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Matching states (may be empty)", body = ListStatesResponse),
        (status = 400, description = "Blank country code", body = ApiError),
    ),
)]
pub async fn states_by_country(
    State(state): State<Arc<AppState>>,
    Path(country_code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let states = state.states.by_country(&country_code).await?;
    Ok(Json(ListStatesResponse { states }))
}

/// GET /api/v1/states/{code}/{country_code} - One state by key
#[utoipa::path(
    get,
    path = "/api/v1/states/{code}/{country_code}",
    tag = "States",
    params(
        ("code" = String, Path, description = "State code"),
        ("country_code" = String, Path, description = "Country code"),
    ),
    responses(
        (status = 200, description = "State details", body = StateRecord),
        (status = 404, description = "State not found", body = ApiError),
    ),
)]
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path((code, country_code)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let record = state.states.get(&code, &country_code).await?;
    Ok(Json(record))
}

/// PATCH /api/v1/states/{code}/{country_code} - Patch a state
#[utoipa::path(
    patch,
    path = "/api/v1/states/{code}/{country_code}",
    tag = "States",
    responses(
        (status = 200, description = "State updated", body = UpdateRecordResponse),
        (status = 400, description = "Empty patch", body = ApiError),
        (status = 404, description = "State not found", body = ApiError),
    ),
)]
pub async fn update_state(
    State(state): State<Arc<AppState>>,
    Path((code, country_code)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let patch = require_object(body)?;
    let modified = state.states.update(&code, &country_code, patch).await?;
    Ok(Json(UpdateRecordResponse { modified }))
}

/// DELETE /api/v1/states/{code}/{country_code} - Delete a state
#[utoipa::path(
    delete,
    path = "/api/v1/states/{code}/{country_code}",
    tag = "States",
    responses(
        (status = 204, description = "State deleted"),
        (status = 404, description = "State not found", body = ApiError),
    ),
)]
pub async fn delete_state(
    State(state): State<Arc<AppState>>,
    Path((code, country_code)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.states.delete(&code, &country_code).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the state routes router.
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_state))
        .route("/", axum::routing::get(list_states))
        .route("/count", axum::routing::get(count_states))
        .route(
            "/by-country/:country_code",
            axum::routing::get(states_by_country),
        )
        .route(
            "/:code/:country_code",
            axum::routing::get(get_state)
                .patch(update_state)
                .delete(delete_state),
        )
        .with_state(state)
}
