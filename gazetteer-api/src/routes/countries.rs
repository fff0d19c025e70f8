//! Country REST API Routes
//!
//! Countries are keyed by identifier and upsert on duplicates, so data
//! reloads refresh records in place.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use gazetteer_core::Country;

use crate::{
    error::{ApiError, ApiResult},
    routes::cities::create_response,
    state::AppState,
    types::{CountResponse, CreateCountryRequest, CreateRecordResponse, ListCountriesResponse, UpdateRecordResponse},
    validation::{require_object, ValidateNonEmpty},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/countries - Create (or upsert) a country
#[utoipa::path(
    post,
    path = "/api/v1/countries",
    tag = "Countries",
    request_body = CreateCountryRequest,
    responses(
        (status = 201, description = "Country created", body = CreateRecordResponse),
        (status = 200, description = "Existing country updated", body = CreateRecordResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
)]
pub async fn create_country(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let body = require_object(body)?;
    let req: CreateCountryRequest = serde_json::from_value(serde_json::Value::Object(body))?;

    req.id.validate_non_empty("id")?;
    req.name.validate_non_empty("name")?;
    req.capital.validate_non_empty("capital")?;

    let mut country = Country::new(
        req.id.unwrap_or_default(),
        req.name.unwrap_or_default(),
        req.capital.unwrap_or_default(),
    );
    country.nat_dish = req.nat_dish;
    country.pop_dish_1 = req.pop_dish_1;
    country.pop_dish_2 = req.pop_dish_2;

    let outcome = state.countries.create(country).await?;
    Ok(create_response(outcome))
}

/// GET /api/v1/countries - Full cache contents keyed by identifier
#[utoipa::path(
    get,
    path = "/api/v1/countries",
    tag = "Countries",
    responses(
        (status = 200, description = "All countries", body = ListCountriesResponse),
    ),
)]
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let countries = state.countries.read_all().await?;
    Ok(Json(ListCountriesResponse { countries }))
}

/// GET /api/v1/countries/count - Number of cached countries
#[utoipa::path(
    get,
    path = "/api/v1/countries/count",
    tag = "Countries",
    responses(
        (status = 200, description = "Country count", body = CountResponse),
    ),
)]
pub async fn count_countries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let count = state.countries.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/v1/countries/{id} - One country by identifier
#[utoipa::path(
    get,
    path = "/api/v1/countries/{id}",
    tag = "Countries",
    params(
        ("id" = String, Path, description = "Country identifier")
    ),
    responses(
        (status = 200, description = "Country details", body = Country),
        (status = 404, description = "Country not found", body = ApiError),
    ),
)]
pub async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let country = state.countries.get(&id).await?;
    Ok(Json(country))
}

/// PATCH /api/v1/countries/{id} - Patch a country
#[utoipa::path(
    patch,
    path = "/api/v1/countries/{id}",
    tag = "Countries",
    responses(
        (status = 200, description = "Country updated", body = UpdateRecordResponse),
        (status = 400, description = "Empty patch", body = ApiError),
        (status = 404, description = "Country not found", body = ApiError),
    ),
)]
pub async fn update_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<impl IntoResponse> {
    let patch = require_object(body)?;
    let modified = state.countries.update(&id, patch).await?;
    Ok(Json(UpdateRecordResponse { modified }))
}

/// DELETE /api/v1/countries/{id} - Delete a country
#[utoipa::path(
    delete,
    path = "/api/v1/countries/{id}",
    tag = "Countries",
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found", body = ApiError),
    ),
)]
pub async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.countries.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the country routes router.
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_country))
        .route("/", axum::routing::get(list_countries))
        .route("/count", axum::routing::get(count_countries))
        .route(
            "/:id",
            axum::routing::get(get_country)
                .patch(update_country)
                .delete(delete_country),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_requires_capital() {
        let req: CreateCountryRequest = serde_json::from_value(json!({
            "id": "USA",
            "name": "United States"
        }))
        .unwrap();
        assert!(req.capital.validate_non_empty("capital").is_err());
    }

    #[test]
    fn test_dish_fields_optional() {
        let req: CreateCountryRequest = serde_json::from_value(json!({
            "id": "FRA",
            "name": "France",
            "capital": "Paris",
            "nat_dish": "Pot-au-feu"
        }))
        .unwrap();
        assert_eq!(req.nat_dish.as_deref(), Some("Pot-au-feu"));
        assert!(req.pop_dish_1.is_none());
    }
}
