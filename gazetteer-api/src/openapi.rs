//! OpenAPI Specification for the Gazetteer API
//!
//! Generated with utoipa from the route annotations and schema derives,
//! served at /openapi.json.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{cities, countries, health, meta, states};
use crate::types::{
    CountResponse, CreateCityRequest, CreateCountryRequest, CreateRecordResponse,
    CreateStateRequest, CreateStatus, ListCitiesResponse, ListCountriesResponse,
    ListStatesResponse, UpdateRecordResponse,
};

use gazetteer_core::{City, Country, EntityKind, State};

/// OpenAPI document for the Gazetteer API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gazetteer API",
        version = "0.2.0",
        description = "Reference-data service for cities, states, and countries",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Cities", description = "City reference data"),
        (name = "States", description = "State reference data"),
        (name = "Countries", description = "Country reference data"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Meta", description = "Service metadata"),
    ),
    paths(
        // === City Routes ===
        cities::create_city,
        cities::list_cities,
        cities::count_cities,
        cities::cities_by_state,
        cities::get_city,
        cities::update_city,
        cities::delete_city,
        cities::delete_city_by_name,
        // === State Routes ===
        states::create_state,
        states::list_states,
        states::count_states,
        states::states_by_country,
        states::get_state,
        states::update_state,
        states::delete_state,
        // === Country Routes ===
        countries::create_country,
        countries::list_countries,
        countries::count_countries,
        countries::get_country,
        countries::update_country,
        countries::delete_country,
        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
        // === Meta Routes ===
        meta::hello,
        meta::version,
        meta::endpoints,
    ),
    components(schemas(
        // Domain types
        City,
        State,
        Country,
        EntityKind,
        // Request/response types
        CreateCityRequest,
        CreateStateRequest,
        CreateCountryRequest,
        CreateRecordResponse,
        CreateStatus,
        UpdateRecordResponse,
        CountResponse,
        ListCitiesResponse,
        ListStatesResponse,
        ListCountriesResponse,
        // Health types
        health::HealthResponse,
        health::HealthStatus,
        health::HealthDetails,
        health::ComponentHealth,
        // Meta types
        meta::VersionResponse,
        meta::EndpointsResponse,
        // Errors
        ApiError,
        ErrorCode,
    ))
)]
pub struct ApiDoc;
