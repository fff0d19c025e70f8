//! Request and response types for the REST API
//!
//! Create requests keep every field optional so the handlers can report a
//! precise MissingField error instead of a generic decode failure; the
//! query services re-check the constructed record before any store call.

use std::collections::BTreeMap;

use gazetteer_core::{City, Country, State};
use serde::{Deserialize, Serialize};

// ============================================================================
// CREATE / MUTATION RESPONSES
// ============================================================================

/// Whether a create inserted a fresh record or upserted an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CreateStatus {
    Created,
    Updated,
}

/// Response for create operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateRecordResponse {
    pub status: CreateStatus,
    /// Store-assigned identifier, present when a new record was inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Response for update operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateRecordResponse {
    pub modified: u64,
}

/// Response for count operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CountResponse {
    pub count: usize,
}

// ============================================================================
// CITIES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateCityRequest {
    pub name: Option<String>,
    pub state_code: Option<String>,
    pub country_code: Option<String>,
    pub rec_restaurant: Option<String>,
    /// Arbitrary extra fields, preserved on the stored record.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListCitiesResponse {
    /// Full natural key ("name, state, country") to record.
    pub cities: BTreeMap<String, City>,
}

// ============================================================================
// STATES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateStateRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListStatesResponse {
    /// Full natural key ("code, country") to record.
    pub states: BTreeMap<String, State>,
}

// ============================================================================
// COUNTRIES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateCountryRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub capital: Option<String>,
    pub nat_dish: Option<String>,
    pub pop_dish_1: Option<String>,
    pub pop_dish_2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListCountriesResponse {
    /// Country identifier to record.
    pub countries: BTreeMap<String, Country>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_city_request_accepts_partial_bodies() {
        let req: CreateCityRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.name.is_none());

        let req: CreateCityRequest = serde_json::from_value(json!({
            "name": "Albany",
            "state_code": "NY",
            "country_code": "US",
            "population": 99224
        }))
        .unwrap();
        assert_eq!(req.name.as_deref(), Some("Albany"));
        assert_eq!(req.extra.get("population").unwrap(), 99224);
    }

    #[test]
    fn test_create_response_omits_absent_id() {
        let response = CreateRecordResponse {
            status: CreateStatus::Updated,
            id: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"updated"}"#);
    }

    #[test]
    fn test_create_response_includes_id_when_created() {
        let response = CreateRecordResponse {
            status: CreateStatus::Created,
            id: Some("0190-abc".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("created"));
        assert!(json.contains("0190-abc"));
    }
}
