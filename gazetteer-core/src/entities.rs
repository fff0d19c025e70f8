//! Entity records and natural keys
//!
//! Three reference-data entities live here, each with the composite key
//! that uniquely identifies it within its collection. Code fields (state
//! code, country code) are normalized - trimmed and upper-cased - before
//! they become key components, so "ny" and "NY" can never produce two
//! stored records.

use crate::error::{RefdataError, RefdataResult};
use crate::filter::Filter;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

// ============================================================================
// ENTITY KIND
// ============================================================================

/// The three entity types served by the gazetteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    City,
    State,
    Country,
}

impl EntityKind {
    /// Name of the store collection holding this entity type.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::City => "cities",
            EntityKind::State => "states",
            EntityKind::Country => "countries",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::City => "city",
            EntityKind::State => "state",
            EntityKind::Country => "country",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// CODE NORMALIZATION
// ============================================================================

/// Normalize a state or country code: trim surrounding whitespace and
/// upper-case. Applied on every write and every filter lookup.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ============================================================================
// REF ENTITY TRAIT
// ============================================================================

/// Behavior every cached reference entity provides: where it is stored,
/// how its natural key is composed, and how that key translates into an
/// exact-field store filter.
pub trait RefEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Composite natural key. At most one stored record per key.
    type Key: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Which of the three entity types this is.
    fn kind() -> EntityKind;

    /// Store collection name.
    fn collection() -> &'static str {
        Self::kind().collection()
    }

    /// Extract the natural key from a record. The record is expected to be
    /// normalized first.
    fn natural_key(&self) -> Self::Key;

    /// Exact-field filter addressing the record with this key in the store.
    fn key_filter(key: &Self::Key) -> Filter;

    /// Check required fields. Runs before any store call.
    fn validate(&self) -> RefdataResult<()>;

    /// Normalize code fields in place.
    fn normalize(&mut self);
}

fn require(field: &'static str, value: &str) -> RefdataResult<()> {
    if value.trim().is_empty() {
        return Err(RefdataError::missing_field(field));
    }
    Ok(())
}

// ============================================================================
// CITY
// ============================================================================

fn default_rec_restaurant() -> String {
    "N/A".to_string()
}

/// A city record. Carries the recommended restaurant the upstream data set
/// tracks, plus arbitrary extra fields preserved through the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct City {
    pub name: String,
    pub state_code: String,
    pub country_code: String,
    #[serde(default = "default_rec_restaurant")]
    pub rec_restaurant: String,
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        state_code: impl Into<String>,
        country_code: impl Into<String>,
        rec_restaurant: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state_code: state_code.into(),
            country_code: country_code.into(),
            rec_restaurant: rec_restaurant.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Natural key for a city: (name, state code, country code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityKey {
    pub name: String,
    pub state_code: String,
    pub country_code: String,
}

impl CityKey {
    /// Build a key, normalizing the code components.
    pub fn new(
        name: impl Into<String>,
        state_code: &str,
        country_code: &str,
    ) -> Self {
        Self {
            name: name.into(),
            state_code: normalize_code(state_code),
            country_code: normalize_code(country_code),
        }
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.name, self.state_code, self.country_code)
    }
}

impl RefEntity for City {
    type Key = CityKey;

    fn kind() -> EntityKind {
        EntityKind::City
    }

    fn natural_key(&self) -> CityKey {
        CityKey::new(self.name.clone(), &self.state_code, &self.country_code)
    }

    fn key_filter(key: &CityKey) -> Filter {
        Filter::new()
            .eq("name", key.name.clone())
            .eq("state_code", key.state_code.clone())
            .eq("country_code", key.country_code.clone())
    }

    fn validate(&self) -> RefdataResult<()> {
        require("name", &self.name)?;
        require("state_code", &self.state_code)?;
        require("country_code", &self.country_code)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.state_code = normalize_code(&self.state_code);
        self.country_code = normalize_code(&self.country_code);
    }
}

// ============================================================================
// STATE
// ============================================================================

/// A state record: name plus the two-part code key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct State {
    pub name: String,
    pub code: String,
    pub country_code: String,
}

impl State {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            country_code: country_code.into(),
        }
    }
}

/// Natural key for a state: (state code, country code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub code: String,
    pub country_code: String,
}

impl StateKey {
    /// Build a key, normalizing both code components.
    pub fn new(code: &str, country_code: &str) -> Self {
        Self {
            code: normalize_code(code),
            country_code: normalize_code(country_code),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.code, self.country_code)
    }
}

impl RefEntity for State {
    type Key = StateKey;

    fn kind() -> EntityKind {
        EntityKind::State
    }

    fn natural_key(&self) -> StateKey {
        StateKey::new(&self.code, &self.country_code)
    }

    fn key_filter(key: &StateKey) -> Filter {
        Filter::new()
            .eq("code", key.code.clone())
            .eq("country_code", key.country_code.clone())
    }

    fn validate(&self) -> RefdataResult<()> {
        require("name", &self.name)?;
        require("code", &self.code)?;
        require("country_code", &self.country_code)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.code = normalize_code(&self.code);
        self.country_code = normalize_code(&self.country_code);
    }
}

// ============================================================================
// COUNTRY
// ============================================================================

/// A country record, keyed by its identifier string. The dish fields come
/// from the upstream data set and are optional everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Country {
    pub id: String,
    pub name: String,
    pub capital: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_dish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop_dish_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop_dish_2: Option<String>,
}

impl Country {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        capital: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capital: capital.into(),
            nat_dish: None,
            pop_dish_1: None,
            pop_dish_2: None,
        }
    }
}

/// Natural key for a country: its identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryKey(pub String);

impl CountryKey {
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_string())
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RefEntity for Country {
    type Key = CountryKey;

    fn kind() -> EntityKind {
        EntityKind::Country
    }

    fn natural_key(&self) -> CountryKey {
        CountryKey::new(&self.id)
    }

    fn key_filter(key: &CountryKey) -> Filter {
        Filter::new().eq("id", key.0.clone())
    }

    fn validate(&self) -> RefdataResult<()> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("capital", &self.capital)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_entity_kind_collections() {
        assert_eq!(EntityKind::City.collection(), "cities");
        assert_eq!(EntityKind::State.collection(), "states");
        assert_eq!(EntityKind::Country.collection(), "countries");
    }

    #[test]
    fn test_city_key_normalizes_codes() {
        let a = CityKey::new("New York City", " ny ", "us");
        let b = CityKey::new("New York City", "NY", "US");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "New York City, NY, US");
    }

    #[test]
    fn test_city_key_name_case_preserved() {
        let a = CityKey::new("Albany", "NY", "US");
        let b = CityKey::new("albany", "NY", "US");
        assert_ne!(a, b);
    }

    #[test]
    fn test_state_key_equality_after_normalization() {
        assert_eq!(StateKey::new("ny", "usa"), StateKey::new("NY", "USA"));
    }

    #[test]
    fn test_city_validation() {
        let city = City::new("Albany", "NY", "US", "N/A");
        assert!(city.validate().is_ok());

        let no_name = City::new("", "NY", "US", "N/A");
        assert_eq!(
            no_name.validate(),
            Err(RefdataError::missing_field("name"))
        );

        let blank_code = City::new("Albany", "   ", "US", "N/A");
        assert_eq!(
            blank_code.validate(),
            Err(RefdataError::missing_field("state_code"))
        );
    }

    #[test]
    fn test_state_validation() {
        let state = State::new("New York", "NY", "USA");
        assert!(state.validate().is_ok());
        assert!(State::new("", "NY", "USA").validate().is_err());
        assert!(State::new("New York", "", "USA").validate().is_err());
        assert!(State::new("New York", "NY", "").validate().is_err());
    }

    #[test]
    fn test_country_validation_and_key() {
        let country = Country::new("USA", "United States", "Washington, DC");
        assert!(country.validate().is_ok());
        assert_eq!(country.natural_key(), CountryKey::new(" USA "));
        assert!(Country::new("", "France", "Paris").validate().is_err());
    }

    #[test]
    fn test_city_rec_restaurant_defaults() {
        let city: City = serde_json::from_value(serde_json::json!({
            "name": "Albany",
            "state_code": "NY",
            "country_code": "US"
        }))
        .unwrap();
        assert_eq!(city.rec_restaurant, "N/A");
    }

    #[test]
    fn test_city_extra_fields_round_trip() {
        let value = serde_json::json!({
            "name": "New Orleans",
            "state_code": "LA",
            "country_code": "US",
            "rec_restaurant": "Commander's Palace",
            "population": 364136,
            "nickname": "The Big Easy"
        });
        let city: City = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(city.extra.get("nickname").unwrap(), "The Big Easy");

        let back = serde_json::to_value(&city).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_country_optional_fields_skipped() {
        let country = Country::new("FRA", "France", "Paris");
        let json = serde_json::to_string(&country).unwrap();
        assert!(!json.contains("nat_dish"));

        let mut with_dish = country;
        with_dish.nat_dish = Some("Pot-au-feu".to_string());
        let json = serde_json::to_string(&with_dish).unwrap();
        assert!(json.contains("Pot-au-feu"));
    }

    #[test]
    fn test_normalize_mutates_codes_only() {
        let mut city = City::new("Albany", " ny", "us ", "N/A");
        city.normalize();
        assert_eq!(city.state_code, "NY");
        assert_eq!(city.country_code, "US");
        assert_eq!(city.name, "Albany");
    }

    proptest! {
        #[test]
        fn prop_normalize_code_idempotent(raw in "[ a-zA-Z0-9-]{0,12}") {
            let once = normalize_code(&raw);
            prop_assert_eq!(normalize_code(&once), once.clone());
        }

        #[test]
        fn prop_normalize_code_case_insensitive(raw in "[a-zA-Z]{1,6}") {
            prop_assert_eq!(
                normalize_code(&raw.to_lowercase()),
                normalize_code(&raw.to_uppercase())
            );
        }
    }
}
