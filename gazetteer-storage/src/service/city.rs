//! City query service
//!
//! Cities upsert on duplicate natural keys: re-adding a known
//! (name, state, country) triple merges the new fields into the stored
//! record. Partial-key lookups exist by state code and by bare name; the
//! bare-name lookup treats more than one match as a caller error since the
//! name alone no longer identifies a record.

use std::collections::BTreeMap;
use std::sync::Arc;

use gazetteer_core::{
    normalize_code, City, CityKey, Document, EntityKind, Filter, RefdataError, RefdataResult,
};

use crate::service::{CreateOutcome, DuplicatePolicy, QueryService};
use crate::store::DocumentStore;

pub struct CityService<S: DocumentStore> {
    inner: QueryService<City, S>,
}

impl<S: DocumentStore> CityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inner: QueryService::new(store, DuplicatePolicy::Upsert),
        }
    }

    pub async fn create(&self, city: City) -> RefdataResult<CreateOutcome> {
        self.inner.create(city).await
    }

    pub async fn get(
        &self,
        name: &str,
        state_code: &str,
        country_code: &str,
    ) -> RefdataResult<City> {
        let key = CityKey::new(name, state_code, country_code);
        self.inner.get_by_key(&key).await
    }

    /// All cities in a state, keyed by full natural key.
    pub async fn by_state(&self, state_code: &str) -> RefdataResult<BTreeMap<String, City>> {
        let code = normalize_code(state_code);
        if code.is_empty() {
            return Err(RefdataError::missing_field("state_code"));
        }
        self.inner.find(|key, _| key.state_code == code).await
    }

    /// Look a city up by name alone. Fails with NotFound when no city has
    /// the name, and with a validation error when several do.
    pub async fn by_name(&self, name: &str) -> RefdataResult<City> {
        if name.trim().is_empty() {
            return Err(RefdataError::missing_field("name"));
        }

        let matches = self.inner.find(|key, _| key.name == name).await?;
        let mut cities = matches.into_values();
        match (cities.next(), cities.next()) {
            (None, _) => Err(RefdataError::not_found(EntityKind::City, name)),
            (Some(city), None) => Ok(city),
            (Some(_), Some(_)) => Err(RefdataError::validation(
                "name",
                format!("ambiguous city name: {}", name),
            )),
        }
    }

    pub async fn update(
        &self,
        name: &str,
        state_code: &str,
        country_code: &str,
        patch: Document,
    ) -> RefdataResult<u64> {
        let key = CityKey::new(name, state_code, country_code);
        self.inner.update(&key, patch).await
    }

    pub async fn delete(
        &self,
        name: &str,
        state_code: &str,
        country_code: &str,
    ) -> RefdataResult<bool> {
        let key = CityKey::new(name, state_code, country_code);
        self.inner.delete(&key).await
    }

    /// Delete the first city with this name regardless of state and
    /// country. Zero deletions is an error, not a no-op.
    pub async fn delete_by_name(&self, name: &str) -> RefdataResult<bool> {
        if name.trim().is_empty() {
            return Err(RefdataError::missing_field("name"));
        }
        let filter = Filter::new().eq("name", name);
        self.inner.delete_where(&filter, name).await
    }

    pub async fn read_all(&self) -> RefdataResult<BTreeMap<String, City>> {
        self.inner.read_all().await
    }

    pub async fn count(&self) -> RefdataResult<usize> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryDocumentStore;
    use serde_json::json;

    fn sample_city() -> City {
        City::new("New York City", "NY", "US", "Katz's Delicatessen")
    }

    fn service() -> (CityService<InMemoryDocumentStore>, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (CityService::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_create_twice_upserts() {
        let (svc, store) = service();

        svc.create(sample_city()).await.unwrap();
        let mut updated = sample_city();
        updated.rec_restaurant = "Joe's Pizza".to_string();
        let outcome = svc.create(updated).await.unwrap();
        assert_eq!(outcome, CreateOutcome::Updated);

        assert_eq!(store.collection_len("cities"), 1);
        let city = svc.get("New York City", "NY", "US").await.unwrap();
        assert_eq!(city.rec_restaurant, "Joe's Pizza");
    }

    #[tokio::test]
    async fn test_count_after_create_and_delete() {
        let (svc, _store) = service();

        svc.create(City::new("NYC", "NY", "US", "N/A")).await.unwrap();
        svc.create(City::new("New Orleans", "LA", "US", "N/A"))
            .await
            .unwrap();
        assert_eq!(svc.count().await.unwrap(), 2);

        svc.delete("NYC", "NY", "US").await.unwrap();
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_by_state_normalizes_filter() {
        let (svc, _store) = service();
        svc.create(sample_city()).await.unwrap();
        svc.create(City::new("Buffalo", "NY", "US", "N/A"))
            .await
            .unwrap();
        svc.create(City::new("New Orleans", "LA", "US", "N/A"))
            .await
            .unwrap();

        let upper = svc.by_state("NY").await.unwrap();
        let lower = svc.by_state("ny").await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);

        let none = svc.by_state("WY").await.unwrap();
        assert!(none.is_empty());

        let err = svc.by_state("   ").await.unwrap_err();
        assert!(matches!(err, RefdataError::MissingField { .. }));
    }

    #[tokio::test]
    async fn test_by_name_unique_ambiguous_absent() {
        let (svc, _store) = service();
        svc.create(City::new("Springfield", "IL", "US", "N/A"))
            .await
            .unwrap();
        svc.create(City::new("Portland", "OR", "US", "N/A"))
            .await
            .unwrap();

        let city = svc.by_name("Portland").await.unwrap();
        assert_eq!(city.state_code, "OR");

        svc.create(City::new("Springfield", "MA", "US", "N/A"))
            .await
            .unwrap();
        let err = svc.by_name("Springfield").await.unwrap_err();
        assert!(matches!(err, RefdataError::Validation { .. }));

        let err = svc.by_name("Gotham").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_preserves_extra_fields() {
        let (svc, _store) = service();
        let mut city = sample_city();
        city.extra
            .insert("nickname".to_string(), json!("The Big Apple"));
        svc.create(city).await.unwrap();

        let patch = json!({"rec_restaurant": "Joe's Pizza"})
            .as_object()
            .cloned()
            .unwrap();
        svc.update("New York City", "NY", "US", patch).await.unwrap();

        let stored = svc.get("New York City", "NY", "US").await.unwrap();
        assert_eq!(stored.rec_restaurant, "Joe's Pizza");
        assert_eq!(stored.extra.get("nickname").unwrap(), "The Big Apple");
    }

    #[tokio::test]
    async fn test_delete_by_name_absent_is_error() {
        let (svc, _store) = service();
        svc.create(sample_city()).await.unwrap();

        assert!(svc.delete_by_name("New York City").await.unwrap());
        assert_eq!(svc.count().await.unwrap(), 0);

        let err = svc.delete_by_name("New York City").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_with_unnormalized_codes() {
        let (svc, _store) = service();
        svc.create(sample_city()).await.unwrap();

        let city = svc.get("New York City", " ny ", "us").await.unwrap();
        assert_eq!(city.name, "New York City");
    }
}
