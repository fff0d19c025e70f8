//! Country query service
//!
//! Countries are keyed by identifier string and upsert on duplicates, so
//! re-running a data load refreshes records in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use gazetteer_core::{Country, CountryKey, Document, RefdataResult};

use crate::service::{CreateOutcome, DuplicatePolicy, QueryService};
use crate::store::DocumentStore;

pub struct CountryService<S: DocumentStore> {
    inner: QueryService<Country, S>,
}

impl<S: DocumentStore> CountryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inner: QueryService::new(store, DuplicatePolicy::Upsert),
        }
    }

    pub async fn create(&self, country: Country) -> RefdataResult<CreateOutcome> {
        self.inner.create(country).await
    }

    pub async fn get(&self, id: &str) -> RefdataResult<Country> {
        self.inner.get_by_key(&CountryKey::new(id)).await
    }

    pub async fn update(&self, id: &str, patch: Document) -> RefdataResult<u64> {
        self.inner.update(&CountryKey::new(id), patch).await
    }

    pub async fn delete(&self, id: &str) -> RefdataResult<bool> {
        self.inner.delete(&CountryKey::new(id)).await
    }

    pub async fn read_all(&self) -> RefdataResult<BTreeMap<String, Country>> {
        self.inner.read_all().await
    }

    pub async fn count(&self) -> RefdataResult<usize> {
        self.inner.count().await
    }
}
