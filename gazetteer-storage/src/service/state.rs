//! State query service
//!
//! States are the strict entity: creating a (code, country) pair that
//! already exists is a DuplicateKey error, never a merge.

use std::collections::BTreeMap;
use std::sync::Arc;

use gazetteer_core::{normalize_code, Document, RefdataError, RefdataResult, State, StateKey};

use crate::service::{CreateOutcome, DuplicatePolicy, QueryService};
use crate::store::DocumentStore;

pub struct StateService<S: DocumentStore> {
    inner: QueryService<State, S>,
}

impl<S: DocumentStore> StateService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            inner: QueryService::new(store, DuplicatePolicy::Reject),
        }
    }

    pub async fn create(&self, state: State) -> RefdataResult<CreateOutcome> {
        self.inner.create(state).await
    }

    pub async fn get(&self, code: &str, country_code: &str) -> RefdataResult<State> {
        let key = StateKey::new(code, country_code);
        self.inner.get_by_key(&key).await
    }

    /// All states of one country, keyed by full natural key.
    pub async fn by_country(&self, country_code: &str) -> RefdataResult<BTreeMap<String, State>> {
        let code = normalize_code(country_code);
        if code.is_empty() {
            return Err(RefdataError::missing_field("country_code"));
        }
        self.inner.find(|key, _| key.country_code == code).await
    }

    pub async fn update(
        &self,
        code: &str,
        country_code: &str,
        patch: Document,
    ) -> RefdataResult<u64> {
        let key = StateKey::new(code, country_code);
        self.inner.update(&key, patch).await
    }

    pub async fn delete(&self, code: &str, country_code: &str) -> RefdataResult<bool> {
        let key = StateKey::new(code, country_code);
        self.inner.delete(&key).await
    }

    pub async fn read_all(&self) -> RefdataResult<BTreeMap<String, State>> {
        self.inner.read_all().await
    }

    pub async fn count(&self) -> RefdataResult<usize> {
        self.inner.count().await
    }
}
