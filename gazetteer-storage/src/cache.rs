//! Per-entity read-through cache
//!
//! Each entity type owns one `EntityCache`: a full snapshot of its
//! collection keyed by natural key. The cache has exactly two states -
//! Unloaded and Loaded - and moves between them in exactly two ways:
//!
//! - lazy load: the first read-requiring operation performs a full store
//!   read and builds the mapping;
//! - reload: after any successful mutation the mapping is rebuilt from a
//!   fresh full read, replacing the previous contents wholesale.
//!
//! The one exception to "never patch in place" is the targeted
//! insert-on-miss inside [`EntityCache::get`], which avoids a full reload
//! for a single cold key.
//!
//! Load and reload serialize under the cache's own write lock, so
//! concurrent first-loads collapse into one and no reader ever observes a
//! half-rebuilt mapping: the replacement map is built fully and swapped in
//! atomically.

use std::collections::HashMap;
use std::sync::Arc;

use gazetteer_core::{RefdataError, RefdataResult, RefEntity};
use tokio::sync::RwLock;

use crate::store::{from_document, DocumentStore, IdHandling};

/// Process-wide cache of one entity collection. `None` = Unloaded.
pub struct EntityCache<E: RefEntity, S: DocumentStore> {
    store: Arc<S>,
    entries: RwLock<Option<HashMap<E::Key, E>>>,
}

impl<E: RefEntity, S: DocumentStore> EntityCache<E, S> {
    /// Create an unloaded cache over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            entries: RwLock::new(None),
        }
    }

    /// Read the full collection and build the key->record mapping.
    async fn build(&self) -> RefdataResult<HashMap<E::Key, E>> {
        let docs = self
            .store
            .read_all(E::collection(), IdHandling::Strip)
            .await?;

        let mut map = HashMap::with_capacity(docs.len());
        for doc in docs {
            let entity: E = from_document(doc)?;
            map.insert(entity.natural_key(), entity);
        }
        tracing::debug!(
            entity = %E::kind(),
            records = map.len(),
            "loaded cache snapshot"
        );
        Ok(map)
    }

    /// Load the cache if it is unloaded. Idempotent; concurrent callers
    /// serialize on the write lock and the losers find the map present.
    pub async fn ensure_loaded(&self) -> RefdataResult<()> {
        if self.entries.read().await.is_some() {
            return Ok(());
        }

        let mut guard = self.entries.write().await;
        if guard.is_none() {
            *guard = Some(self.build().await?);
        }
        Ok(())
    }

    /// Discard current contents and rebuild from the store. Called after
    /// every successful mutation. The previous snapshot stays visible to
    /// readers until the replacement is complete.
    pub async fn reload(&self) -> RefdataResult<()> {
        let mut guard = self.entries.write().await;
        *guard = Some(self.build().await?);
        Ok(())
    }

    /// Get one record by key. On a cache miss, performs a single targeted
    /// store lookup and inserts the result; fails with NotFound when the
    /// key is absent from both cache and store.
    pub async fn get(&self, key: &E::Key) -> RefdataResult<E> {
        self.ensure_loaded().await?;

        {
            let guard = self.entries.read().await;
            if let Some(map) = guard.as_ref() {
                if let Some(found) = map.get(key) {
                    return Ok(found.clone());
                }
            }
        }

        match self
            .store
            .read_one(E::collection(), &E::key_filter(key))
            .await?
        {
            Some(doc) => {
                let entity: E = from_document(doc)?;
                let mut guard = self.entries.write().await;
                if let Some(map) = guard.as_mut() {
                    map.insert(key.clone(), entity.clone());
                }
                Ok(entity)
            }
            None => Err(RefdataError::not_found(E::kind(), key)),
        }
    }

    /// Clone the full snapshot (forces a load if unloaded).
    pub async fn snapshot(&self) -> RefdataResult<HashMap<E::Key, E>> {
        self.ensure_loaded().await?;
        let guard = self.entries.read().await;
        Ok(guard.as_ref().cloned().unwrap_or_default())
    }

    /// Number of cached records (forces a load if unloaded).
    pub async fn count(&self) -> RefdataResult<usize> {
        self.ensure_loaded().await?;
        let guard = self.entries.read().await;
        Ok(guard.as_ref().map(HashMap::len).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryDocumentStore;
    use crate::store::to_document;
    use gazetteer_core::{State, StateKey};

    async fn seed_state(store: &InMemoryDocumentStore, name: &str, code: &str) {
        store
            .create("states", to_document(&State::new(name, code, "USA")).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_lazy_load_on_first_access() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed_state(&store, "New York", "NY").await;

        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));
        assert_eq!(store.op_counts().reads_all, 0);

        assert_eq!(cache.count().await.unwrap(), 1);
        assert_eq!(store.op_counts().reads_all, 1);

        // Second access hits the snapshot, not the store.
        assert_eq!(cache.count().await.unwrap(), 1);
        assert_eq!(store.op_counts().reads_all, 1);
    }

    #[tokio::test]
    async fn test_get_hits_cache_without_store_call() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed_state(&store, "New York", "NY").await;

        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));
        let key = StateKey::new("NY", "USA");

        let first = cache.get(&key).await.unwrap();
        assert_eq!(first.name, "New York");
        let counts = store.op_counts();

        let second = cache.get(&key).await.unwrap();
        assert_eq!(first, second);
        // No additional store traffic for the warm read.
        assert_eq!(store.op_counts(), counts);
    }

    #[tokio::test]
    async fn test_get_miss_performs_targeted_lookup() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));

        // Load the (empty) snapshot first, then write behind the cache's back.
        cache.ensure_loaded().await.unwrap();
        seed_state(&store, "New York", "NY").await;

        let key = StateKey::new("NY", "USA");
        let found = cache.get(&key).await.unwrap();
        assert_eq!(found.name, "New York");
        assert_eq!(store.op_counts().reads_one, 1);

        // The miss result was inserted; the next read is warm.
        cache.get(&key).await.unwrap();
        assert_eq!(store.op_counts().reads_one, 1);
    }

    #[tokio::test]
    async fn test_get_absent_everywhere_is_not_found() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));

        let key = StateKey::new("ZZ", "USA");
        let err = cache.get(&key).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ZZ, USA"));
    }

    #[tokio::test]
    async fn test_reload_replaces_contents() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed_state(&store, "New York", "NY").await;

        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));
        assert_eq!(cache.count().await.unwrap(), 1);

        seed_state(&store, "New Jersey", "NJ").await;
        store
            .delete("states", &gazetteer_core::Filter::new().eq("code", "NY"))
            .await
            .unwrap();

        cache.reload().await.unwrap();
        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key(&StateKey::new("NJ", "USA")));
        assert!(!snapshot.contains_key(&StateKey::new("NY", "USA")));
    }

    #[tokio::test]
    async fn test_keys_normalized_on_load() {
        let store = Arc::new(InMemoryDocumentStore::new());
        // A record seeded with lower-case codes still lands under the
        // normalized key.
        store
            .create(
                "states",
                to_document(&State::new("New York", "ny", "usa")).unwrap(),
            )
            .await
            .unwrap();

        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));
        let found = cache.get(&StateKey::new("NY", "USA")).await.unwrap();
        assert_eq!(found.name, "New York");
    }

    #[tokio::test]
    async fn test_store_failure_propagates_unchanged() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.set_unavailable(true);

        let cache: EntityCache<State, _> = EntityCache::new(Arc::clone(&store));
        let err = cache.count().await.unwrap_err();
        assert!(matches!(err, RefdataError::Unavailable { .. }));

        // Recovery: next access loads normally.
        store.set_unavailable(false);
        assert_eq!(cache.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_collapse() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed_state(&store, "New York", "NY").await;

        let cache: Arc<EntityCache<State, _>> =
            Arc::new(EntityCache::new(Arc::clone(&store)));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move { cache.count().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 1);
        }

        // All eight tasks raced, but only one full read happened.
        assert_eq!(store.op_counts().reads_all, 1);
    }
}
