//! In-memory document store
//!
//! Backs tests and dev mode. Keeps per-operation counters so tests can
//! assert how many store calls an operation performed, and a switchable
//! "unavailable" flag to exercise the failure-propagation policy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use gazetteer_core::{new_doc_id, DocId, Document, Filter, RefdataError, RefdataResult};

use super::{with_doc_id, DocumentStore, IdHandling, UpdateOutcome};

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub creates: u64,
    pub reads_all: u64,
    pub reads_one: u64,
    pub updates: u64,
    pub deletes: u64,
}

impl OpCounts {
    /// Total store calls of any kind.
    pub fn total(&self) -> u64 {
        self.creates + self.reads_all + self.reads_one + self.updates + self.deletes
    }
}

/// A `DocumentStore` held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(DocId, Document)>>>,
    counts: RwLock<OpCounts>,
    unavailable: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the call counters.
    pub fn op_counts(&self) -> OpCounts {
        self.counts.read().map(|c| *c).unwrap_or_default()
    }

    /// Number of documents currently stored in a collection.
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .ok()
            .and_then(|c| c.get(collection).map(Vec::len))
            .unwrap_or(0)
    }

    fn check_available(&self) -> RefdataResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RefdataError::unavailable(
                "in-memory store marked unavailable",
            ));
        }
        Ok(())
    }

    fn bump(&self, f: impl FnOnce(&mut OpCounts)) {
        if let Ok(mut counts) = self.counts.write() {
            f(&mut counts);
        }
    }
}

fn poisoned() -> RefdataError {
    RefdataError::storage("store lock poisoned")
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, doc: Document) -> RefdataResult<DocId> {
        self.check_available()?;
        self.bump(|c| c.creates += 1);

        let id = new_doc_id();
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id, doc));
        Ok(id)
    }

    async fn read_all(&self, collection: &str, ids: IdHandling) -> RefdataResult<Vec<Document>> {
        self.check_available()?;
        self.bump(|c| c.reads_all += 1);

        let collections = self.collections.read().map_err(|_| poisoned())?;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| match ids {
                        IdHandling::Strip => doc.clone(),
                        IdHandling::Stringify => with_doc_id(doc.clone(), *id),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn read_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> RefdataResult<Option<Document>> {
        self.check_available()?;
        self.bump(|c| c.reads_one += 1);

        let collections = self.collections.read().map_err(|_| poisoned())?;
        let found = collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(_, doc)| filter.matches(doc))
                .map(|(_, doc)| doc.clone())
        });
        Ok(found)
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Document,
    ) -> RefdataResult<UpdateOutcome> {
        self.check_available()?;
        self.bump(|c| c.updates += 1);

        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        let Some((_, doc)) = docs.iter_mut().find(|(_, doc)| filter.matches(doc)) else {
            return Ok(UpdateOutcome::default());
        };

        let before = doc.clone();
        for (field, value) in patch {
            doc.insert(field.clone(), value.clone());
        }
        let modified = u64::from(*doc != before);
        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> RefdataResult<u64> {
        self.check_available()?;
        self.bump(|c| c.deletes += 1);

        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|(_, doc)| filter.matches(doc)) {
            Some(idx) => {
                docs.remove(idx);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_document;
    use gazetteer_core::State;
    use serde_json::json;

    fn state_doc(name: &str, code: &str) -> Document {
        to_document(&State::new(name, code, "USA")).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_read_all() {
        let store = InMemoryDocumentStore::new();
        store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap();
        store
            .create("states", state_doc("New Jersey", "NJ"))
            .await
            .unwrap();

        let docs = store.read_all("states", IdHandling::Strip).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| !d.contains_key("_id")));

        let with_ids = store
            .read_all("states", IdHandling::Stringify)
            .await
            .unwrap();
        assert!(with_ids.iter().all(|d| d.get("_id").unwrap().is_string()));
    }

    #[tokio::test]
    async fn test_read_one_returns_first_match() {
        let store = InMemoryDocumentStore::new();
        store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap();

        let filter = Filter::new().eq("code", "NY");
        let found = store.read_one("states", &filter).await.unwrap();
        assert_eq!(found.unwrap().get("name").unwrap(), "New York");

        let missing = Filter::new().eq("code", "ZZ");
        assert!(store.read_one("states", &missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap();

        let filter = Filter::new().eq("code", "NY");
        let mut patch = Document::new();
        patch.insert("name".to_string(), json!("State of New York"));

        let outcome = store.update("states", &filter, &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let doc = store.read_one("states", &filter).await.unwrap().unwrap();
        assert_eq!(doc.get("name").unwrap(), "State of New York");
        // Untouched fields survive the merge.
        assert_eq!(doc.get("country_code").unwrap(), "USA");
    }

    #[tokio::test]
    async fn test_update_identical_patch_matches_without_modifying() {
        let store = InMemoryDocumentStore::new();
        store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap();

        let filter = Filter::new().eq("code", "NY");
        let patch = state_doc("New York", "NY");
        let outcome = store.update("states", &filter, &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 0 });
    }

    #[tokio::test]
    async fn test_update_no_match() {
        let store = InMemoryDocumentStore::new();
        let outcome = store
            .update(
                "states",
                &Filter::new().eq("code", "ZZ"),
                &state_doc("Nowhere", "ZZ"),
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_delete_removes_first_match_only() {
        let store = InMemoryDocumentStore::new();
        let albany = || json!({"name": "Albany"}).as_object().cloned().unwrap();
        store.create("cities", albany()).await.unwrap();
        store.create("cities", albany()).await.unwrap();

        let filter = Filter::new().eq("name", "Albany");
        assert_eq!(store.delete("cities", &filter).await.unwrap(), 1);
        assert_eq!(store.collection_len("cities"), 1);
        assert_eq!(store.delete("cities", &filter).await.unwrap(), 1);
        assert_eq!(store.delete("cities", &filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_op_counts_track_calls() {
        let store = InMemoryDocumentStore::new();
        store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap();
        store.read_all("states", IdHandling::Strip).await.unwrap();
        store
            .read_one("states", &Filter::new().eq("code", "NY"))
            .await
            .unwrap();

        let counts = store.op_counts();
        assert_eq!(counts.creates, 1);
        assert_eq!(counts.reads_all, 1);
        assert_eq!(counts.reads_one, 1);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_operation() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);

        let err = store
            .create("states", state_doc("New York", "NY"))
            .await
            .unwrap_err();
        assert!(matches!(err, RefdataError::Unavailable { .. }));

        let err = store
            .read_all("states", IdHandling::Strip)
            .await
            .unwrap_err();
        assert!(matches!(err, RefdataError::Unavailable { .. }));

        store.set_unavailable(false);
        assert!(store.read_all("states", IdHandling::Strip).await.is_ok());
    }
}
