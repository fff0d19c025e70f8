//! Entity query services
//!
//! One service instance per entity type, all sharing the same shape:
//! validate inputs, compose natural keys, and present create/read/update/
//! delete on top of the cache and the store adapter. Every mutation that
//! succeeds triggers a full cache reload, so subsequent reads reflect
//! store state exactly.
//!
//! The duplicate-key policy is explicit configuration, not an accident of
//! near-duplicate code paths: `Reject` fails a create whose natural key
//! already exists, `Upsert` merges into the existing record.

pub mod city;
pub mod country;
pub mod state;

use std::collections::BTreeMap;
use std::sync::Arc;

use gazetteer_core::{Document, Filter, RefdataError, RefdataResult, RefEntity};

use crate::cache::EntityCache;
use crate::store::{to_document, DocumentStore};

/// What `create` does when the natural key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with DuplicateKey.
    Reject,
    /// Merge the new fields into the existing record.
    Upsert,
}

/// Result of a create: either a fresh record (with its store-assigned
/// identifier, stringified) or an upsert that landed on an existing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(String),
    Updated,
}

impl CreateOutcome {
    /// The new record's identifier, when one was assigned.
    pub fn id(&self) -> Option<&str> {
        match self {
            CreateOutcome::Created(id) => Some(id),
            CreateOutcome::Updated => None,
        }
    }
}

/// Generic query service over one entity type.
pub struct QueryService<E: RefEntity, S: DocumentStore> {
    store: Arc<S>,
    cache: EntityCache<E, S>,
    policy: DuplicatePolicy,
}

impl<E: RefEntity, S: DocumentStore> QueryService<E, S> {
    pub fn new(store: Arc<S>, policy: DuplicatePolicy) -> Self {
        let cache = EntityCache::new(Arc::clone(&store));
        Self {
            store,
            cache,
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Create a record. Validation happens before any store call; on
    /// success the cache is reloaded and the outcome reports whether a new
    /// record was inserted or an existing one updated.
    pub async fn create(&self, mut entity: E) -> RefdataResult<CreateOutcome> {
        entity.normalize();
        entity.validate()?;

        let key = entity.natural_key();
        let filter = E::key_filter(&key);
        let doc = to_document(&entity)?;

        let outcome = match self.policy {
            DuplicatePolicy::Reject => {
                if self
                    .store
                    .read_one(E::collection(), &filter)
                    .await?
                    .is_some()
                {
                    return Err(RefdataError::duplicate_key(E::kind(), &key));
                }
                let id = self.store.create(E::collection(), doc).await?;
                CreateOutcome::Created(id.to_string())
            }
            DuplicatePolicy::Upsert => {
                let update = self.store.update(E::collection(), &filter, &doc).await?;
                if update.matched == 0 {
                    let id = self.store.create(E::collection(), doc).await?;
                    CreateOutcome::Created(id.to_string())
                } else {
                    CreateOutcome::Updated
                }
            }
        };

        self.cache.reload().await?;
        Ok(outcome)
    }

    /// Get one record by exact natural key (read-through on miss).
    pub async fn get_by_key(&self, key: &E::Key) -> RefdataResult<E> {
        self.cache.get(key).await
    }

    /// Full cache contents as a mapping from displayed key to record.
    pub async fn read_all(&self) -> RefdataResult<BTreeMap<String, E>> {
        let snapshot = self.cache.snapshot().await?;
        Ok(snapshot
            .into_iter()
            .map(|(key, entity)| (key.to_string(), entity))
            .collect())
    }

    /// All cached records matching a key predicate, keyed by displayed
    /// key. Zero matches is an empty result, not an error.
    pub async fn find(
        &self,
        pred: impl Fn(&E::Key, &E) -> bool,
    ) -> RefdataResult<BTreeMap<String, E>> {
        let snapshot = self.cache.snapshot().await?;
        Ok(snapshot
            .into_iter()
            .filter(|(key, entity)| pred(key, entity))
            .map(|(key, entity)| (key.to_string(), entity))
            .collect())
    }

    /// Apply a field-level patch to the record with this key. Fails on an
    /// empty patch before any store call, and with NotFound when the store
    /// reports zero modified records.
    pub async fn update(&self, key: &E::Key, patch: Document) -> RefdataResult<u64> {
        if patch.is_empty() {
            return Err(RefdataError::validation(
                "patch",
                "no update data provided",
            ));
        }

        let outcome = self
            .store
            .update(E::collection(), &E::key_filter(key), &patch)
            .await?;
        if outcome.modified < 1 {
            return Err(RefdataError::not_found(E::kind(), key));
        }

        self.cache.reload().await?;
        Ok(outcome.modified)
    }

    /// Delete the record with this key. Fails with NotFound when the
    /// store reports zero deletions.
    pub async fn delete(&self, key: &E::Key) -> RefdataResult<bool> {
        self.delete_where(&E::key_filter(key), &key.to_string())
            .await
    }

    /// Delete the first record matching `filter`. `described` names the
    /// target in the NotFound error when nothing was deleted.
    pub async fn delete_where(&self, filter: &Filter, described: &str) -> RefdataResult<bool> {
        let deleted = self.store.delete(E::collection(), filter).await?;
        if deleted < 1 {
            return Err(RefdataError::not_found(E::kind(), described));
        }

        self.cache.reload().await?;
        Ok(true)
    }

    /// Number of cached records (forces a load if unloaded).
    pub async fn count(&self) -> RefdataResult<usize> {
        self.cache.count().await
    }
}
