//! Document store adapter
//!
//! All interaction with the underlying store goes through the
//! [`DocumentStore`] trait - the service may be required to use a new
//! backend at any point, and the trait is the seam that makes that cheap.
//! Operations work on named collections of schemaless JSON documents; the
//! store assigns each document a UUIDv7 identifier kept outside the
//! document itself and surfaced (stringified) or stripped on read, per
//! caller preference.
//!
//! Failure policy: connection-establishment failures surface as
//! `Unavailable`, everything after a connection exists as `Storage`. Errors
//! are logged and re-raised unchanged - no retry, no backoff.

pub mod lmdb;
pub mod memory;

use async_trait::async_trait;
use gazetteer_core::{DocId, Document, Filter, RefdataError, RefdataResult, DOC_ID_FIELD};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// How `read_all` presents the store-assigned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdHandling {
    /// Leave the identifier out of the returned documents.
    #[default]
    Strip,
    /// Inject the identifier into each document as a string under `_id`.
    Stringify,
}

/// Matched/modified counts reported by an update.
///
/// `modified` counts documents whose content actually changed; an update
/// whose patch equals the stored fields matches without modifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Uniform CRUD access to one logical database with one collection per
/// entity type.
///
/// Implementations establish their connection lazily on first use and keep
/// it process-wide. All operations are otherwise stateless with respect to
/// the adapter.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert one document; returns the store-assigned identifier.
    async fn create(&self, collection: &str, doc: Document) -> RefdataResult<DocId>;

    /// Return every document in the collection.
    async fn read_all(&self, collection: &str, ids: IdHandling) -> RefdataResult<Vec<Document>>;

    /// Return the first document matching an exact-field filter, or `None`.
    async fn read_one(&self, collection: &str, filter: &Filter)
        -> RefdataResult<Option<Document>>;

    /// Apply a field-level merge to the first matching document.
    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Document,
    ) -> RefdataResult<UpdateOutcome>;

    /// Delete the first matching document; returns the number deleted.
    async fn delete(&self, collection: &str, filter: &Filter) -> RefdataResult<u64>;
}

/// Serialize an entity into a store document.
pub fn to_document<E: Serialize>(entity: &E) -> RefdataResult<Document> {
    match serde_json::to_value(entity) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(RefdataError::validation(
            "record",
            format!("expected a field mapping, got {}", json_kind(&other)),
        )),
        Err(e) => Err(RefdataError::storage(format!(
            "failed to serialize record: {}",
            e
        ))),
    }
}

/// Deserialize a store document into an entity.
pub fn from_document<E: DeserializeOwned>(doc: Document) -> RefdataResult<E> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| RefdataError::storage(format!("failed to deserialize record: {}", e)))
}

/// Inject the stringified identifier under `_id`.
pub(crate) fn with_doc_id(mut doc: Document, id: DocId) -> Document {
    doc.insert(
        DOC_ID_FIELD.to_string(),
        serde_json::Value::String(id.to_string()),
    );
    doc
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
