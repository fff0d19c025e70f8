//! LMDB-backed document store
//!
//! Uses the heed crate (Rust bindings for LMDB) with one named database
//! per collection. Documents are JSON-serialized values keyed by their
//! UUIDv7 identifier.
//!
//! The environment is the "connection": it is opened lazily on first use
//! and kept process-wide, matching the adapter contract. Open failures
//! normalize to `Unavailable`; anything after the environment exists
//! normalizes to `Storage`. Both are logged once and re-raised without
//! retry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use gazetteer_core::{new_doc_id, DocId, Document, Filter, RefdataError, RefdataResult};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use once_cell::sync::OnceCell;

use super::{with_doc_id, DocumentStore, IdHandling, UpdateOutcome};

/// Upper bound on named databases in the environment. Three collections
/// exist today; headroom costs nothing.
const MAX_COLLECTIONS: u32 = 8;

/// Error type for LMDB store operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open a collection database within the environment.
    #[error("Failed to open collection database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStoreError> for RefdataError {
    fn from(e: LmdbStoreError) -> Self {
        tracing::error!(error = %e, "LMDB document store failure");
        match e {
            LmdbStoreError::EnvOpen(reason) => RefdataError::unavailable(reason),
            LmdbStoreError::Io(io) => RefdataError::unavailable(io.to_string()),
            other => RefdataError::storage(other.to_string()),
        }
    }
}

/// Document store backed by an LMDB environment on local disk.
pub struct LmdbDocumentStore {
    path: PathBuf,
    map_size_mb: usize,
    env: OnceCell<Env>,
    dbs: RwLock<HashMap<String, Database<Bytes, Bytes>>>,
}

impl LmdbDocumentStore {
    /// Configure a store rooted at `path`. No I/O happens here; the
    /// environment is opened on the first operation.
    pub fn new<P: AsRef<Path>>(path: P, map_size_mb: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            map_size_mb,
            env: OnceCell::new(),
            dbs: RwLock::new(HashMap::new()),
        }
    }

    /// Lazily open (or return) the process-wide environment.
    fn env(&self) -> Result<&Env, LmdbStoreError> {
        self.env.get_or_try_init(|| {
            std::fs::create_dir_all(&self.path)?;

            let env = unsafe {
                EnvOpenOptions::new()
                    .map_size(self.map_size_mb * 1024 * 1024)
                    .max_dbs(MAX_COLLECTIONS)
                    .open(&self.path)
            }
            .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

            tracing::info!(path = %self.path.display(), "opened LMDB document store");
            Ok(env)
        })
    }

    /// Open (creating if needed) the named database for a collection.
    fn db(&self, collection: &str) -> Result<Database<Bytes, Bytes>, LmdbStoreError> {
        if let Ok(dbs) = self.dbs.read() {
            if let Some(db) = dbs.get(collection) {
                return Ok(*db);
            }
        }

        let env = self.env()?;
        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, Some(collection))
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;
        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        if let Ok(mut dbs) = self.dbs.write() {
            dbs.insert(collection.to_string(), db);
        }
        Ok(db)
    }

    /// Find the first document matching `filter`, returning its key bytes
    /// and decoded content.
    fn find_first(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<(Vec<u8>, Document)>, LmdbStoreError> {
        let env = self.env()?;
        let db = self.db(collection)?;
        let rtxn = env
            .read_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let iter = db
            .iter(&rtxn)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        for result in iter {
            let (key, value) =
                result.map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
            let doc: Document = serde_json::from_slice(value)
                .map_err(|e| LmdbStoreError::Deserialization(e.to_string()))?;
            if filter.matches(&doc) {
                return Ok(Some((key.to_vec(), doc)));
            }
        }
        Ok(None)
    }

    fn put_doc(
        &self,
        collection: &str,
        key: &[u8],
        doc: &Document,
    ) -> Result<(), LmdbStoreError> {
        let env = self.env()?;
        let db = self.db(collection)?;
        let bytes = serde_json::to_vec(doc)
            .map_err(|e| LmdbStoreError::Serialization(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        db.put(&mut wtxn, key, &bytes)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LmdbDocumentStore {
    async fn create(&self, collection: &str, doc: Document) -> RefdataResult<DocId> {
        let id = new_doc_id();
        self.put_doc(collection, id.as_bytes(), &doc)?;
        Ok(id)
    }

    async fn read_all(&self, collection: &str, ids: IdHandling) -> RefdataResult<Vec<Document>> {
        let env = self.env()?;
        let db = self.db(collection)?;
        let rtxn = env
            .read_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let iter = db
            .iter(&rtxn)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        let mut docs = Vec::new();
        for result in iter {
            let (key, value) =
                result.map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
            let doc: Document = serde_json::from_slice(value)
                .map_err(|e| LmdbStoreError::Deserialization(e.to_string()))?;
            let doc = match ids {
                IdHandling::Strip => doc,
                IdHandling::Stringify => {
                    let id = DocId::from_slice(key).map_err(|e| {
                        LmdbStoreError::Deserialization(format!("bad document key: {}", e))
                    })?;
                    with_doc_id(doc, id)
                }
            };
            docs.push(doc);
        }
        Ok(docs)
    }

    async fn read_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> RefdataResult<Option<Document>> {
        Ok(self.find_first(collection, filter)?.map(|(_, doc)| doc))
    }

    async fn update(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Document,
    ) -> RefdataResult<UpdateOutcome> {
        let Some((key, mut doc)) = self.find_first(collection, filter)? else {
            return Ok(UpdateOutcome::default());
        };

        let before = doc.clone();
        for (field, value) in patch {
            doc.insert(field.clone(), value.clone());
        }
        if doc == before {
            return Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            });
        }

        self.put_doc(collection, &key, &doc)?;
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> RefdataResult<u64> {
        let Some((key, _)) = self.find_first(collection, filter)? else {
            return Ok(0);
        };

        let env = self.env()?;
        let db = self.db(collection)?;
        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        let deleted = db
            .delete(&mut wtxn, &key)
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;
        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        Ok(u64::from(deleted))
    }
}
