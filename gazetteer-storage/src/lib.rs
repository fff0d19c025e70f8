//! Gazetteer Storage - Document Store, Cache, and Query Services
//!
//! This crate holds the layered core of the service:
//!
//! - [`store`]: the `DocumentStore` trait - uniform create/read/read-one/
//!   update/delete against named collections - with an LMDB-backed
//!   implementation and an in-memory one for tests and dev mode.
//! - [`cache`]: a per-entity read-through cache holding a full snapshot of
//!   one collection, lazily loaded and entirely rebuilt after any mutation.
//! - [`service`]: per-entity query services (validation, key composition,
//!   duplicate-key policy) layered on the cache and the store.
//!
//! The HTTP layer consumes only the query services; nothing above this
//! crate touches the store directly.

pub mod cache;
pub mod service;
pub mod store;

pub use cache::EntityCache;
pub use service::{
    city::CityService, country::CountryService, state::StateService, CreateOutcome,
    DuplicatePolicy, QueryService,
};
pub use store::{
    from_document, lmdb::LmdbDocumentStore, memory::InMemoryDocumentStore, to_document,
    DocumentStore, IdHandling, UpdateOutcome,
};
