//! Gazetteer Core - Entity Types
//!
//! Pure data structures for the gazetteer reference-data service: entity
//! records, natural keys, exact-field filters, and the error taxonomy.
//! All other crates depend on this. This crate contains ONLY data types
//! and key/validation logic - no storage or HTTP behavior.

pub mod entities;
pub mod error;
pub mod filter;

pub use entities::{
    City, CityKey, Country, CountryKey, EntityKind, RefEntity, State, StateKey, normalize_code,
};
pub use error::{RefdataError, RefdataResult};
pub use filter::{Document, Filter};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Store-assigned document identifier using UUIDv7 for timestamp-sortable IDs.
pub type DocId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 document id (timestamp-sortable).
pub fn new_doc_id() -> DocId {
    Uuid::now_v7()
}

/// Field under which the store keeps its assigned identifier.
///
/// Kept as a single underscore-prefixed name so it can never collide with
/// an entity field.
pub const DOC_ID_FIELD: &str = "_id";
