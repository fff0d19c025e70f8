//! Shared application state for Axum routers.

use std::path::Path;
use std::sync::Arc;

use gazetteer_storage::{CityService, CountryService, LmdbDocumentStore, StateService};

/// Type alias for the document store implementation backing the API.
///
/// The query services are generic over `DocumentStore`; the API pins one
/// backend here so the router stays monomorphic. Swapping backends means
/// changing this alias, nothing else.
pub type AppStore = LmdbDocumentStore;

/// Application-wide state shared across all routes.
///
/// Each entity type owns its service (and through it, its cache),
/// constructed once at startup. The raw store handle stays available for
/// the readiness probe.
pub struct AppState {
    pub cities: CityService<AppStore>,
    pub states: StateService<AppStore>,
    pub countries: CountryService<AppStore>,
    pub store: Arc<AppStore>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the state over an already-configured store.
    pub fn new(store: Arc<AppStore>) -> Self {
        Self {
            cities: CityService::new(Arc::clone(&store)),
            states: StateService::new(Arc::clone(&store)),
            countries: CountryService::new(Arc::clone(&store)),
            store,
            start_time: std::time::Instant::now(),
        }
    }

    /// Build the state with a store rooted at `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>, map_size_mb: usize) -> Self {
        let store = Arc::new(LmdbDocumentStore::new(data_dir, map_size_mb));
        Self::new(store)
    }
}
