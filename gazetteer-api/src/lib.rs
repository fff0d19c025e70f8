//! Gazetteer API - REST Layer
//!
//! Thin HTTP surface over the query services: request/response mapping,
//! validation, error translation, health probes, and the OpenAPI document.
//! All entity semantics live in gazetteer-storage; this crate never
//! touches the document store except through the services (the readiness
//! probe is the one deliberate exception).

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod state;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, AppStore};
pub use types::*;
