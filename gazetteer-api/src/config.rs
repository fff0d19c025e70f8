//! API Configuration Module
//!
//! Configuration is loaded from environment variables with sensible
//! defaults for development: bind address, document store location and
//! size, and allowed CORS origins.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{ApiError, ApiResult};

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind the HTTP listener to.
    pub bind_host: String,

    /// Port for the HTTP listener.
    pub port: u16,

    /// Directory holding the LMDB document store.
    pub data_dir: PathBuf,

    /// Maximum size of the document store in megabytes.
    pub store_map_size_mb: usize,

    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./gazetteer-data"),
            store_map_size_mb: 256,
            cors_origins: Vec::new(), // Empty = allow all
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `GAZETTEER_BIND`: Interface to bind (default: 0.0.0.0)
    /// - `PORT` / `GAZETTEER_PORT`: Listener port (default: 3000)
    /// - `GAZETTEER_DATA_DIR`: Document store directory (default: ./gazetteer-data)
    /// - `GAZETTEER_STORE_MAP_SIZE_MB`: LMDB map size (default: 256)
    /// - `GAZETTEER_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_host =
            std::env::var("GAZETTEER_BIND").unwrap_or(defaults.bind_host);

        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("GAZETTEER_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let data_dir = std::env::var("GAZETTEER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let store_map_size_mb = std::env::var("GAZETTEER_STORE_MAP_SIZE_MB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.store_map_size_mb);

        let cors_origins = std::env::var("GAZETTEER_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_host,
            port,
            data_dir,
            store_map_size_mb,
            cors_origins,
        }
    }

    /// Resolve the socket address to bind.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}
