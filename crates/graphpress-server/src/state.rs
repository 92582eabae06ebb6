//! Shared handler state.
//!
//! Every request goes through one `GraphService` behind an async mutex, so
//! forum and profile writes apply one at a time and concurrent profile
//! updates resolve last-writer-wins. The SQLite connection inside the store
//! is not `Sync`, which rules out a read/write lock.

use std::sync::Arc;

use crate::config::{ServerConfig, StoreBackend};
use crate::error::ApiError;
use crate::service::GraphService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The forum service; handlers hold the lock only while calling it.
    pub service: Arc<tokio::sync::Mutex<GraphService>>,
    /// Whether the session cookie carries the Secure flag.
    pub secure_cookies: bool,
}

impl AppState {
    /// State over the forum database at `db_path`, with plain cookies.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        Ok(AppState::with_service(GraphService::new(db_path)?, false))
    }

    /// State over an empty in-memory graph.
    pub fn in_memory() -> Self {
        AppState::with_service(GraphService::in_memory(), false)
    }

    /// Creates the state described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ApiError> {
        let service = match config.store {
            StoreBackend::Sqlite => GraphService::new(&config.db_path)?,
            StoreBackend::Memory => {
                tracing::warn!("running on the in-memory store, data is lost on exit");
                GraphService::in_memory()
            }
        };
        Ok(AppState::with_service(service, config.secure_cookies))
    }

    pub fn with_service(service: GraphService, secure_cookies: bool) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            secure_cookies,
        }
    }
}
