//! Server configuration read from environment variables.
//!
//! - `GRAPHPRESS_DB_PATH`: SQLite database file path (default: "graphpress.db")
//! - `GRAPHPRESS_PORT`: listen port (default: "3000")
//! - `GRAPHPRESS_STORE`: `sqlite` or `memory` (default: "sqlite")
//! - `GRAPHPRESS_SECURE_COOKIES`: `true`/`1` sets the Secure flag on the
//!   session cookie

use std::collections::HashMap;

/// Which [`graphpress_storage::GraphStore`] backend to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: u16,
    pub store: StoreBackend,
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "graphpress.db".to_string(),
            port: 3000,
            store: StoreBackend::Sqlite,
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("GRAPHPRESS_"))
            .collect();
        Self::from_vars(&vars)
    }

    /// Builds a configuration from an explicit variable map.
    ///
    /// Unparseable values fall back to the defaults with a warning.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = ServerConfig::default();

        let db_path = vars
            .get("GRAPHPRESS_DB_PATH")
            .cloned()
            .unwrap_or(defaults.db_path);

        let port = match vars.get("GRAPHPRESS_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid GRAPHPRESS_PORT, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let store = match vars.get("GRAPHPRESS_STORE").map(|s| s.to_ascii_lowercase()) {
            Some(ref s) if s == "memory" => StoreBackend::Memory,
            Some(ref s) if s == "sqlite" => StoreBackend::Sqlite,
            Some(other) => {
                tracing::warn!(value = %other, "unknown GRAPHPRESS_STORE, using sqlite");
                StoreBackend::Sqlite
            }
            None => defaults.store,
        };

        let secure_cookies = vars
            .get("GRAPHPRESS_SECURE_COOKIES")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(defaults.secure_cookies);

        ServerConfig {
            db_path,
            port,
            store,
            secure_cookies,
        }
    }

    /// `0.0.0.0:<port>`
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
