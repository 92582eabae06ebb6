//! GraphService: the single coordinator between HTTP handlers and the
//! graph store.
//!
//! All domain logic flows through [`GraphService`]. Handlers are thin
//! wrappers that resolve the caller, delegate to these methods and wrap the
//! result. The operations are split by domain:
//!
//! - [`forum`]: threads and replies
//! - [`profile`]: public profile reads and updates
//! - [`account`]: signup, login and identity checks
//!
//! Mutating operations take an explicit [`Caller`](crate::identity::Caller)
//! resolved by the handler; nothing here reads ambient session state.

pub mod account;
pub mod forum;
pub mod profile;

use graphpress_core::{Edge, EdgeKind, NodeId};
use graphpress_storage::{GraphStore, InMemoryStore, SqliteStore};

use crate::error::ApiError;

pub use profile::ProfileUpdate;

/// The central service owning the graph store.
pub struct GraphService {
    store: Box<dyn GraphStore + Send>,
}

impl GraphService {
    /// Creates a service backed by a SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)?;
        tracing::info!(db_path, "graph store opened");
        Ok(GraphService::with_store(Box::new(store)))
    }

    /// Creates a service on a fresh in-memory graph.
    pub fn in_memory() -> Self {
        GraphService::with_store(Box::new(InMemoryStore::new()))
    }

    /// Creates a service on any store backend.
    pub fn with_store(store: Box<dyn GraphStore + Send>) -> Self {
        GraphService { store }
    }

    /// Read access to the store.
    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    /// The single edge of `kind` arriving at `node`.
    ///
    /// Writes guarantee at most one; if the store still holds several, the
    /// anomaly is logged and the oldest edge wins.
    fn single_in_edge(&self, node: NodeId, kind: EdgeKind) -> Result<Edge, ApiError> {
        let edges = self.store.in_edges(node, kind)?;
        if edges.len() > 1 {
            tracing::warn!(
                node = %node,
                edge_kind = %kind,
                count = edges.len(),
                "data integrity anomaly: expected a single incoming edge"
            );
        }
        edges.into_iter().next().ok_or_else(|| {
            ApiError::Internal(format!("{} has no incoming {} edge", node, kind))
        })
    }
}

/// `true` when a given query parameter is empty or whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
