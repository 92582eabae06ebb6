//! Storage error types for graphpress-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: backend
//! failures (SQLite, migrations, serialization), missing or mistyped nodes,
//! and writes that would break a graph invariant.

use graphpress_core::{CoreError, EdgeKind, NodeId, NodeKind};
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No node with the given id exists.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The node exists but has a different kind.
    #[error("node {id} is a {found}, expected a {expected}")]
    WrongKind {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    /// An edge connects the wrong node kinds.
    #[error("invalid {kind} edge: {reason}")]
    InvalidEdge { kind: EdgeKind, reason: String },

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },

    /// Any other core error surfaced through the store.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NodeNotFound { id } => StorageError::NodeNotFound { id },
            CoreError::WrongKind {
                id,
                expected,
                found,
            } => StorageError::WrongKind {
                id,
                expected,
                found,
            },
            CoreError::InvalidEdge { kind, reason } => StorageError::InvalidEdge { kind, reason },
            CoreError::IntegrityError { reason } => StorageError::IntegrityError { reason },
            other => StorageError::Core(other),
        }
    }
}
