//! Core error types for graphpress-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the social graph model.

use thiserror::Error;

use crate::edge::EdgeKind;
use crate::id::NodeId;
use crate::node::NodeKind;

/// Core errors produced by the graphpress-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A node id was not found in the graph.
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// The node exists but is not of the kind the caller asked for.
    #[error("node {id} is a {found}, expected a {expected}")]
    WrongKind {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },

    /// The input does not have the shape of a node identifier.
    #[error("invalid node id: '{input}'")]
    InvalidId { input: String },

    /// An edge failed endpoint validation.
    #[error("invalid {kind} edge: {reason}")]
    InvalidEdge { kind: EdgeKind, reason: String },

    /// A structural invariant would be violated by the write.
    #[error("integrity violation: {reason}")]
    IntegrityError { reason: String },

    /// A field value failed validation.
    #[error("{message}")]
    Validation { message: String },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] with a static message.
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
        }
    }
}
