//! Typed, directed relationships between nodes.
//!
//! Authorship is never stored on a Thread or Reply body; it is derived by
//! walking [`EdgeKind::Start`] and [`EdgeKind::Reply`] edges back to the
//! authoring User. Thread membership of a Reply is the
//! [`EdgeKind::BelongsTo`] edge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::NodeKind;

/// Edge kinds of the social graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// User started a Thread.
    Start,
    /// User authored a Reply.
    Reply,
    /// Reply is part of a Thread.
    BelongsTo,
}

impl EdgeKind {
    /// The (source, target) node kinds this edge kind connects.
    pub fn signature(&self) -> (NodeKind, NodeKind) {
        match self {
            EdgeKind::Start => (NodeKind::User, NodeKind::Thread),
            EdgeKind::Reply => (NodeKind::User, NodeKind::Reply),
            EdgeKind::BelongsTo => (NodeKind::Reply, NodeKind::Thread),
        }
    }

    /// At most one edge of this kind may point at a given target.
    pub fn single_incoming(&self) -> bool {
        matches!(self, EdgeKind::Start | EdgeKind::Reply)
    }

    /// At most one edge of this kind may leave a given source.
    pub fn single_outgoing(&self) -> bool {
        matches!(self, EdgeKind::BelongsTo)
    }

    /// Checks that the endpoint kinds match [`EdgeKind::signature`].
    pub fn check_endpoints(&self, source: NodeKind, target: NodeKind) -> Result<(), CoreError> {
        let (want_source, want_target) = self.signature();
        if source != want_source || target != want_target {
            return Err(CoreError::InvalidEdge {
                kind: *self,
                reason: format!(
                    "expected {} -> {}, got {} -> {}",
                    want_source, want_target, source, target
                ),
            });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Start => "Start",
            EdgeKind::Reply => "Reply",
            EdgeKind::BelongsTo => "BelongsTo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Start" => Some(EdgeKind::Start),
            "Reply" => Some(EdgeKind::Reply),
            "BelongsTo" => Some(EdgeKind::BelongsTo),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl NewEdge {
    pub fn new(source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        NewEdge {
            source,
            target,
            kind,
        }
    }
}

/// A stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures() {
        assert_eq!(EdgeKind::Start.signature(), (NodeKind::User, NodeKind::Thread));
        assert_eq!(EdgeKind::Reply.signature(), (NodeKind::User, NodeKind::Reply));
        assert_eq!(
            EdgeKind::BelongsTo.signature(),
            (NodeKind::Reply, NodeKind::Thread)
        );
    }

    #[test]
    fn check_endpoints_rejects_mismatch() {
        assert!(EdgeKind::Start
            .check_endpoints(NodeKind::User, NodeKind::Thread)
            .is_ok());
        let err = EdgeKind::Start
            .check_endpoints(NodeKind::User, NodeKind::Reply)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidEdge {
                kind: EdgeKind::Start,
                ..
            }
        ));
        assert!(EdgeKind::BelongsTo
            .check_endpoints(NodeKind::Thread, NodeKind::Reply)
            .is_err());
    }

    #[test]
    fn cardinality_flags() {
        assert!(EdgeKind::Start.single_incoming());
        assert!(EdgeKind::Reply.single_incoming());
        assert!(!EdgeKind::BelongsTo.single_incoming());
        assert!(EdgeKind::BelongsTo.single_outgoing());
        assert!(!EdgeKind::Start.single_outgoing());
    }

    #[test]
    fn names_roundtrip() {
        for kind in [EdgeKind::Start, EdgeKind::Reply, EdgeKind::BelongsTo] {
            assert_eq!(EdgeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EdgeKind::from_name("Follows"), None);
    }
}
