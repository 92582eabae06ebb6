//! In-memory implementation of [`GraphStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral servers,
//! and anywhere persistence isn't needed. It delegates to a
//! [`SocialGraph`], which validates every write before mutating, giving the
//! same semantics as the SQLite backend.

use graphpress_core::{Edge, EdgeKind, NewEdge, Node, NodeId, NodeKind, SocialGraph, UserField};

use crate::error::StorageError;
use crate::traits::GraphStore;

/// In-memory [`GraphStore`] backed by a petgraph `StableGraph`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    graph: SocialGraph,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }
}

impl GraphStore for InMemoryStore {
    fn get_node(&self, id: NodeId) -> Result<Node, StorageError> {
        Ok(self.graph.get_node(id)?.clone())
    }

    fn create_node(&mut self, node: Node) -> Result<Node, StorageError> {
        self.graph.add_node(node.clone())?;
        Ok(node)
    }

    fn set_attribute(
        &mut self,
        id: NodeId,
        field: UserField,
        value: &str,
    ) -> Result<(), StorageError> {
        self.graph.set_attribute(id, field, value.to_string())?;
        Ok(())
    }

    fn contains(&self, id: NodeId) -> Result<bool, StorageError> {
        Ok(self.graph.contains(id))
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Result<Vec<Node>, StorageError> {
        Ok(self.graph.nodes_of_kind(kind).into_iter().cloned().collect())
    }

    fn connect(&mut self, edge: NewEdge) -> Result<Edge, StorageError> {
        Ok(self.graph.connect(edge)?)
    }

    fn out_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError> {
        Ok(self.graph.out_edges(node, kind)?)
    }

    fn in_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError> {
        Ok(self.graph.in_edges(node, kind)?)
    }

    fn insert_subgraph(&mut self, node: Node, edges: &[NewEdge]) -> Result<Node, StorageError> {
        self.graph.insert_subgraph(node.clone(), edges)?;
        Ok(node)
    }
}
