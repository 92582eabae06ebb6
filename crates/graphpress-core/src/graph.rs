//! SocialGraph: the in-memory container for users, threads and replies.
//!
//! [`SocialGraph`] wraps a petgraph `StableGraph` whose node weights are
//! [`Node`]s and whose edge weights are [`Edge`]s. All mutations go through
//! its methods so the write-time invariants hold:
//!
//! - every edge connects the node kinds its [`EdgeKind`] allows,
//! - a Thread has at most one Start edge and a Reply at most one Reply edge,
//! - a Reply belongs to at most one Thread,
//! - node ids are unique.
//!
//! [`SocialGraph::insert_subgraph`] validates a node together with its
//! mandatory edges before touching the graph, so either all of them become
//! visible or none do.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::edge::{Edge, EdgeKind, NewEdge};
use crate::error::CoreError;
use crate::id::{EdgeId, NodeId};
use crate::node::{Node, NodeKind, UserField};

/// The social graph container.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    graph: StableGraph<Node, Edge, Directed, u32>,
    /// NodeId -> petgraph index
    index: HashMap<NodeId, NodeIndex<u32>>,
    /// Next edge id counter
    next_edge_id: u64,
}

impl SocialGraph {
    pub fn new() -> Self {
        SocialGraph::default()
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get_node(&self, id: NodeId) -> Result<&Node, CoreError> {
        self.index
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .ok_or(CoreError::NodeNotFound { id })
    }

    /// All nodes of `kind`, in creation order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        // Nodes are never removed, so index order is insertion order.
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .filter(|node| node.kind() == kind)
            .collect()
    }

    /// Edges of `kind` leaving `node`, oldest first.
    pub fn out_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, CoreError> {
        self.edges_directed(node, kind, Direction::Outgoing)
    }

    /// Edges of `kind` arriving at `node`, oldest first.
    pub fn in_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, CoreError> {
        self.edges_directed(node, kind, Direction::Incoming)
    }

    fn edges_directed(
        &self,
        node: NodeId,
        kind: EdgeKind,
        direction: Direction,
    ) -> Result<Vec<Edge>, CoreError> {
        let idx = self.node_index(node)?;
        let mut edges: Vec<Edge> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge_ref| *edge_ref.weight())
            .filter(|edge| edge.kind == kind)
            .collect();
        // petgraph walks adjacency lists newest first.
        edges.sort_by_key(|edge| edge.id);
        Ok(edges)
    }

    fn node_index(&self, id: NodeId) -> Result<NodeIndex<u32>, CoreError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(CoreError::NodeNotFound { id })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Adds a node. Fails if a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, CoreError> {
        let id = node.id;
        if self.index.contains_key(&id) {
            return Err(CoreError::IntegrityError {
                reason: format!("duplicate node id {}", id),
            });
        }
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(id)
    }

    /// Sets an attribute on a user node.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        field: UserField,
        value: String,
    ) -> Result<(), CoreError> {
        let idx = self.node_index(id)?;
        let node = self
            .graph
            .node_weight_mut(idx)
            .ok_or(CoreError::NodeNotFound { id })?;
        node.set_attribute(field, value)
    }

    /// Connects two existing nodes.
    pub fn connect(&mut self, edge: NewEdge) -> Result<Edge, CoreError> {
        let source_kind = self.get_node(edge.source)?.kind();
        let target_kind = self.get_node(edge.target)?.kind();
        self.check_edge(&edge, source_kind, target_kind, &[])?;
        Ok(self.add_edge_unchecked(edge))
    }

    /// Adds `node` and `edges` as one unit.
    ///
    /// Each edge must touch `node` or an existing node. Everything is
    /// validated first; on error the graph is unchanged.
    pub fn insert_subgraph(&mut self, node: Node, edges: &[NewEdge]) -> Result<Vec<Edge>, CoreError> {
        if self.index.contains_key(&node.id) {
            return Err(CoreError::IntegrityError {
                reason: format!("duplicate node id {}", node.id),
            });
        }

        let kind_of = |id: NodeId| -> Result<NodeKind, CoreError> {
            if id == node.id {
                Ok(node.kind())
            } else {
                self.get_node(id).map(Node::kind)
            }
        };
        for (i, edge) in edges.iter().enumerate() {
            let source_kind = kind_of(edge.source)?;
            let target_kind = kind_of(edge.target)?;
            self.check_edge(edge, source_kind, target_kind, &edges[..i])?;
        }

        self.add_node(node)?;
        Ok(edges
            .iter()
            .map(|edge| self.add_edge_unchecked(*edge))
            .collect())
    }

    /// Validates endpoint kinds and cardinality of `edge`, counting both
    /// stored edges and `pending` edges queued in the same write.
    fn check_edge(
        &self,
        edge: &NewEdge,
        source_kind: NodeKind,
        target_kind: NodeKind,
        pending: &[NewEdge],
    ) -> Result<(), CoreError> {
        edge.kind.check_endpoints(source_kind, target_kind)?;

        if edge.kind.single_incoming() {
            let stored = self.count_existing(edge.target, edge.kind, Direction::Incoming);
            let queued = pending
                .iter()
                .filter(|p| p.kind == edge.kind && p.target == edge.target)
                .count();
            if stored + queued > 0 {
                return Err(CoreError::IntegrityError {
                    reason: format!("{} already has a {} edge", edge.target, edge.kind),
                });
            }
        }
        if edge.kind.single_outgoing() {
            let stored = self.count_existing(edge.source, edge.kind, Direction::Outgoing);
            let queued = pending
                .iter()
                .filter(|p| p.kind == edge.kind && p.source == edge.source)
                .count();
            if stored + queued > 0 {
                return Err(CoreError::IntegrityError {
                    reason: format!("{} already has a {} edge", edge.source, edge.kind),
                });
            }
        }
        Ok(())
    }

    fn count_existing(&self, node: NodeId, kind: EdgeKind, direction: Direction) -> usize {
        match self.index.get(&node) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, direction)
                .filter(|edge_ref| edge_ref.weight().kind == kind)
                .count(),
            None => 0,
        }
    }

    /// Inserts an edge whose endpoints are known to exist.
    fn add_edge_unchecked(&mut self, new: NewEdge) -> Edge {
        self.next_edge_id += 1;
        let edge = Edge {
            id: EdgeId(self.next_edge_id),
            source: new.source,
            target: new.target,
            kind: new.kind,
        };
        let from = self.index[&new.source];
        let to = self.index[&new.target];
        self.graph.add_edge(from, to, edge);
        edge
    }
}
