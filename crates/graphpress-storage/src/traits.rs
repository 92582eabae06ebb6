//! The [`GraphStore`] trait defining the storage contract for the social graph.
//!
//! The trait covers two halves:
//! - **Node store**: create, fetch, attribute updates, existence checks and
//!   kind-filtered enumeration in creation order.
//! - **Edge store**: typed directed edges, queried per node and kind in
//!   insertion order.
//!
//! [`GraphStore::insert_subgraph`] is the only way the domain layer creates
//! a Thread or Reply: the node and its mandatory edges are committed
//! together. All backends ([`crate::InMemoryStore`], [`crate::SqliteStore`])
//! implement this trait and are swappable without changing domain logic.

use graphpress_core::credential::digest_matches;
use graphpress_core::{Edge, EdgeKind, NewEdge, Node, NodeId, NodeKind, UserField};

use crate::error::StorageError;

/// The storage contract for the social graph.
///
/// The trait is synchronous; callers serialize access behind their own lock.
pub trait GraphStore {
    // -------------------------------------------------------------------
    // Node store
    // -------------------------------------------------------------------

    /// Retrieves a node by id.
    fn get_node(&self, id: NodeId) -> Result<Node, StorageError>;

    /// Stores a node built by one of the [`Node`] constructors.
    ///
    /// Fails with [`StorageError::IntegrityError`] if the id is taken.
    fn create_node(&mut self, node: Node) -> Result<Node, StorageError>;

    /// Overwrites one attribute of a User node.
    fn set_attribute(
        &mut self,
        id: NodeId,
        field: UserField,
        value: &str,
    ) -> Result<(), StorageError>;

    /// Overwrites several attributes of a User node in one write, in the
    /// order given.
    ///
    /// Backends with transactions override this so that no field lands
    /// without the others.
    fn set_attributes(
        &mut self,
        id: NodeId,
        changes: &[(UserField, &str)],
    ) -> Result<(), StorageError> {
        for (field, value) in changes {
            self.set_attribute(id, *field, value)?;
        }
        Ok(())
    }

    /// Returns `true` if a node with `id` exists.
    fn contains(&self, id: NodeId) -> Result<bool, StorageError>;

    /// All nodes of `kind`, in creation order.
    fn nodes_of_kind(&self, kind: NodeKind) -> Result<Vec<Node>, StorageError>;

    // -------------------------------------------------------------------
    // Edge store
    // -------------------------------------------------------------------

    /// Connects two existing nodes, enforcing endpoint kinds and cardinality.
    fn connect(&mut self, edge: NewEdge) -> Result<Edge, StorageError>;

    /// Edges of `kind` leaving `node`, in insertion order.
    fn out_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError>;

    /// Edges of `kind` arriving at `node`, in insertion order.
    fn in_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError>;

    /// Stores `node` together with `edges`, atomically.
    ///
    /// Either the node and every edge become visible, or nothing changes.
    fn insert_subgraph(&mut self, node: Node, edges: &[NewEdge]) -> Result<Node, StorageError>;

    // -------------------------------------------------------------------
    // Lookups built on the primitives
    // -------------------------------------------------------------------

    /// Finds the user holding `username`, if any.
    fn find_user_by_username(&self, username: &str) -> Result<Option<Node>, StorageError> {
        Ok(self
            .nodes_of_kind(NodeKind::User)?
            .into_iter()
            .find(|node| {
                node.as_user()
                    .map(|profile| profile.username == username)
                    .unwrap_or(false)
            }))
    }

    /// Every user whose username and password digest both match.
    fn find_users_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<Node>, StorageError> {
        Ok(self
            .nodes_of_kind(NodeKind::User)?
            .into_iter()
            .filter(|node| {
                node.as_user()
                    .map(|profile| {
                        profile.username == username && digest_matches(password, &profile.password)
                    })
                    .unwrap_or(false)
            })
            .collect())
    }
}
