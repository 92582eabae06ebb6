//! SQLite implementation of [`GraphStore`].
//!
//! [`SqliteStore`] persists the social graph in a SQLite database with WAL
//! mode, one transaction per write, and automatic schema migrations. Node
//! bodies are stored as JSON TEXT columns via serde_json; edges are plain
//! rows whose `AUTOINCREMENT` key doubles as the insertion order.
//!
//! The row helpers take a `&Connection` so they run unchanged inside a
//! `Transaction`, which is how [`GraphStore::insert_subgraph`] commits a
//! node and its edges as one unit.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use graphpress_core::{Edge, EdgeId, EdgeKind, NewEdge, Node, NodeBody, NodeId, NodeKind, UserField};

use crate::error::StorageError;
use crate::traits::GraphStore;

/// SQLite-backed implementation of [`GraphStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_timestamp(id: NodeId, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::IntegrityError {
            reason: format!("bad created_at '{}' on node {}: {}", raw, id, e),
        })
}

/// Parses an id read back from a column.
fn stored_id(raw: &str) -> Result<NodeId, StorageError> {
    NodeId::parse(raw).map_err(|_| StorageError::IntegrityError {
        reason: format!("malformed node id '{}' in database", raw),
    })
}

fn decode_node(id: NodeId, kind: &str, created_at: &str, body_json: &str) -> Result<Node, StorageError> {
    let kind = NodeKind::from_name(kind).ok_or_else(|| StorageError::IntegrityError {
        reason: format!("unknown node kind '{}' on node {}", kind, id),
    })?;
    let body: NodeBody = serde_json::from_str(body_json)?;
    if body.kind() != kind {
        return Err(StorageError::IntegrityError {
            reason: format!("node {} is stored as {} but its body is a {}", id, kind, body.kind()),
        });
    }
    Ok(Node {
        id,
        created_at: decode_timestamp(id, created_at)?,
        body,
    })
}

fn load_node(conn: &Connection, id: NodeId) -> Result<Node, StorageError> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT kind, created_at, body_json FROM nodes WHERE node_id = ?1",
            params![id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;

    match row {
        Some((kind, created_at, body_json)) => decode_node(id, &kind, &created_at, &body_json),
        None => Err(StorageError::NodeNotFound { id }),
    }
}

fn load_kind(conn: &Connection, id: NodeId) -> Result<NodeKind, StorageError> {
    let kind: Option<String> = conn
        .query_row(
            "SELECT kind FROM nodes WHERE node_id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    match kind {
        Some(kind) => NodeKind::from_name(&kind).ok_or_else(|| StorageError::IntegrityError {
            reason: format!("unknown node kind '{}' on node {}", kind, id),
        }),
        None => Err(StorageError::NodeNotFound { id }),
    }
}

fn node_exists(conn: &Connection, id: NodeId) -> Result<bool, StorageError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM nodes WHERE node_id = ?1)",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn write_node(conn: &Connection, node: &Node) -> Result<(), StorageError> {
    if node_exists(conn, node.id)? {
        return Err(StorageError::IntegrityError {
            reason: format!("duplicate node id {}", node.id),
        });
    }
    let body_json = serde_json::to_string(&node.body)?;
    conn.execute(
        "INSERT INTO nodes (node_id, kind, created_at, body_json) VALUES (?1, ?2, ?3, ?4)",
        params![
            node.id.to_string(),
            node.kind().as_str(),
            encode_timestamp(&node.created_at),
            body_json,
        ],
    )?;
    Ok(())
}

fn count_incoming(conn: &Connection, target: NodeId, kind: EdgeKind) -> Result<i64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM edges WHERE target_id = ?1 AND kind = ?2",
        params![target.to_string(), kind.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn count_outgoing(conn: &Connection, source: NodeId, kind: EdgeKind) -> Result<i64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM edges WHERE source_id = ?1 AND kind = ?2",
        params![source.to_string(), kind.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn write_edge(conn: &Connection, edge: NewEdge) -> Result<Edge, StorageError> {
    let source_kind = load_kind(conn, edge.source)?;
    let target_kind = load_kind(conn, edge.target)?;
    edge.kind.check_endpoints(source_kind, target_kind)?;

    if edge.kind.single_incoming() && count_incoming(conn, edge.target, edge.kind)? > 0 {
        return Err(StorageError::IntegrityError {
            reason: format!("{} already has a {} edge", edge.target, edge.kind),
        });
    }
    if edge.kind.single_outgoing() && count_outgoing(conn, edge.source, edge.kind)? > 0 {
        return Err(StorageError::IntegrityError {
            reason: format!("{} already has a {} edge", edge.source, edge.kind),
        });
    }

    conn.execute(
        "INSERT INTO edges (source_id, target_id, kind) VALUES (?1, ?2, ?3)",
        params![edge.source.to_string(), edge.target.to_string(), edge.kind.as_str()],
    )?;
    Ok(Edge {
        id: EdgeId(conn.last_insert_rowid() as u64),
        source: edge.source,
        target: edge.target,
        kind: edge.kind,
    })
}

fn query_edges(
    conn: &Connection,
    sql: &str,
    node: NodeId,
    kind: EdgeKind,
) -> Result<Vec<Edge>, StorageError> {
    // Existence first, so an unknown node is an error rather than no edges.
    if !node_exists(conn, node)? {
        return Err(StorageError::NodeNotFound { id: node });
    }
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params![node.to_string(), kind.as_str()], |row| {
        let edge_id: i64 = row.get(0)?;
        let source: String = row.get(1)?;
        let target: String = row.get(2)?;
        Ok((edge_id, source, target))
    })?;

    let mut edges = Vec::new();
    for row in rows {
        let (edge_id, source, target) = row?;
        edges.push(Edge {
            id: EdgeId(edge_id as u64),
            source: stored_id(&source)?,
            target: stored_id(&target)?,
            kind,
        });
    }
    Ok(edges)
}

// ---------------------------------------------------------------------------
// GraphStore implementation
// ---------------------------------------------------------------------------

impl GraphStore for SqliteStore {
    fn get_node(&self, id: NodeId) -> Result<Node, StorageError> {
        load_node(&self.conn, id)
    }

    fn create_node(&mut self, node: Node) -> Result<Node, StorageError> {
        let tx = self.conn.transaction()?;
        write_node(&tx, &node)?;
        tx.commit()?;
        Ok(node)
    }

    fn set_attribute(
        &mut self,
        id: NodeId,
        field: UserField,
        value: &str,
    ) -> Result<(), StorageError> {
        self.set_attributes(id, &[(field, value)])
    }

    fn set_attributes(
        &mut self,
        id: NodeId,
        changes: &[(UserField, &str)],
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let mut node = load_node(&tx, id)?;
        for (field, value) in changes {
            node.set_attribute(*field, value.to_string())?;
        }
        let body_json = serde_json::to_string(&node.body)?;
        tx.execute(
            "UPDATE nodes SET body_json = ?1 WHERE node_id = ?2",
            params![body_json, id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn contains(&self, id: NodeId) -> Result<bool, StorageError> {
        node_exists(&self.conn, id)
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Result<Vec<Node>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT node_id, created_at, body_json FROM nodes WHERE kind = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![kind.as_str()], |row| {
            let node_id: String = row.get(0)?;
            let created_at: String = row.get(1)?;
            let body_json: String = row.get(2)?;
            Ok((node_id, created_at, body_json))
        })?;

        let mut nodes = Vec::new();
        for row in rows {
            let (node_id, created_at, body_json) = row?;
            let id = stored_id(&node_id)?;
            nodes.push(decode_node(id, kind.as_str(), &created_at, &body_json)?);
        }
        Ok(nodes)
    }

    fn connect(&mut self, edge: NewEdge) -> Result<Edge, StorageError> {
        let tx = self.conn.transaction()?;
        let stored = write_edge(&tx, edge)?;
        tx.commit()?;
        Ok(stored)
    }

    fn out_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError> {
        query_edges(
            &self.conn,
            "SELECT edge_id, source_id, target_id FROM edges WHERE source_id = ?1 AND kind = ?2 ORDER BY edge_id",
            node,
            kind,
        )
    }

    fn in_edges(&self, node: NodeId, kind: EdgeKind) -> Result<Vec<Edge>, StorageError> {
        query_edges(
            &self.conn,
            "SELECT edge_id, source_id, target_id FROM edges WHERE target_id = ?1 AND kind = ?2 ORDER BY edge_id",
            node,
            kind,
        )
    }

    fn insert_subgraph(&mut self, node: Node, edges: &[NewEdge]) -> Result<Node, StorageError> {
        // Dropping the transaction on any error rolls everything back.
        let tx = self.conn.transaction()?;
        write_node(&tx, &node)?;
        for edge in edges {
            write_edge(&tx, *edge)?;
        }
        tx.commit()?;
        Ok(node)
    }
}
