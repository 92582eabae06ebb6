//! Stable ID newtypes for graph entities.
//!
//! [`NodeId`] is a random 128-bit identifier rendered as a fixed-length,
//! 32-character lowercase hex string. [`EdgeId`] is assigned by the store in
//! insertion order, so sorting edges by id recovers the order they were
//! created in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Length of the hex rendering of a [`NodeId`].
pub const NODE_ID_HEX_LEN: usize = 32;

/// Globally unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Allocates a fresh random identifier.
    pub fn generate() -> Self {
        NodeId(Uuid::new_v4())
    }

    /// Parses the 32-character hex form (either case).
    ///
    /// Hyphenated UUIDs and any other length are rejected, so the only
    /// accepted shape is the one [`Display`](fmt::Display) produces.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        if input.len() != NODE_ID_HEX_LEN || !input.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidId {
                input: input.to_string(),
            });
        }
        Uuid::parse_str(input)
            .map(NodeId)
            .map_err(|_| CoreError::InvalidId {
                input: input.to_string(),
            })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for NodeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeId::parse(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NodeId::parse(&value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

/// Store-assigned edge identifier, increasing with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
