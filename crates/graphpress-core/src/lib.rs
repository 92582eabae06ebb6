pub mod attributes;
pub mod credential;
pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod validation;

// Re-export commonly used types
pub use attributes::AttributeMap;
pub use edge::{Edge, EdgeKind, NewEdge};
pub use error::CoreError;
pub use graph::SocialGraph;
pub use id::{EdgeId, NodeId};
pub use node::{Node, NodeBody, NodeKind, ReplyBody, ThreadBody, UserField, UserProfile};
