//! Node kinds and their attribute schemas.
//!
//! A [`Node`] is a tagged variant: the [`NodeBody`] carries the schema of
//! its kind, and the typed accessors ([`Node::as_user`], [`Node::as_thread`],
//! [`Node::as_reply`]) fail with [`CoreError::WrongKind`] instead of letting
//! callers guess.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::attributes::AttributeMap;
use crate::error::CoreError;
use crate::id::NodeId;

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    User,
    Thread,
    Reply,
}

impl NodeKind {
    /// Stable name used in storage and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::User => "User",
            NodeKind::Thread => "Thread",
            NodeKind::Reply => "Reply",
        }
    }

    /// Inverse of [`NodeKind::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "User" => Some(NodeKind::User),
            "Thread" => Some(NodeKind::Thread),
            "Reply" => Some(NodeKind::Reply),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A settable user attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserField {
    Username,
    Email,
    Password,
    Avatar,
    Birthday,
    About,
}

impl UserField {
    /// The attribute key as it appears in exported attribute maps.
    pub fn key(&self) -> &'static str {
        match self {
            UserField::Username => "Username",
            UserField::Email => "Email",
            UserField::Password => "Password",
            UserField::Avatar => "Avatar",
            UserField::Birthday => "Birthday",
            UserField::About => "About",
        }
    }

    /// Lower-case field name used by the profile API.
    pub fn api_name(&self) -> &'static str {
        match self {
            UserField::Username => "username",
            UserField::Email => "email",
            UserField::Password => "password",
            UserField::Avatar => "avatar",
            UserField::Birthday => "birthday",
            UserField::About => "about",
        }
    }
}

/// Attributes of a User node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    /// Hex digest produced by [`crate::credential::password_digest`].
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl UserProfile {
    pub fn new(username: String, email: String, password_digest: String) -> Self {
        UserProfile {
            username,
            email,
            password: password_digest,
            avatar: None,
            birthday: None,
            about: None,
        }
    }

    /// Overwrites a single attribute.
    pub fn set(&mut self, field: UserField, value: String) {
        match field {
            UserField::Username => self.username = value,
            UserField::Email => self.email = value,
            UserField::Password => self.password = value,
            UserField::Avatar => self.avatar = Some(value),
            UserField::Birthday => self.birthday = Some(value),
            UserField::About => self.about = Some(value),
        }
    }

    /// Full attribute view, password included.
    pub fn attributes(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.insert(UserField::Username.key(), self.username.as_str());
        attrs.insert(UserField::Email.key(), self.email.as_str());
        attrs.insert(UserField::Password.key(), self.password.as_str());
        let optional = [
            (UserField::Avatar, &self.avatar),
            (UserField::Birthday, &self.birthday),
            (UserField::About, &self.about),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                attrs.insert(field.key(), value.as_str());
            }
        }
        attrs
    }
}

/// Attributes of a Thread node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadBody {
    pub title: String,
    pub content: String,
}

/// Attributes of a Reply node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBody {
    pub content: String,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeBody {
    User(UserProfile),
    Thread(ThreadBody),
    Reply(ReplyBody),
}

impl NodeBody {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeBody::User(_) => NodeKind::User,
            NodeBody::Thread(_) => NodeKind::Thread,
            NodeBody::Reply(_) => NodeKind::Reply,
        }
    }
}

/// A vertex of the social graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Creation time, truncated to whole seconds so every backend
    /// round-trips it exactly.
    pub created_at: DateTime<Utc>,
    pub body: NodeBody,
}

impl Node {
    /// Creates a node with a fresh id, stamped with the current time.
    pub fn new(body: NodeBody) -> Self {
        Node {
            id: NodeId::generate(),
            created_at: Utc::now().trunc_subsecs(0),
            body,
        }
    }

    pub fn user(profile: UserProfile) -> Self {
        Node::new(NodeBody::User(profile))
    }

    pub fn thread(title: String, content: String) -> Self {
        Node::new(NodeBody::Thread(ThreadBody { title, content }))
    }

    pub fn reply(content: String) -> Self {
        Node::new(NodeBody::Reply(ReplyBody { content }))
    }

    pub fn kind(&self) -> NodeKind {
        self.body.kind()
    }

    fn wrong_kind(&self, expected: NodeKind) -> CoreError {
        CoreError::WrongKind {
            id: self.id,
            expected,
            found: self.kind(),
        }
    }

    pub fn as_user(&self) -> Result<&UserProfile, CoreError> {
        match &self.body {
            NodeBody::User(profile) => Ok(profile),
            _ => Err(self.wrong_kind(NodeKind::User)),
        }
    }

    pub fn as_user_mut(&mut self) -> Result<&mut UserProfile, CoreError> {
        let err = self.wrong_kind(NodeKind::User);
        match &mut self.body {
            NodeBody::User(profile) => Ok(profile),
            _ => Err(err),
        }
    }

    pub fn as_thread(&self) -> Result<&ThreadBody, CoreError> {
        match &self.body {
            NodeBody::Thread(thread) => Ok(thread),
            _ => Err(self.wrong_kind(NodeKind::Thread)),
        }
    }

    pub fn as_reply(&self) -> Result<&ReplyBody, CoreError> {
        match &self.body {
            NodeBody::Reply(reply) => Ok(reply),
            _ => Err(self.wrong_kind(NodeKind::Reply)),
        }
    }

    /// Sets a user attribute. Threads and replies are immutable.
    pub fn set_attribute(&mut self, field: UserField, value: String) -> Result<(), CoreError> {
        self.as_user_mut()?.set(field, value);
        Ok(())
    }

    /// Attribute view of the node, including sensitive keys.
    pub fn attributes(&self) -> AttributeMap {
        match &self.body {
            NodeBody::User(profile) => profile.attributes(),
            NodeBody::Thread(thread) => {
                let mut attrs = AttributeMap::new();
                attrs.insert("Title", thread.title.as_str());
                attrs.insert("Content", thread.content.as_str());
                attrs
            }
            NodeBody::Reply(reply) => {
                let mut attrs = AttributeMap::new();
                attrs.insert("Content", reply.content.as_str());
                attrs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserProfile {
        UserProfile::new(
            "alice".into(),
            "alice@example.com".into(),
            "0123456789abcdef0123456789abcdef".into(),
        )
    }

    #[test]
    fn typed_accessors_check_kind() {
        let thread = Node::thread("Hello".into(), "World".into());
        assert_eq!(thread.as_thread().unwrap().title, "Hello");
        match thread.as_user() {
            Err(CoreError::WrongKind {
                id,
                expected,
                found,
            }) => {
                assert_eq!(id, thread.id);
                assert_eq!(expected, NodeKind::User);
                assert_eq!(found, NodeKind::Thread);
            }
            other => panic!("expected WrongKind, got {:?}", other),
        }
        assert!(thread.as_reply().is_err());
    }

    #[test]
    fn set_attribute_only_on_users() {
        let mut user = Node::user(alice());
        user.set_attribute(UserField::About, "hello".into()).unwrap();
        assert_eq!(user.as_user().unwrap().about.as_deref(), Some("hello"));

        let mut reply = Node::reply("hi".into());
        assert!(matches!(
            reply.set_attribute(UserField::About, "x".into()),
            Err(CoreError::WrongKind { .. })
        ));
    }

    #[test]
    fn user_attribute_order_and_optionals() {
        let mut profile = alice();
        let keys: Vec<String> = profile.attributes().keys().map(String::from).collect();
        assert_eq!(keys, vec!["Username", "Email", "Password"]);

        profile.set(UserField::About, "about me".into());
        profile.set(UserField::Avatar, "https://example.com/a.png".into());
        let keys: Vec<String> = profile.attributes().keys().map(String::from).collect();
        assert_eq!(keys, vec!["Username", "Email", "Password", "Avatar", "About"]);
    }

    #[test]
    fn created_at_has_no_subseconds() {
        let node = Node::reply("x".into());
        assert_eq!(node.created_at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn fresh_nodes_get_distinct_ids() {
        let a = Node::reply("x".into());
        let b = Node::reply("x".into());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn kind_names_roundtrip() {
        for kind in [NodeKind::User, NodeKind::Thread, NodeKind::Reply] {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("Post"), None);
    }

    #[test]
    fn body_serde_roundtrip() {
        let node = Node::user(alice());
        let json = serde_json::to_string(&node.body).unwrap();
        let back: NodeBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node.body);
    }
}
