//! Forum operations: start and reply to threads, list and read them.
//!
//! Authorship is never stored on a thread or reply. It is found by walking
//! the single incoming Start (thread) or Reply (reply) edge back to a user,
//! and thread membership is the reply's BelongsTo edge.

use graphpress_core::validation::is_valid_title;
use graphpress_core::{EdgeKind, NewEdge, Node, NodeId, NodeKind};
use graphpress_storage::StorageError;

use super::{is_blank, GraphService};
use crate::error::ApiError;
use crate::identity::Caller;
use crate::schema::forum::{ContributorView, MessageView, ThreadSummaryView, ThreadView};

const START_REQUIRED: &str = "Title (up to 80 chars) and Message are required.";
const REPLY_REQUIRED: &str = "Thread ID and Message are required.";
const REPLY_NOT_THREAD: &str = "Given ID is not associated with a forum thread.";
const THREAD_ID_REQUIRED: &str = "Thread ID required.";
const NOT_A_THREAD: &str = "Not a Thread";

impl GraphService {
    /// Creates a thread authored by `caller`.
    pub fn start_thread(
        &mut self,
        caller: &Caller,
        title: Option<&str>,
        message: Option<&str>,
    ) -> Result<NodeId, ApiError> {
        let (title, message) = match (title, message) {
            (Some(title), Some(message))
                if !is_blank(title) && !is_blank(message) && is_valid_title(title) =>
            {
                (title, message)
            }
            _ => return Err(ApiError::Validation(START_REQUIRED.to_string())),
        };

        let thread = Node::thread(title.to_string(), message.to_string());
        let thread_id = thread.id;
        self.store.insert_subgraph(
            thread,
            &[NewEdge::new(caller.user_id(), thread_id, EdgeKind::Start)],
        )?;
        tracing::info!(thread = %thread_id, author = %caller.user_id(), "thread started");
        Ok(thread_id)
    }

    /// Adds a reply by `caller` to the thread named by `thread_id`.
    pub fn reply_thread(
        &mut self,
        caller: &Caller,
        thread_id: Option<&str>,
        message: Option<&str>,
    ) -> Result<NodeId, ApiError> {
        let (thread_id, message) = match (thread_id, message) {
            (Some(id), Some(message)) if !is_blank(id) && !is_blank(message) => {
                (id, message)
            }
            _ => return Err(ApiError::Validation(REPLY_REQUIRED.to_string())),
        };
        let thread = self.lookup_thread(thread_id, REPLY_NOT_THREAD)?;

        let reply = Node::reply(message.to_string());
        let reply_id = reply.id;
        self.store.insert_subgraph(
            reply,
            &[
                NewEdge::new(caller.user_id(), reply_id, EdgeKind::Reply),
                NewEdge::new(reply_id, thread.id, EdgeKind::BelongsTo),
            ],
        )?;
        tracing::info!(reply = %reply_id, thread = %thread.id, "reply added");
        Ok(reply_id)
    }

    /// Every thread, in creation order, with its contributors.
    pub fn list_threads(&self) -> Result<Vec<ThreadSummaryView>, ApiError> {
        self.store
            .nodes_of_kind(NodeKind::Thread)?
            .iter()
            .map(|thread| self.summarize_thread(thread))
            .collect()
    }

    /// A thread's title and its messages, opening post first.
    pub fn get_thread(&self, thread_id: Option<&str>) -> Result<ThreadView, ApiError> {
        let thread_id = match thread_id {
            Some(id) if !is_blank(id) => id,
            _ => return Err(ApiError::Validation(THREAD_ID_REQUIRED.to_string())),
        };
        let thread = self.lookup_thread(thread_id, NOT_A_THREAD)?;
        let body = thread.as_thread()?;

        let mut messages = vec![MessageView {
            author: self.thread_author(thread.id)?.to_string(),
            content: body.content.clone(),
        }];
        for reply_id in self.thread_replies(thread.id)? {
            let reply = self.store.get_node(reply_id)?;
            messages.push(MessageView {
                author: self.reply_author(reply_id)?.to_string(),
                content: reply.as_reply()?.content.clone(),
            });
        }

        Ok(ThreadView {
            title: body.title.clone(),
            messages,
        })
    }

    // -----------------------------------------------------------------------
    // Traversal helpers
    // -----------------------------------------------------------------------

    /// Resolves `raw` to a Thread node. Unknown ids are `NotFound`, ids of
    /// other kinds `WrongNodeKind`; both carry `message`.
    fn lookup_thread(&self, raw: &str, message: &str) -> Result<Node, ApiError> {
        let id = NodeId::parse(raw.trim()).map_err(|_| ApiError::NotFound(message.to_string()))?;
        let node = match self.store.get_node(id) {
            Ok(node) => node,
            Err(StorageError::NodeNotFound { .. }) => {
                return Err(ApiError::NotFound(message.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        if node.kind() != NodeKind::Thread {
            return Err(ApiError::WrongNodeKind(message.to_string()));
        }
        Ok(node)
    }

    fn thread_author(&self, thread: NodeId) -> Result<NodeId, ApiError> {
        Ok(self.single_in_edge(thread, EdgeKind::Start)?.source)
    }

    fn reply_author(&self, reply: NodeId) -> Result<NodeId, ApiError> {
        Ok(self.single_in_edge(reply, EdgeKind::Reply)?.source)
    }

    /// Replies of `thread` in store order.
    fn thread_replies(&self, thread: NodeId) -> Result<Vec<NodeId>, ApiError> {
        Ok(self
            .store
            .in_edges(thread, EdgeKind::BelongsTo)?
            .into_iter()
            .map(|edge| edge.source)
            .collect())
    }

    fn summarize_thread(&self, thread: &Node) -> Result<ThreadSummaryView, ApiError> {
        let body = thread.as_thread()?;

        let mut contributors = Vec::new();
        for reply_id in self.thread_replies(thread.id)? {
            let author = self.reply_author(reply_id)?;
            let user = self.store.get_node(author)?;
            contributors.push(ContributorView {
                id: author.to_string(),
                attributes: user.attributes().redacted().with_lowercase_keys(),
            });
        }

        Ok(ThreadSummaryView {
            id: thread.id.to_string(),
            title: body.title.clone(),
            author: self.thread_author(thread.id)?.to_string(),
            timestamp: thread.created_at.timestamp().to_string(),
            contributors,
        })
    }
}
