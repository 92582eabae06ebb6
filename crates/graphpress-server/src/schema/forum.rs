//! Forum request/response types.
//!
//! Parameters arrive as query strings; every field is optional at the
//! extractor level so that missing input produces the domain's own
//! validation message instead of an extractor rejection.

use graphpress_core::AttributeMap;
use serde::{Deserialize, Serialize};

/// Query parameters of `/startThread`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartThreadParams {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// Query parameters of `/replyThread`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyThreadParams {
    /// Thread id.
    pub id: Option<String>,
    pub message: Option<String>,
}

/// Query parameters of `/getThread`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetThreadParams {
    pub id: Option<String>,
}

/// Response of `/getThreads`.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadSummaryView>,
}

/// One thread in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummaryView {
    pub id: String,
    pub title: String,
    /// Id of the user who started the thread.
    pub author: String,
    /// Creation time in unix seconds, as a string.
    pub timestamp: String,
    /// One entry per reply, oldest first. Not deduplicated.
    pub contributors: Vec<ContributorView>,
}

/// The author of one reply: their id plus their public attributes with
/// lower-cased keys.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorView {
    pub id: String,
    #[serde(flatten)]
    pub attributes: AttributeMap,
}

/// Response of `/getThread`.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    pub title: String,
    /// The opening post followed by every reply, oldest first.
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub author: String,
    pub content: String,
}
