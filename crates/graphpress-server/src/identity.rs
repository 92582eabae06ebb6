//! Identity resolution: session cookie to [`Caller`].
//!
//! The server-side session (tower-sessions, cookie `graphpress-session`)
//! stores the authenticated user's id under [`SESSION_USER_KEY`]. Handlers
//! read it with [`session_token`] and turn it into a [`Caller`] with
//! [`GraphService::resolve_caller`] before calling any mutating service
//! operation, so domain code never looks up identity on its own.

use graphpress_core::{NodeId, NodeKind};
use graphpress_storage::StorageError;
use tower_sessions::Session;

use crate::error::ApiError;
use crate::service::GraphService;

/// Session key holding the user id.
pub const SESSION_USER_KEY: &str = "id";

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "graphpress-session";

const UNAUTHENTICATED_MESSAGE: &str = "You must be logged in to use this functionality.";

/// An authenticated user, resolved from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: NodeId,
}

impl Caller {
    pub(crate) fn new(user_id: NodeId) -> Self {
        Caller { user_id }
    }

    pub fn user_id(&self) -> NodeId {
        self.user_id
    }
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthenticated(UNAUTHENTICATED_MESSAGE.to_string())
}

impl GraphService {
    /// Maps a session token to a [`Caller`].
    ///
    /// A missing or malformed token, or one naming a node that is not an
    /// existing User, is [`ApiError::Unauthenticated`].
    pub fn resolve_caller(&self, token: Option<&str>) -> Result<Caller, ApiError> {
        let token = token.ok_or_else(unauthenticated)?;
        let user_id = NodeId::parse(token).map_err(|_| unauthenticated())?;
        match self.store().get_node(user_id) {
            Ok(node) if node.kind() == NodeKind::User => Ok(Caller::new(user_id)),
            Ok(_) | Err(StorageError::NodeNotFound { .. }) => {
                tracing::debug!(%user_id, "session names no user");
                Err(unauthenticated())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads the raw identity token of the current request.
///
/// Handlers pass it to [`GraphService::resolve_caller`] once they hold the
/// service lock.
pub async fn session_token(session: &Session) -> Result<Option<String>, ApiError> {
    Ok(session.get(SESSION_USER_KEY).await?)
}

/// Binds `user_id` to the session, rotating the session id first.
pub async fn remember(session: &Session, user_id: NodeId) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user_id.to_string()).await?;
    Ok(())
}

/// Drops the session identity.
pub async fn forget(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}
