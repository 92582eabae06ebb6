//! Forum handlers (start, reply, list, read).

use axum::extract::{Query, State};
use axum::Json;
use tower_sessions::Session;

use crate::error::ApiError;
use crate::identity;
use crate::schema::common::{Envelope, IdResponse};
use crate::schema::forum::{
    GetThreadParams, ReplyThreadParams, StartThreadParams, ThreadListResponse, ThreadView,
};
use crate::state::AppState;

/// Starts a thread as the session user.
///
/// `GET|POST /startThread?title=..&message=..`
pub async fn start_thread(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<StartThreadParams>,
) -> Result<Json<Envelope<IdResponse>>, ApiError> {
    let token = identity::session_token(&session).await?;
    let mut service = state.service.lock().await;
    let caller = service.resolve_caller(token.as_deref())?;
    let id = service.start_thread(&caller, params.title.as_deref(), params.message.as_deref())?;
    Ok(Json(Envelope::ok(IdResponse { id: id.to_string() })))
}

/// Replies to a thread as the session user.
///
/// `GET|POST /replyThread?id=..&message=..`
pub async fn reply_thread(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ReplyThreadParams>,
) -> Result<Json<Envelope<IdResponse>>, ApiError> {
    let token = identity::session_token(&session).await?;
    let mut service = state.service.lock().await;
    let caller = service.resolve_caller(token.as_deref())?;
    let id = service.reply_thread(&caller, params.id.as_deref(), params.message.as_deref())?;
    Ok(Json(Envelope::ok(IdResponse { id: id.to_string() })))
}

/// Lists every thread with its contributors.
///
/// `GET|POST /getThreads`
pub async fn get_threads(
    State(state): State<AppState>,
) -> Result<Json<Envelope<ThreadListResponse>>, ApiError> {
    let service = state.service.lock().await;
    let threads = service.list_threads()?;
    Ok(Json(Envelope::ok(ThreadListResponse { threads })))
}

/// Returns one thread with its messages.
///
/// `GET|POST /getThread?id=..`
pub async fn get_thread(
    State(state): State<AppState>,
    Query(params): Query<GetThreadParams>,
) -> Result<Json<Envelope<ThreadView>>, ApiError> {
    let service = state.service.lock().await;
    let view = service.get_thread(params.id.as_deref())?;
    Ok(Json(Envelope::ok(view)))
}
