//! Account handlers (signup, login, logout, whoami).
//!
//! These are the only handlers that write to the session.

use axum::extract::{Query, State};
use axum::Json;
use tower_sessions::Session;

use crate::error::ApiError;
use crate::identity;
use crate::schema::account::{LoginParams, SignupParams};
use crate::schema::common::{EmptyResponse, Envelope, IdResponse};
use crate::state::AppState;

/// Creates a user and logs them in.
///
/// `GET|POST /signup?username=..&email=..&password=..`
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SignupParams>,
) -> Result<Json<Envelope<IdResponse>>, ApiError> {
    let id = state.service.lock().await.signup(
        params.username.as_deref(),
        params.email.as_deref(),
        params.password.as_deref(),
    )?;
    identity::remember(&session, id).await?;
    Ok(Json(Envelope::ok(IdResponse { id: id.to_string() })))
}

/// `GET|POST /login?username=..&password=..`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LoginParams>,
) -> Result<Json<Envelope<IdResponse>>, ApiError> {
    let id = state
        .service
        .lock()
        .await
        .login(params.username.as_deref(), params.password.as_deref())?;
    identity::remember(&session, id).await?;
    Ok(Json(Envelope::ok(IdResponse { id: id.to_string() })))
}

/// `GET|POST /logout`
pub async fn logout(session: Session) -> Result<Json<Envelope<EmptyResponse>>, ApiError> {
    identity::forget(&session).await?;
    Ok(Json(Envelope::ok(EmptyResponse::default())))
}

/// `GET|POST /whoami`
pub async fn whoami(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Envelope<IdResponse>>, ApiError> {
    let token = identity::session_token(&session).await?;
    let service = state.service.lock().await;
    let caller = service.resolve_caller(token.as_deref())?;
    Ok(Json(Envelope::ok(IdResponse {
        id: service.whoami(&caller).to_string(),
    })))
}
