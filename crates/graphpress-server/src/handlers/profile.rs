//! Profile handlers.

use axum::extract::{Query, State};
use axum::Json;
use tower_sessions::Session;

use crate::error::ApiError;
use crate::identity;
use crate::schema::common::{Envelope, MessageResponse};
use crate::schema::profile::{GetProfileParams, ProfileResponse, SetProfileParams};
use crate::service::profile::fields_set_message;
use crate::service::ProfileUpdate;
use crate::state::AppState;

/// `GET|POST /getProfile?id=..`
pub async fn get_profile(
    State(state): State<AppState>,
    Query(params): Query<GetProfileParams>,
) -> Result<Json<Envelope<ProfileResponse>>, ApiError> {
    let service = state.service.lock().await;
    let profile = service.get_profile(params.id.as_deref())?;
    Ok(Json(Envelope::ok(ProfileResponse { profile })))
}

/// Updates the session user's profile.
///
/// `GET|POST /setProfile?username=..&birthday=..&avatar=..&about=..`
pub async fn set_profile(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SetProfileParams>,
) -> Result<Json<Envelope<MessageResponse>>, ApiError> {
    let token = identity::session_token(&session).await?;
    let mut service = state.service.lock().await;
    let caller = service.resolve_caller(token.as_deref())?;
    let update = ProfileUpdate {
        username: params.username,
        birthday: params.birthday,
        avatar: params.avatar,
        about: params.about,
    };
    let fields = service.set_profile(&caller, &update)?;
    Ok(Json(Envelope::ok(MessageResponse {
        message: fields_set_message(&fields),
    })))
}
