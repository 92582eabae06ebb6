//! Router assembly for the graphpress HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with the
//! session, CORS and tracing middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::handlers;
use crate::identity::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Every route except `/health` answers both GET and POST, reading its
/// parameters from the query string. Sessions live in process memory and
/// are lost on restart.
pub fn build_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true);

    Router::new()
        // Account
        .route(
            "/signup",
            get(handlers::account::signup).post(handlers::account::signup),
        )
        .route(
            "/login",
            get(handlers::account::login).post(handlers::account::login),
        )
        .route(
            "/logout",
            get(handlers::account::logout).post(handlers::account::logout),
        )
        .route(
            "/whoami",
            get(handlers::account::whoami).post(handlers::account::whoami),
        )
        // Profile
        .route(
            "/getProfile",
            get(handlers::profile::get_profile).post(handlers::profile::get_profile),
        )
        .route(
            "/setProfile",
            get(handlers::profile::set_profile).post(handlers::profile::set_profile),
        )
        // Forum
        .route(
            "/startThread",
            get(handlers::forum::start_thread).post(handlers::forum::start_thread),
        )
        .route(
            "/replyThread",
            get(handlers::forum::reply_thread).post(handlers::forum::reply_thread),
        )
        .route(
            "/getThreads",
            get(handlers::forum::get_threads).post(handlers::forum::get_threads),
        )
        .route(
            "/getThread",
            get(handlers::forum::get_thread).post(handlers::forum::get_thread),
        )
        .route("/health", get(handlers::health::health))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
