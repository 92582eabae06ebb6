//! HTTP/JSON API server for the graphpress forum.
//!
//! Users, threads and replies live in a typed social graph; this crate
//! resolves session identity, runs the forum, profile and account
//! operations against a [`graphpress_storage::GraphStore`], and serves them
//! over axum.

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
