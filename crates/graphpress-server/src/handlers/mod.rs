//! HTTP handler modules for the graphpress API.
//!
//! Each sub-module implements thin handlers that read query parameters,
//! acquire the service lock, resolve the caller where needed, delegate to
//! [`GraphService`](crate::service::GraphService), and return JSON
//! responses. No domain logic lives in handlers.

pub mod account;
pub mod forum;
pub mod health;
pub mod profile;
