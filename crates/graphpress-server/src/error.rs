//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use graphpress_core::CoreError;
use graphpress_storage::StorageError;

/// Message shown for every internal failure.
pub const INTERNAL_MESSAGE: &str = "internal error";

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A profile update named no field (400).
    #[error("no fields provided: {0}")]
    NoFieldsProvided(String),

    /// No resolvable session identity (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The id resolves to a node of another kind (404).
    #[error("wrong node kind: {0}")]
    WrongNodeKind(String),

    /// The id is malformed or names no user (404).
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store or session failure (500). The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NoFieldsProvided(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::WrongNodeKind(_) | ApiError::InvalidId(_) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::NoFieldsProvided(_) => "NO_FIELDS_PROVIDED",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::WrongNodeKind(_) => "WRONG_NODE_KIND",
            ApiError::InvalidId(_) => "INVALID_ID",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message returned to clients.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::NoFieldsProvided(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::WrongNodeKind(msg)
            | ApiError::InvalidId(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }

        let detail = ApiErrorDetail {
            code: self.code().to_string(),
            message: self.public_message(),
        };
        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NodeNotFound { .. } => ApiError::NotFound(err.to_string()),
            CoreError::WrongKind { .. } => ApiError::WrongNodeKind(err.to_string()),
            CoreError::InvalidId { .. } => ApiError::InvalidId(err.to_string()),
            CoreError::Validation { message } => ApiError::Validation(message.clone()),
            CoreError::IntegrityError { .. } => ApiError::Conflict(err.to_string()),
            CoreError::InvalidEdge { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NodeNotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::WrongKind { .. } => ApiError::WrongNodeKind(err.to_string()),
            StorageError::IntegrityError { .. } => ApiError::Conflict(err.to_string()),
            StorageError::Core(core) => ApiError::from(core),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::Internal(format!("session store: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphpress_core::{NodeId, NodeKind};

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NoFieldsProvided("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::WrongNodeKind("x".into()), StatusCode::NOT_FOUND),
            (ApiError::InvalidId("x".into()), StatusCode::NOT_FOUND),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{:?}", err);
        }
    }

    #[test]
    fn internal_detail_is_hidden() {
        let err = ApiError::Internal("disk I/O error at /var/db".into());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
        assert_eq!(
            ApiError::Validation("Invalid username".into()).public_message(),
            "Invalid username"
        );
    }

    #[test]
    fn storage_errors_map_by_kind() {
        let id = NodeId::generate();
        assert!(matches!(
            ApiError::from(StorageError::NodeNotFound { id }),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(StorageError::WrongKind {
                id,
                expected: NodeKind::Thread,
                found: NodeKind::User,
            }),
            ApiError::WrongNodeKind(_)
        ));
        assert!(matches!(
            ApiError::from(StorageError::Migration("boom".into())),
            ApiError::Internal(_)
        ));
        assert!(matches!(
            ApiError::from(StorageError::Core(CoreError::validation("bad"))),
            ApiError::Validation(msg) if msg == "bad"
        ));
    }
}
