//! Common API response wrapper types.
//!
//! [`Envelope`] is the standard body of every successful response: the
//! payload's fields are flattened next to `"success": true`.

use serde::Serialize;

/// Standard success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    /// Always `true`; errors use [`crate::error::ApiError`].
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Envelope {
            success: true,
            payload,
        }
    }
}

/// Payload carrying a single node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdResponse {
    pub id: String,
}

/// Payload with no fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyResponse {}

/// Payload carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
