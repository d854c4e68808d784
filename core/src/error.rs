//! Error types for the blog API client.
//!
//! # Design
//! The taxonomy distinguishes the failures callers actually branch on:
//! rejected credentials (`Auth`), insufficient role or non-ownership
//! (`Authorization`), and missing resources (`NotFound`) each get a
//! dedicated variant; every other non-2xx lands in `Http` with the raw
//! status and body for debugging. `Network` is produced by the executing
//! host when no response arrived at all. Nothing is retried automatically.
//!
//! Backend error bodies are `{"message": "..."}"`; when present that message
//! is surfaced to the caller, else a generic fallback.

use thiserror::Error;

/// Errors returned by `SessionManager` and `PostClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A client-side input check failed, or the backend rejected the input
    /// (e.g. registration with an already-taken email).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Credentials were rejected, or the token is missing or expired (401).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The caller's role or ownership is insufficient for the operation (403).
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The server returned 404 — the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status not covered by another variant.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was received. Produced by the
    /// executing host, never by the parse methods.
    #[error("network error: {0}")]
    Network(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Reading or writing the persisted session failed.
    #[error("session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Map a non-success status code to the matching variant, pulling the
    /// backend's `{"message": ...}` out of the body when it carries one.
    pub(crate) fn from_status(status: u16, body: &str) -> ApiError {
        match status {
            401 => ApiError::Auth(backend_message(body, "invalid or expired credentials")),
            403 => ApiError::Authorization(backend_message(body, "insufficient rights")),
            404 => ApiError::NotFound,
            400 | 409 | 422 => ApiError::Validation(backend_message(body, "invalid input")),
            _ => ApiError::Http {
                status,
                body: body.to_string(),
            },
        }
    }
}

/// Require the expected success status, mapping anything else to the
/// appropriate `ApiError` variant.
pub(crate) fn check_status(
    response: &crate::http::HttpResponse,
    expected: u16,
) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, &response.body))
}

/// Extract the backend's error message, falling back to a generic string.
fn backend_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| fallback.to_string())
}
