//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the embedding host (a mobile shell, a test
//! harness) is responsible for executing the actual I/O. This separation
//! keeps the client logic deterministic and easy to test, and matches the
//! backend's purely sequential request/response contract.
//!
//! All fields use owned types (`String`, `Vec`) so values can be handed to
//! the host without lifetime concerns.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `SessionManager` and `PostClient` methods. The host executes
/// this request against the network and returns the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Attach a bearer token as the `authorization` header.
    ///
    /// This is the single point where a session token is turned into a wire
    /// credential; every authenticated operation goes through it.
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.headers
            .push(("authorization".to_string(), format!("Bearer {token}")));
        self
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed
/// back to the matching `parse_*` method for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Build a JSON-bodied request from a serializable payload.
pub(crate) fn json_request<T: serde::Serialize>(
    method: HttpMethod,
    path: String,
    payload: &T,
) -> Result<HttpRequest, crate::error::ApiError> {
    let body = serde_json::to_string(payload)
        .map_err(|e| crate::error::ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Deserialize a response body, mapping failures to `Deserialization`.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(
    body: &str,
) -> Result<T, crate::error::ApiError> {
    serde_json::from_str(body).map_err(|e| crate::error::ApiError::Deserialization(e.to_string()))
}
