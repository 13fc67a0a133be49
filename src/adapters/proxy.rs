use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BackendSettings;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            ProxyError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

/// Builds the pooled client shared by forwarding and readiness checks.
pub fn build_client(backend: &BackendSettings) -> Result<reqwest::Client, ProxyError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(backend.connect_timeout_seconds))
        .build()
        .map_err(|e| ProxyError::Client(e.to_string()))
}

#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    backend: BackendSettings,
}

impl ProxyState {
    pub fn new(client: reqwest::Client, backend: BackendSettings) -> Self {
        Self { client, backend }
    }

    /// Full backend URL for an inbound `/api/...` path and query.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        self.backend.url(&backend_path(path, query))
    }
}

/// Strips the `/api` mount prefix and keeps the query string.
pub fn backend_path(path: &str, query: Option<&str>) -> String {
    let rest = path.strip_prefix("/api").unwrap_or(path);
    let rest = if rest.is_empty() { "/" } else { rest };
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", rest, q),
        _ => rest.to_string(),
    }
}

/// Forwards one `/api/*` request to the backend, keeping method, query,
/// content type and body, and relays the backend's status and body.
pub async fn forward(
    State(state): State<ProxyState>,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let target = state.target_url(parts.uri.path(), parts.uri.query());
    let limit = state.backend.max_body_bytes;

    let declared_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_length.is_some_and(|len| len > limit) {
        warn!(method = %parts.method, path = %parts.uri.path(), limit, "Rejected oversized request");
        return Err(ProxyError::BodyTooLarge { limit });
    }

    let body = to_bytes(body, limit).await.map_err(|_| {
        warn!(method = %parts.method, path = %parts.uri.path(), limit, "Rejected oversized request");
        ProxyError::BodyTooLarge { limit }
    })?;

    let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
        .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;

    let mut outbound = state.client.request(method, &target);
    if let Some(content_type) = parts.headers.get(header::CONTENT_TYPE) {
        outbound = outbound.header(reqwest::header::CONTENT_TYPE, content_type.as_bytes());
    }
    if !body.is_empty() {
        outbound = outbound.body(body);
    }

    let upstream = outbound.send().await.map_err(|e| {
        warn!(method = %parts.method, target = %target, error = %e, "Backend request failed");
        ProxyError::Unreachable(e.to_string())
    })?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());
    let bytes = upstream.bytes().await.map_err(|e| {
        warn!(method = %parts.method, target = %target, error = %e, "Backend response interrupted");
        ProxyError::Unreachable(e.to_string())
    })?;

    debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        status = status.as_u16(),
        "Forwarded request"
    );

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_path_strips_mount() {
        assert_eq!(backend_path("/api/master/agents", None), "/master/agents");
        assert_eq!(backend_path("/api/plugins/triggers/7", Some("")), "/plugins/triggers/7");
        assert_eq!(backend_path("/api", None), "/");
    }

    #[test]
    fn test_backend_path_keeps_query() {
        assert_eq!(
            backend_path("/api/master/ask", Some("agent_id=a1&message=Hello%20there")),
            "/master/ask?agent_id=a1&message=Hello%20there"
        );
    }

    #[test]
    fn test_target_url() {
        let state = ProxyState::new(
            reqwest::Client::new(),
            BackendSettings {
                base_url: "http://localhost:8000/".to_string(),
                ..BackendSettings::default()
            },
        );
        assert_eq!(
            state.target_url("/api/plugins/mcp-servers/3/toggle-status", None),
            "http://localhost:8000/plugins/mcp-servers/3/toggle-status"
        );
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(ProxyError::Unreachable("refused".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ProxyError::BodyTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
