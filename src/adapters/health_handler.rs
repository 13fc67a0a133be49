use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::BackendSettings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub backend_url: String,
}

pub struct HealthHandler {
    backend: BackendSettings,
    client: reqwest::Client,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(backend: BackendSettings, client: reqwest::Client) -> Self {
        Self {
            backend,
            client,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if the host is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            backend_url: self.backend.base_url.clone(),
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 200 only when the backend answers the agent listing
    pub async fn ready(&self) -> impl IntoResponse {
        let url = self.backend.url("/master/agents");
        let outcome = self.client.get(&url).send().await;

        match outcome {
            Ok(response) if response.status().is_success() => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "ready",
                    "message": "Backend is reachable"
                })),
            ),
            Ok(response) => {
                warn!(url = %url, status = response.status().as_u16(), "Backend not ready");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({
                        "status": "not_ready",
                        "message": format!("Backend answered with status {}", response.status().as_u16())
                    })),
                )
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Backend unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({
                        "status": "not_ready",
                        "message": "Backend is unreachable"
                    })),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler_for(base_url: &str) -> HealthHandler {
        let backend = BackendSettings {
            base_url: base_url.to_string(),
            ..BackendSettings::default()
        };
        HealthHandler::new(backend, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let handler = handler_for("http://localhost:8000");
        let response = handler.health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_backend() {
        // Nothing listens on port 9 locally
        let handler = handler_for("http://127.0.0.1:9");
        let response = handler.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
