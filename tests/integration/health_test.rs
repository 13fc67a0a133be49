use crate::common::{mock_backend::MockBackend, test_server::TestServer};

#[tokio::test]
async fn test_health_endpoint() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_number());
    assert!(body["version"].is_string());
    assert_eq!(body["backend_url"], backend.base_url);
}

#[tokio::test]
async fn test_ready_when_backend_answers() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;

    let response = reqwest::get(server.url("/health/ready")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_not_ready_when_backend_down() {
    let server = TestServer::new(&MockBackend::unreachable_url().await).await;

    let response = reqwest::get(server.url("/health/ready")).await.unwrap();
    assert_eq!(response.status(), 503);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_health_does_not_need_backend() {
    let server = TestServer::new(&MockBackend::unreachable_url().await).await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), 200);
}
