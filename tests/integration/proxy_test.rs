use crate::common::{mock_backend::MockBackend, test_server::TestServer};
use serde_json::Value;

#[tokio::test]
async fn test_get_reaches_backend() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;

    let response = reqwest::get(server.url("/api/master/agents")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body[0]["id"], "a1");
}

#[tokio::test]
async fn test_method_path_query_and_body_are_kept() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;
    let client = reqwest::Client::new();

    let response = client
        .put(server.url("/api/plugins/mcp-servers/7?dry_run=1"))
        .header("content-type", "application/json")
        .body(r#"{"name":"files"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let echoed: Value = response.json().await.unwrap();
    assert_eq!(echoed["method"], "PUT");
    assert_eq!(echoed["path"], "/plugins/mcp-servers/7");
    assert_eq!(echoed["query"], "dry_run=1");
    assert_eq!(echoed["content_type"], "application/json");
    assert_eq!(echoed["body"], r#"{"name":"files"}"#);
}

#[tokio::test]
async fn test_encoded_ask_query_is_forwarded_verbatim() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/master/ask?agent_id=a1&message=Hello%20there%3F"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let echoed: Value = response.json().await.unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["path"], "/master/ask");
    assert_eq!(echoed["query"], "agent_id=a1&message=Hello%20there%3F");
    assert_eq!(echoed["body"], "");
}

#[tokio::test]
async fn test_multipart_content_type_is_kept() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;
    let client = reqwest::Client::new();

    let body = "--XYZ\r\nContent-Disposition: form-data; name=\"trigger_json\"\r\n\r\n{\"name\":\"nightly\"}\r\n--XYZ--\r\n";
    let response = client
        .post(server.url("/api/plugins/triggers"))
        .header("content-type", "multipart/form-data; boundary=XYZ")
        .body(body)
        .send()
        .await
        .unwrap();

    let echoed: Value = response.json().await.unwrap();
    assert_eq!(echoed["content_type"], "multipart/form-data; boundary=XYZ");
    assert_eq!(echoed["body"], body);
}

#[tokio::test]
async fn test_backend_error_status_is_relayed() {
    let backend = MockBackend::start().await;
    let server = TestServer::new(&backend.base_url).await;

    let response = reqwest::get(server.url("/api/broken")).await.unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "boom");
}

#[tokio::test]
async fn test_unreachable_backend_yields_bad_gateway() {
    let server = TestServer::new(&MockBackend::unreachable_url().await).await;

    let response = reqwest::get(server.url("/api/master/agents")).await.unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Backend unreachable"));
}
