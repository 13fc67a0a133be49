use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

/// Stand-in for the agent backend. Every unknown path echoes what it received.
pub struct MockBackend {
    pub base_url: String,
}

impl MockBackend {
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/master/agents", get(list_agents))
            .route("/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .fallback(echo);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockBackend {
            base_url: format!("http://{}", addr),
        }
    }

    /// A URL on which nothing is listening.
    pub async fn unreachable_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}

async fn list_agents() -> Json<Value> {
    Json(json!([{ "id": "a1", "name": "Support", "slug": "support" }]))
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "content_type": headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&body),
    }))
}
