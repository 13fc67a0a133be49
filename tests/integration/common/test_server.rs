use agent_studio::config::Settings;

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    pub async fn new(backend_url: &str) -> Self {
        let mut settings = Settings::default();
        settings.backend.base_url = backend_url.to_string();
        settings.backend.connect_timeout_seconds = 1;

        let app = agent_studio::create_app(settings).unwrap();

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
