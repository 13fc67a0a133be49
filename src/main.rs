use agent_studio::cli::Cli;
use agent_studio::config::Settings;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (defaults < file < env < flags)
    let settings = Settings::new_with_cli(&cli)?;

    let level = settings
        .logging
        .max_level()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let host = settings.server.host.clone();
    let port = settings.server.port;
    info!(
        "Starting Agent Studio on {}:{} (backend {})",
        host, port, settings.backend.base_url
    );

    let app = agent_studio::create_app(settings)?;

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
