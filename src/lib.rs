//! # Agent Studio
//!
//! Host process for the Agent Studio console. It serves the compiled Leptos
//! console from `ui/dist` and forwards every `/api/*` call to the agent backend
//! that owns agents, knowledge bases, MCP servers, triggers and suggestion prompts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_studio::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_file("agent-studio.toml")?;
//!     let _app = agent_studio::create_app(settings)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Routes
//!
//! - `GET /health`, `GET /health/ready`
//! - `ANY /api/*path` forwarded to `backend.base_url`
//! - everything else serves the console with SPA fallback

pub mod adapters;
pub mod cli;
pub mod config;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::proxy::{self, ProxyError, ProxyState};
use crate::adapters::ui_handler::UIHandler;
use crate::config::Settings;
use axum::{routing::{any, get}, Router};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
///
/// Fails only when the forwarding client cannot be built.
pub fn create_app(settings: Settings) -> Result<Router, ProxyError> {
    let client = proxy::build_client(&settings.backend)?;
    let health_handler = Arc::new(HealthHandler::new(settings.backend.clone(), client.clone()));
    let proxy_state = ProxyState::new(client, settings.backend);

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }));

    let api_router = Router::new()
        .route("/api/*path", any(proxy::forward))
        .with_state(proxy_state);

    let router = health_router
        .merge(api_router)
        .fallback(UIHandler::serve);

    Ok(router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    ))
}
