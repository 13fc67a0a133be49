use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::Cli;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where `/api/*` calls are forwarded to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout_seconds: u64,
    pub max_body_bytes: usize,
}

impl BackendSettings {
    /// Joins a backend-relative path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout_seconds: 5,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl LoggingSettings {
    pub fn max_level(&self) -> Option<tracing::Level> {
        self.level.parse().ok()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            backend: BackendSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load_file(&cli.config)?;

        // CLI > env vars > config file > defaults
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file without CLI overrides. A missing file yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let settings = Self::load_file(path.as_ref())?;
        settings.validate()?;
        Ok(settings)
    }

    fn load_file(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
            .set_default("backend.connect_timeout_seconds", 5)?
            .set_default("backend.max_body_bytes", DEFAULT_MAX_BODY_BYTES as i64)?
            .set_default("logging.level", "info")?
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }

        if cli.has_backend_overrides() {
            if let Some(url) = &cli.backend_url {
                self.backend.base_url = url.clone();
            }
            if let Some(timeout) = cli.backend_timeout {
                self.backend.connect_timeout_seconds = timeout;
            }
            if let Some(limit) = cli.max_body_bytes {
                self.backend.max_body_bytes = limit;
            }
        }
    }
}
