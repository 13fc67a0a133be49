use thiserror::Error;

use crate::config::{BackendSettings, LoggingSettings, ServerSettings, Settings};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_server(&settings.server));
        errors.extend(Self::validate_backend(&settings.backend));
        errors.extend(Self::validate_logging(&settings.logging));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if server.host.trim().is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::invalid(
                "server.port",
                "Port must be greater than 0",
            ));
        }

        errors
    }

    fn validate_backend(backend: &BackendSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if backend.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("backend.base_url".to_string()));
        } else {
            match reqwest::Url::parse(&backend.base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
                Ok(url) => errors.push(ValidationError::invalid(
                    "backend.base_url",
                    format!("expected an http(s) URL with a host, got scheme '{}'", url.scheme()),
                )),
                Err(e) => errors.push(ValidationError::invalid("backend.base_url", e.to_string())),
            }
        }

        if backend.connect_timeout_seconds == 0 {
            errors.push(ValidationError::invalid(
                "backend.connect_timeout_seconds",
                "Timeout must be greater than 0",
            ));
        }

        if backend.max_body_bytes == 0 {
            errors.push(ValidationError::invalid(
                "backend.max_body_bytes",
                "Body limit must be greater than 0",
            ));
        }

        errors
    }

    fn validate_logging(logging: &LoggingSettings) -> Vec<ValidationError> {
        let level = logging.level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Vec::new()
        } else {
            vec![ValidationError::invalid(
                "logging.level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            )]
        }
    }
}
