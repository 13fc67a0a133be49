use clap::Parser;
use std::path::PathBuf;

/// Agent Studio - admin console host for agents, knowledge bases, MCP servers and triggers
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-studio", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "AGENT_STUDIO_CONFIG", default_value = "agent-studio.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "AGENT_STUDIO_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "AGENT_STUDIO_PORT")]
    pub port: Option<u16>,

    /// Base URL of the agent backend that `/api/*` is forwarded to
    #[arg(long, env = "AGENT_STUDIO_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Connect timeout for backend requests in seconds
    #[arg(long, env = "AGENT_STUDIO_BACKEND_TIMEOUT")]
    pub backend_timeout: Option<u64>,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "AGENT_STUDIO_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AGENT_STUDIO_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Check if any backend option is provided via CLI or environment
    pub fn has_backend_overrides(&self) -> bool {
        self.backend_url.is_some() || self.backend_timeout.is_some() || self.max_body_bytes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["agent-studio"]);
        assert_eq!(cli.config, PathBuf::from("agent-studio.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.backend_url.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "agent-studio",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--backend-url",
            "http://agents.internal:9000",
            "--backend-timeout",
            "10",
            "--max-body-bytes",
            "1024",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.backend_url, Some("http://agents.internal:9000".to_string()));
        assert_eq!(cli.backend_timeout, Some(10));
        assert_eq!(cli.max_body_bytes, Some(1024));
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_has_backend_overrides() {
        let cli = Cli::parse_from(["agent-studio"]);
        assert!(!cli.has_backend_overrides());

        let cli = Cli::parse_from(["agent-studio", "--backend-url", "http://localhost:9000"]);
        assert!(cli.has_backend_overrides());
    }
}
