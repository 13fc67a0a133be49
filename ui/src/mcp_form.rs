//! Cloud/local mode state of the MCP server form
//!
//! The mode only exists in the form. On submit it is folded back into the
//! record: cloud servers keep a URL and an optional api key, local servers
//! carry a launch command in `base_url` and their path as a reserved argument.

use crate::types::{McpServer, McpServerArg, McpTransport, SERVER_PATH_ARG};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionMode {
    #[default]
    Cloud,
    Local,
}

/// Launcher the backend uses for local servers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchCommand {
    Python,
    #[default]
    Uvx,
}

impl LaunchCommand {
    pub const ALL: [LaunchCommand; 2] = [LaunchCommand::Python, LaunchCommand::Uvx];

    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchCommand::Python => "python",
            LaunchCommand::Uvx => "uvx",
        }
    }

    /// Unknown commands fall back to `uvx`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "python" => LaunchCommand::Python,
            _ => LaunchCommand::Uvx,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpForm {
    mode: ConnectionMode,
    cloud_transport: McpTransport,
    command: LaunchCommand,
    server_path: String,
    args: Vec<ArgRow>,
}

impl Default for McpForm {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::Cloud,
            cloud_transport: McpTransport::Sse,
            command: LaunchCommand::Uvx,
            server_path: String::new(),
            args: Vec::new(),
        }
    }
}

impl McpForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form state for editing a stored server.
    pub fn from_server(server: &McpServer) -> Self {
        let args = server
            .args
            .iter()
            .filter(|arg| arg.key != SERVER_PATH_ARG)
            .map(|arg| ArgRow {
                key: arg.key.clone(),
                value: arg.value.clone().unwrap_or_default(),
            })
            .collect();

        if server.transport.is_local() {
            Self {
                mode: ConnectionMode::Local,
                command: LaunchCommand::parse(&server.base_url),
                server_path: server
                    .arg(SERVER_PATH_ARG)
                    .and_then(|arg| arg.value.clone())
                    .unwrap_or_default(),
                args,
                ..Self::default()
            }
        } else {
            Self {
                cloud_transport: server.transport,
                args,
                ..Self::default()
            }
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    /// Switches mode, rebuilding the mode-specific fields.
    pub fn set_mode(&mut self, mode: ConnectionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.cloud_transport = McpTransport::Sse;
        self.command = LaunchCommand::Uvx;
        self.server_path.clear();
    }

    pub fn transport(&self) -> McpTransport {
        match self.mode {
            ConnectionMode::Cloud => self.cloud_transport,
            ConnectionMode::Local => McpTransport::Stdio,
        }
    }

    /// Picks the remote transport. Ignored in local mode.
    pub fn set_cloud_transport(&mut self, transport: McpTransport) {
        if self.mode == ConnectionMode::Cloud && !transport.is_local() {
            self.cloud_transport = transport;
        }
    }

    pub fn command(&self) -> LaunchCommand {
        self.command
    }

    pub fn set_command(&mut self, command: LaunchCommand) {
        self.command = command;
    }

    pub fn server_path(&self) -> &str {
        &self.server_path
    }

    pub fn set_server_path(&mut self, path: impl Into<String>) {
        self.server_path = path.into();
    }

    pub fn args(&self) -> &[ArgRow] {
        &self.args
    }

    pub fn add_arg(&mut self) {
        self.args.push(ArgRow::default());
    }

    pub fn set_arg(&mut self, index: usize, key: impl Into<String>, value: impl Into<String>) {
        if let Some(row) = self.args.get_mut(index) {
            row.key = key.into();
            row.value = value.into();
        }
    }

    pub fn remove_arg(&mut self, index: usize) {
        if index < self.args.len() {
            self.args.remove(index);
        }
    }

    /// Record to submit, built from the edited `base` plus the form state.
    pub fn build(&self, base: &McpServer) -> McpServer {
        let mut args: Vec<McpServerArg> = self
            .args
            .iter()
            .filter(|row| !row.key.trim().is_empty())
            .map(|row| McpServerArg {
                id: None,
                key: row.key.clone(),
                value: if row.value.is_empty() {
                    None
                } else {
                    Some(row.value.clone())
                },
            })
            .collect();

        let mut server = base.clone();
        server.transport = self.transport();
        server.description = base.description.clone().filter(|d| !d.is_empty());
        match self.mode {
            ConnectionMode::Cloud => {
                server.api_key = base.api_key.clone().filter(|key| !key.is_empty());
            }
            ConnectionMode::Local => {
                server.base_url = self.command.as_str().to_string();
                server.api_key = None;
                if !self.server_path.trim().is_empty() {
                    args.push(McpServerArg {
                        id: None,
                        key: SERVER_PATH_ARG.to_string(),
                        value: Some(self.server_path.clone()),
                    });
                }
            }
        }
        server.args = args;
        server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_server() -> McpServer {
        McpServer {
            id: Some("m1".into()),
            name: "files".into(),
            transport: McpTransport::Stdio,
            base_url: "python".into(),
            args: vec![
                McpServerArg {
                    id: Some("x1".into()),
                    key: SERVER_PATH_ARG.into(),
                    value: Some("/srv/files.py".into()),
                },
                McpServerArg {
                    id: Some("x2".into()),
                    key: "root".into(),
                    value: Some("/data".into()),
                },
            ],
            ..McpServer::default()
        }
    }

    #[test]
    fn test_loading_stdio_server_selects_local_mode() {
        let form = McpForm::from_server(&local_server());
        assert_eq!(form.mode(), ConnectionMode::Local);
        assert_eq!(form.command(), LaunchCommand::Python);
        assert_eq!(form.server_path(), "/srv/files.py");
        assert_eq!(form.args().len(), 1);
        assert_eq!(form.args()[0].key, "root");

        let remote = McpServer {
            transport: McpTransport::StreamableHttp,
            ..McpServer::default()
        };
        let form = McpForm::from_server(&remote);
        assert_eq!(form.mode(), ConnectionMode::Cloud);
        assert_eq!(form.transport(), McpTransport::StreamableHttp);
    }

    #[test]
    fn test_unknown_command_falls_back_to_uvx() {
        let mut server = local_server();
        server.base_url = "node".into();
        assert_eq!(McpForm::from_server(&server).command(), LaunchCommand::Uvx);
    }

    #[test]
    fn test_local_build_injects_server_path() {
        let mut form = McpForm::new();
        form.set_mode(ConnectionMode::Local);
        form.set_server_path("/srv/tool.py");
        let base = McpServer {
            name: "tool".into(),
            base_url: "https://ignored".into(),
            api_key: Some("secret".into()),
            ..McpServer::default()
        };

        let server = form.build(&base);
        assert_eq!(server.transport, McpTransport::Stdio);
        assert_eq!(server.base_url, "uvx");
        assert_eq!(server.api_key, None);
        assert_eq!(
            server.arg(SERVER_PATH_ARG).and_then(|a| a.value.as_deref()),
            Some("/srv/tool.py")
        );
    }

    #[test]
    fn test_mode_round_trip_drops_server_path() {
        let mut form = McpForm::new();
        form.set_mode(ConnectionMode::Local);
        form.set_server_path("/srv/tool.py");
        form.set_mode(ConnectionMode::Cloud);
        form.set_mode(ConnectionMode::Local);

        let server = form.build(&McpServer::default());
        assert!(server.arg(SERVER_PATH_ARG).is_none());
        assert!(server.args.is_empty());
    }

    #[test]
    fn test_cloud_build_cleans_args_and_blank_key() {
        let mut form = McpForm::new();
        form.set_cloud_transport(McpTransport::StreamableHttp);
        form.add_arg();
        form.set_arg(0, "region", "");
        form.add_arg();
        form.set_arg(1, "  ", "dropped");
        let base = McpServer {
            base_url: "https://tools.example.com/mcp".into(),
            api_key: Some(String::new()),
            ..McpServer::default()
        };

        let server = form.build(&base);
        assert_eq!(server.transport, McpTransport::StreamableHttp);
        assert_eq!(server.base_url, "https://tools.example.com/mcp");
        assert_eq!(server.api_key, None);
        assert_eq!(
            server.args,
            vec![McpServerArg {
                id: None,
                key: "region".into(),
                value: None
            }]
        );
    }
}
