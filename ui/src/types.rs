//! Shared types for the Agent Studio console
//!
//! These types mirror the records owned by the agent backend. Ids are absent
//! on drafts and omitted from the JSON until the backend assigns one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_MAX_TOKENS: u32 = 4048;
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Reserved MCP argument key carrying the local server path.
pub const SERVER_PATH_ARG: &str = "server_path";

/// Active/inactive flag shared by every record kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
        }
    }
}

impl From<String> for RecordStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "inactive" => RecordStatus::Inactive,
            _ => RecordStatus::Active,
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Accessibility {
    #[default]
    Public,
    Private,
}

impl Accessibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Private => "private",
        }
    }
}

impl From<String> for Accessibility {
    fn from(s: String) -> Self {
        match s.as_str() {
            "private" => Accessibility::Private,
            _ => Accessibility::Public,
        }
    }
}

/// How the backend reaches an MCP server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum McpTransport {
    /// Local process launched by the backend
    Stdio,
    #[default]
    Sse,
    StreamableHttp,
}

impl McpTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpTransport::Stdio => "stdio",
            McpTransport::Sse => "sse",
            McpTransport::StreamableHttp => "streamable_http",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            McpTransport::Stdio => "stdio",
            McpTransport::Sse => "SSE",
            McpTransport::StreamableHttp => "Streamable HTTP",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, McpTransport::Stdio)
    }
}

impl From<String> for McpTransport {
    fn from(s: String) -> Self {
        match s.as_str() {
            "stdio" => McpTransport::Stdio,
            "streamable_http" => McpTransport::StreamableHttp,
            _ => McpTransport::Sse,
        }
    }
}

/// Agent definition managed under `/master/agents`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Agent {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_key: String,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default, deserialize_with = "null_as_default")]
    pub knowledgebase_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mcp_server_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_ids: Vec<String>,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            model: String::new(),
            instructions: String::new(),
            base_url: String::new(),
            api_key: String::new(),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            status: RecordStatus::Active,
            accessibility: Accessibility::Public,
            knowledgebase_ids: Vec::new(),
            mcp_server_ids: Vec::new(),
            trigger_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KnowledgeBase {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default)]
    pub status: RecordStatus,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            embedding_model: default_embedding_model(),
            status: RecordStatus::Active,
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

/// Uploaded source file of a knowledge base. Read-only in the console.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "opt_id")]
    pub knowledgebase_id: Option<String>,
    #[serde(default)]
    pub file_path: String,
}

/// One item of `GET /plugins/knowledgebases`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KnowledgeBaseEntry {
    pub knowledgebase: KnowledgeBase,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct McpServerArg {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct McpServer {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub transport: McpTransport,
    /// URL for remote transports, launch command for stdio
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<McpServerArg>,
}

impl McpServer {
    pub fn arg(&self, key: &str) -> Option<&McpServerArg> {
        self.args.iter().find(|arg| arg.key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Trigger {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub trigger_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Canned question offered as a shortcut in the chat tester
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SuggestionPrompt {
    // Writes carry only the title and body; the path names the prompt and agent
    #[serde(default, deserialize_with = "opt_id", skip_serializing)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id", skip_serializing)]
    pub master_agent_id: Option<String>,
    pub prompt_title: String,
    pub prompt: String,
}

/// Body of suggestion prompt writes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    pub prompt_title: String,
    pub prompt: String,
}

/// Token accounting attached to an assistant reply
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TokenUsage {
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: Option<u64>,
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    pub fn is_empty(&self) -> bool {
        self.input_tokens.is_none() && self.output_tokens.is_none() && self.total_tokens.is_none()
    }
}

/// Accepts ids sent either as strings or as numbers.
fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_draft_omits_id() {
        let json = serde_json::to_value(Agent::default()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["max_tokens"], 4048);
        assert_eq!(json["status"], "active");
        assert_eq!(json["accessibility"], "public");
    }

    #[test]
    fn test_agent_tolerates_nulls_and_numeric_ids() {
        let agent: Agent = serde_json::from_value(json!({
            "id": 7,
            "name": "Support",
            "slug": "support",
            "model": "gpt-4o",
            "instructions": null,
            "knowledgebase_ids": null,
            "status": "inactive",
            "accessibility": "private"
        }))
        .unwrap();

        assert_eq!(agent.id.as_deref(), Some("7"));
        assert_eq!(agent.instructions, "");
        assert!(agent.knowledgebase_ids.is_empty());
        assert_eq!(agent.status, RecordStatus::Inactive);
        assert_eq!(agent.accessibility, Accessibility::Private);
        assert_eq!(agent.max_tokens, None);
    }

    #[test]
    fn test_mcp_transport_wire_names() {
        let server: McpServer = serde_json::from_value(json!({
            "id": "m1",
            "name": "files",
            "transport": "streamable_http",
            "base_url": "https://tools.example.com/mcp",
            "status": "active",
            "args": [{"id": "a1", "key": "region", "value": "eu"}]
        }))
        .unwrap();
        assert_eq!(server.transport, McpTransport::StreamableHttp);
        assert_eq!(server.arg("region").and_then(|a| a.value.as_deref()), Some("eu"));

        let out = serde_json::to_value(&server).unwrap();
        assert_eq!(out["transport"], "streamable_http");
        assert!(out.get("api_key").is_none());
    }

    #[test]
    fn test_knowledge_base_entry_shape() {
        let entry: KnowledgeBaseEntry = serde_json::from_value(json!({
            "knowledgebase": {"id": "kb1", "name": "Docs", "slug": "docs", "status": "active"},
            "documents": [{"id": "d1", "name": "guide.pdf", "knowledgebase_id": "kb1", "file_path": "/data/guide.pdf"}]
        }))
        .unwrap();
        assert_eq!(entry.knowledgebase.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(entry.documents.len(), 1);
    }

    #[test]
    fn test_suggestion_prompt_writes_only_text() {
        let prompt = SuggestionPrompt {
            id: Some("p1".into()),
            master_agent_id: Some("a1".into()),
            prompt_title: "Greet".into(),
            prompt: "Say hello".into(),
        };
        assert_eq!(
            serde_json::to_value(&prompt).unwrap(),
            json!({"prompt_title": "Greet", "prompt": "Say hello"})
        );
    }
}
