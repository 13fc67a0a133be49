//! API client for the agent backend
//!
//! Paths are relative to the backend root; in the browser they are sent
//! through the console host under [`API_BASE`].

use crate::editor::Editable;
use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, BrowserTransport, Method, Part, RequestBody, Transport, UploadFile};
use crate::types::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

pub const API_BASE: &str = "/api";

pub const AGENTS: &str = "/master/agents";
pub const KNOWLEDGE_BASES: &str = "/plugins/knowledgebases";
pub const MCP_SERVERS: &str = "/plugins/mcp-servers";
pub const TRIGGERS: &str = "/plugins/triggers";
const ASK: &str = "/master/ask";

/// Collection path of one agent's suggestion prompts
pub fn suggestion_prompts_path(agent_id: &str) -> String {
    format!("{}/{}/suggestion-prompts", AGENTS, encode(agent_id))
}

/// How a resource is written to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    /// Multipart form with the record serialized into the named field
    Multipart(&'static str),
}

/// A record kind the backend exposes as a REST collection.
pub trait Resource: Editable + Serialize + DeserializeOwned + 'static {
    /// Shape of one item in the collection's list response
    type Listed: Clone + PartialEq + DeserializeOwned + 'static;

    /// Human-readable name used in messages
    const KIND: &'static str;
    /// Optional plugin collections degrade to "unavailable" instead of failing
    const OPTIONAL: bool;
    const ENCODING: Encoding;
    const FILES_REQUIRED_ON_CREATE: bool = false;

    fn listed_id(item: &Self::Listed) -> Option<&str>;

    /// Editable record inside a listed item
    fn from_listed(item: &Self::Listed) -> Self;

    /// Parses the body returned by a create call.
    fn from_created(body: serde_json::Value) -> Result<Self, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Resource for Agent {
    type Listed = Agent;
    const KIND: &'static str = "agent";
    const OPTIONAL: bool = false;
    const ENCODING: Encoding = Encoding::Multipart("agent_json");

    fn listed_id(item: &Agent) -> Option<&str> {
        item.id.as_deref()
    }

    fn from_listed(item: &Agent) -> Self {
        item.clone()
    }
}

impl Resource for KnowledgeBase {
    type Listed = KnowledgeBaseEntry;
    const KIND: &'static str = "knowledge base";
    const OPTIONAL: bool = true;
    const ENCODING: Encoding = Encoding::Multipart("kb_json");
    const FILES_REQUIRED_ON_CREATE: bool = true;

    fn listed_id(item: &KnowledgeBaseEntry) -> Option<&str> {
        item.knowledgebase.id.as_deref()
    }

    fn from_listed(item: &KnowledgeBaseEntry) -> Self {
        item.knowledgebase.clone()
    }

    fn from_created(body: serde_json::Value) -> Result<Self, ApiError> {
        // Some backends answer with the list-item wrapper instead of the bare record
        let record = match body.get("knowledgebase") {
            Some(inner) => inner.clone(),
            None => body,
        };
        serde_json::from_value(record).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl Resource for McpServer {
    type Listed = McpServer;
    const KIND: &'static str = "MCP server";
    const OPTIONAL: bool = true;
    const ENCODING: Encoding = Encoding::Json;

    fn listed_id(item: &McpServer) -> Option<&str> {
        item.id.as_deref()
    }

    fn from_listed(item: &McpServer) -> Self {
        item.clone()
    }
}

impl Resource for Trigger {
    type Listed = Trigger;
    const KIND: &'static str = "trigger";
    const OPTIONAL: bool = true;
    const ENCODING: Encoding = Encoding::Multipart("trigger_json");

    fn listed_id(item: &Trigger) -> Option<&str> {
        item.id.as_deref()
    }

    fn from_listed(item: &Trigger) -> Self {
        item.clone()
    }
}

impl Resource for SuggestionPrompt {
    type Listed = SuggestionPrompt;
    const KIND: &'static str = "suggestion prompt";
    const OPTIONAL: bool = true;
    const ENCODING: Encoding = Encoding::Multipart("prompt_json");

    fn listed_id(item: &SuggestionPrompt) -> Option<&str> {
        item.id.as_deref()
    }

    fn from_listed(item: &SuggestionPrompt) -> Self {
        item.clone()
    }
}

/// Typed access to every backend endpoint the console uses
#[derive(Clone)]
pub struct Backend {
    transport: Rc<dyn Transport>,
}

impl Backend {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Backend reached through the console host
    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserTransport::new(API_BASE)))
    }

    // ========================================================================
    // Generic collections
    // ========================================================================

    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, ApiError> {
        fetch_json::<Vec<T>>(self, collection).await
    }

    pub async fn create<T: Resource>(
        &self,
        collection: &str,
        record: &T,
        files: &[UploadFile],
    ) -> Result<T, ApiError> {
        let body = encode_record(T::ENCODING, record, files)?;
        let response = self
            .send(ApiRequest::new(Method::Post, collection).with_body(body))
            .await?;
        T::from_created(response.json()?)
    }

    pub async fn update<T: Resource>(
        &self,
        collection: &str,
        record: &T,
        files: &[UploadFile],
    ) -> Result<(), ApiError> {
        let id = record.record_id().ok_or(ApiError::MissingId(T::KIND))?;
        let body = encode_record(T::ENCODING, record, files)?;
        let path = format!("{}/{}", collection, encode(id));
        self.send(ApiRequest::new(Method::Put, path).with_body(body))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", collection, encode(id));
        self.send(ApiRequest::new(Method::Delete, path)).await?;
        Ok(())
    }

    // ========================================================================
    // MCP servers
    // ========================================================================

    pub async fn toggle_mcp_status(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}/toggle-status", MCP_SERVERS, encode(id));
        self.send(ApiRequest::new(Method::Put, path)).await?;
        Ok(())
    }

    // ========================================================================
    // Suggestion prompts
    // ========================================================================

    pub async fn list_suggestion_prompts(&self, agent_id: &str) -> Result<Vec<SuggestionPrompt>, ApiError> {
        self.list(&suggestion_prompts_path(agent_id)).await
    }

    pub async fn create_suggestion_prompt(&self, agent_id: &str, payload: &PromptPayload) -> Result<(), ApiError> {
        let body = encode_record(SuggestionPrompt::ENCODING, payload, &[])?;
        self.send(ApiRequest::new(Method::Post, suggestion_prompts_path(agent_id)).with_body(body))
            .await?;
        Ok(())
    }

    pub async fn update_suggestion_prompt(
        &self,
        agent_id: &str,
        prompt_id: &str,
        payload: &PromptPayload,
    ) -> Result<(), ApiError> {
        let body = encode_record(SuggestionPrompt::ENCODING, payload, &[])?;
        let path = format!("{}/{}", suggestion_prompts_path(agent_id), encode(prompt_id));
        self.send(ApiRequest::new(Method::Put, path).with_body(body))
            .await?;
        Ok(())
    }

    pub async fn delete_suggestion_prompt(&self, agent_id: &str, prompt_id: &str) -> Result<(), ApiError> {
        self.delete(&suggestion_prompts_path(agent_id), prompt_id).await
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Asks an agent one stateless question; returns the raw reply payload.
    pub async fn ask(&self, agent_id: &str, message: &str) -> Result<serde_json::Value, ApiError> {
        let path = format!("{}?agent_id={}&message={}", ASK, encode(agent_id), encode(message));
        let response = self.send(ApiRequest::new(Method::Post, path)).await?;
        response.json()
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let result = self
            .transport
            .send(request)
            .await
            .and_then(ApiResponse::error_for_status);
        if let Err(e) = &result {
            log::warn!("{} {} failed: {}", method.as_str(), path, e);
        }
        result
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

async fn fetch_json<T: DeserializeOwned>(backend: &Backend, path: &str) -> Result<T, ApiError> {
    backend
        .send(ApiRequest::new(Method::Get, path))
        .await?
        .json()
}

fn encode_record<T: Serialize>(
    encoding: Encoding,
    record: &T,
    files: &[UploadFile],
) -> Result<RequestBody, ApiError> {
    let json = serde_json::to_string(record).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(match encoding {
        Encoding::Json => RequestBody::Json(json),
        Encoding::Multipart(field) => {
            let mut parts = vec![Part::Text {
                name: field.to_string(),
                value: json,
            }];
            parts.extend(files.iter().cloned().map(|file| Part::File {
                name: "files".to_string(),
                file,
            }));
            RequestBody::Multipart(parts)
        }
    })
}
