//! Transient chat session against one agent
//!
//! Nothing here is persisted. Each agent selection starts a new epoch; replies
//! and suggestion lists tagged with an older epoch are dropped.

use crate::api::Backend;
use crate::error::ApiError;
use crate::types::{SuggestionPrompt, TokenUsage};
use serde_json::Value;
use std::cell::RefCell;

/// Assistant turn appended when a request fails
pub const CHAT_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub usage: Option<TokenUsage>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: f64,
}

/// Content and usage extracted from an ask reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

/// Interprets the payload returned by the ask endpoint.
pub fn parse_reply(payload: &Value) -> AssistantReply {
    if let Some(messages) = payload.get("messages").and_then(Value::as_array) {
        return match messages.last() {
            Some(last) if is_ai_turn(last) => AssistantReply {
                content: message_text(last.get("content").unwrap_or(&Value::Null)),
                usage: usage_of(last),
            },
            _ => AssistantReply::default(),
        };
    }

    match payload {
        Value::String(s) => AssistantReply {
            content: s.clone(),
            usage: None,
        },
        other => AssistantReply {
            content: pretty(other),
            usage: None,
        },
    }
}

fn is_ai_turn(message: &Value) -> bool {
    message.get("type").and_then(Value::as_str) == Some("ai")
        || message.get("role").and_then(Value::as_str) == Some("assistant")
}

fn message_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => pretty(other),
    }
}

fn usage_of(message: &Value) -> Option<TokenUsage> {
    let raw = message
        .get("usage_metadata")
        .filter(|v| v.is_object())
        .or_else(|| message.pointer("/response_metadata/token_usage"))?;
    serde_json::from_value::<TokenUsage>(raw.clone())
        .ok()
        .filter(|usage| !usage.is_empty())
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Request produced by [`ChatSession::begin_send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub epoch: u64,
    pub agent_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSession {
    agent_id: Option<String>,
    messages: Vec<ChatMessage>,
    input: String,
    awaiting_reply: bool,
    suggestions: Vec<SuggestionPrompt>,
    epoch: u64,
    next_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn suggestions(&self) -> &[SuggestionPrompt] {
        &self.suggestions
    }

    pub fn can_send(&self) -> bool {
        self.agent_id.is_some() && !self.awaiting_reply && !self.input.trim().is_empty()
    }

    /// Selects an agent, reselection included, and starts a fresh transcript.
    pub fn select_agent(&mut self, agent_id: impl Into<String>) -> u64 {
        self.agent_id = Some(agent_id.into());
        self.messages.clear();
        self.suggestions.clear();
        self.awaiting_reply = false;
        self.epoch += 1;
        self.epoch
    }

    pub fn set_suggestions(&mut self, epoch: u64, prompts: Vec<SuggestionPrompt>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.suggestions = prompts;
        true
    }

    /// Copies a suggestion into the input without sending it.
    pub fn use_suggestion(&mut self, prompt: &SuggestionPrompt) {
        self.input = prompt.prompt.clone();
    }

    /// Echoes the user turn and clears the input. `None` when sending is not allowed.
    pub fn begin_send(&mut self, now_ms: f64) -> Option<PendingAsk> {
        if !self.can_send() {
            return None;
        }
        let agent_id = self.agent_id.clone()?;
        let message = std::mem::take(&mut self.input);
        self.push(ChatRole::User, message.clone(), None, now_ms);
        self.awaiting_reply = true;
        Some(PendingAsk {
            epoch: self.epoch,
            agent_id,
            message,
        })
    }

    /// Appends the assistant turn for `pending`. Returns `false` if the reply
    /// belongs to a previous agent selection.
    pub fn finish_send(&mut self, pending: &PendingAsk, result: Result<Value, ApiError>, now_ms: f64) -> bool {
        if pending.epoch != self.epoch {
            log::debug!("Dropping reply from agent {}", pending.agent_id);
            return false;
        }
        self.awaiting_reply = false;
        match result {
            Ok(payload) => {
                let reply = parse_reply(&payload);
                self.push(ChatRole::Assistant, reply.content, reply.usage, now_ms);
            }
            Err(e) => {
                log::error!("Chat request to {} failed: {}", pending.agent_id, e);
                self.push(ChatRole::Assistant, CHAT_ERROR_REPLY.to_string(), None, now_ms);
            }
        }
        true
    }

    fn push(&mut self, role: ChatRole, content: String, usage: Option<TokenUsage>, now_ms: f64) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            usage,
            timestamp_ms: now_ms,
        });
    }
}

/// Chat session wired to the backend
pub struct ChatClient {
    backend: Backend,
    session: RefCell<ChatSession>,
}

impl ChatClient {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            session: RefCell::new(ChatSession::new()),
        }
    }

    pub fn session(&self) -> ChatSession {
        self.session.borrow().clone()
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        f(&mut self.session.borrow_mut())
    }

    /// Selects an agent and returns the new session epoch.
    pub fn select_agent(&self, agent_id: &str) -> u64 {
        self.session.borrow_mut().select_agent(agent_id)
    }

    /// Loads the agent's suggestion prompts for the session started at `epoch`.
    /// A failed fetch leaves the suggestions empty.
    pub async fn load_suggestions(&self, agent_id: &str, epoch: u64) {
        match self.backend.list_suggestion_prompts(agent_id).await {
            Ok(prompts) => {
                self.session.borrow_mut().set_suggestions(epoch, prompts);
            }
            Err(e) => log::warn!("No suggestion prompts for {}: {}", agent_id, e),
        }
    }

    /// Echoes the current input as a user turn. `None` when nothing can be sent.
    pub fn begin_send(&self, now_ms: f64) -> Option<PendingAsk> {
        self.session.borrow_mut().begin_send(now_ms)
    }

    /// Asks the backend and appends the reply. `clock` supplies the reply
    /// timestamp in milliseconds.
    pub async fn complete(&self, pending: PendingAsk, clock: impl Fn() -> f64) -> bool {
        let result = self.backend.ask(&pending.agent_id, &pending.message).await;
        self.session.borrow_mut().finish_send(&pending, result, clock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::suggestion_prompts_path;
    use crate::testing::FakeBackend;
    use futures::executor::block_on;
    use serde_json::json;

    fn clock() -> f64 {
        1_700_000_000_000.0
    }

    #[test]
    fn test_send_without_agent_is_noop() {
        let fake = FakeBackend::new();
        let client = ChatClient::new(fake.backend());
        client.with_session(|s| s.set_input("Hello"));

        assert_eq!(client.begin_send(clock()), None);
        assert!(client.session().messages().is_empty());
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn test_ai_reply_with_usage() {
        let fake = FakeBackend::new();
        fake.set_ask_reply(json!({
            "messages": [
                {"type": "human", "content": "Hello"},
                {"type": "ai", "content": "Hi there", "usage_metadata": {"total_tokens": 12}}
            ]
        }));
        let client = ChatClient::new(fake.backend());
        client.select_agent("x");
        client.with_session(|s| s.set_input("Hello"));

        let pending = client.begin_send(clock()).unwrap();
        assert_eq!(client.session().messages().len(), 1);
        assert!(block_on(client.complete(pending, clock)));
        let session = client.session();
        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, "Hi there");
        assert_eq!(messages[1].usage.as_ref().and_then(|u| u.total_tokens), Some(12));
        assert_eq!(session.input(), "");
        assert!(!session.is_awaiting_reply());
    }

    #[test]
    fn test_failed_ask_appends_canned_reply() {
        let fake = FakeBackend::new();
        let client = ChatClient::new(fake.backend());
        client.select_agent("x");
        client.with_session(|s| s.set_input("Hello"));

        let pending = client.begin_send(clock()).unwrap();
        block_on(client.complete(pending, clock));
        let session = client.session();
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, CHAT_ERROR_REPLY);
    }

    #[test]
    fn test_switching_agent_clears_transcript_and_drops_late_reply() {
        let mut session = ChatSession::new();
        session.select_agent("x");
        session.set_input("Hello");
        let pending = session.begin_send(clock()).unwrap();
        assert!(!session.can_send());

        session.select_agent("x");
        assert!(session.messages().is_empty());
        assert!(!session.finish_send(&pending, Ok(json!("late")), clock()));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_blank_input_cannot_be_sent() {
        let mut session = ChatSession::new();
        session.select_agent("x");
        session.set_input("   ");
        assert_eq!(session.begin_send(clock()), None);
    }

    #[test]
    fn test_suggestions_fill_input() {
        let fake = FakeBackend::new();
        fake.seed(
            &suggestion_prompts_path("x"),
            json!({"prompt_title": "Greet", "prompt": "Say hello"}),
        );
        let client = ChatClient::new(fake.backend());
        let epoch = client.select_agent("x");
        block_on(client.load_suggestions("x", epoch));

        let prompt = client.session().suggestions()[0].clone();
        client.with_session(|s| s.use_suggestion(&prompt));
        let session = client.session();
        assert_eq!(session.input(), "Say hello");
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_parse_reply_shapes() {
        assert_eq!(parse_reply(&json!("plain")).content, "plain");
        assert_eq!(
            parse_reply(&json!({"answer": 1})).content,
            "{\n  \"answer\": 1\n}"
        );
        assert_eq!(
            parse_reply(&json!({"messages": [{"type": "human", "content": "hi"}]})),
            AssistantReply::default()
        );

        let blocks = parse_reply(&json!({"messages": [{
            "role": "assistant",
            "content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}],
            "response_metadata": {"token_usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}}
        }]}));
        assert_eq!(blocks.content, "a\nb");
        let usage = blocks.usage.unwrap();
        assert_eq!(usage.input_tokens, Some(3));
        assert_eq!(usage.output_tokens, Some(4));
    }
}
