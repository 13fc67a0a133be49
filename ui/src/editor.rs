//! Generic draft/edit buffer behind every management form
//!
//! A single [`ResourceEditor`] holds either a draft (no id yet) or an editing
//! copy of a fetched record. Fields are set by name through the record's
//! [`Editable`] schema, and [`ResourceEditor::commit`] decides between a
//! create and an update from the presence of an id.

use crate::types::*;
use thiserror::Error;

/// Value written into a named form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
    Ids(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} does not accept {kind} values")]
    WrongKind { field: String, kind: &'static str },
}

/// Record that can be edited field-by-field in a form.
pub trait Editable: Clone + PartialEq {
    /// Names accepted by [`Editable::set_field`]
    const FIELDS: &'static [&'static str];

    /// Fields the form refuses to submit while blank
    const REQUIRED: &'static [&'static str];

    /// Empty draft with documented defaults
    fn empty() -> Self;

    fn record_id(&self) -> Option<&str>;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError>;

    /// The record as it is written, with submit-time fallbacks applied.
    fn finalized(&self) -> Self {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Creating,
    Editing,
}

/// Outcome of committing the buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Commit<T> {
    Create(T),
    Update(T),
}

#[derive(Debug, Clone)]
pub struct ResourceEditor<T: Editable> {
    buffer: T,
}

impl<T: Editable> Default for ResourceEditor<T> {
    fn default() -> Self {
        Self { buffer: T::empty() }
    }
}

impl<T: Editable> ResourceEditor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_create(&mut self) {
        self.buffer = T::empty();
    }

    pub fn start_edit(&mut self, record: T) {
        self.buffer = record;
    }

    pub fn reset_draft(&mut self) {
        self.start_create();
    }

    pub fn mode(&self) -> EditorMode {
        if self.buffer.record_id().is_some() {
            EditorMode::Editing
        } else {
            EditorMode::Creating
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode() == EditorMode::Editing
    }

    pub fn buffer(&self) -> &T {
        &self.buffer
    }

    /// Applies a record-specific change that has no named field, such as
    /// replacing MCP arguments wholesale.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.buffer);
    }

    /// Sets one field. On error the buffer is left untouched.
    pub fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let mut next = self.buffer.clone();
        next.set_field(field, value)?;
        self.buffer = next;
        Ok(())
    }

    /// Snapshot of the buffer as the write it represents. The buffer is kept
    /// so a failed write does not lose the user's input.
    pub fn commit(&self) -> Commit<T> {
        let record = self.buffer.finalized();
        match self.mode() {
            EditorMode::Creating => Commit::Create(record),
            EditorMode::Editing => Commit::Update(record),
        }
    }
}

// ============================================================================
// Field schemas
// ============================================================================

fn text(field: &str, value: FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        FieldValue::Number(n) => Ok(n.to_string()),
        FieldValue::Ids(_) => Err(FieldError::WrongKind {
            field: field.to_string(),
            kind: "id list",
        }),
    }
}

fn optional_text(field: &str, value: FieldValue) -> Result<Option<String>, FieldError> {
    let s = text(field, value)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn ids(field: &str, value: FieldValue) -> Result<Vec<String>, FieldError> {
    match value {
        FieldValue::Ids(ids) => Ok(ids),
        _ => Err(FieldError::WrongKind {
            field: field.to_string(),
            kind: "scalar",
        }),
    }
}

fn unknown(field: &str) -> FieldError {
    FieldError::UnknownField(field.to_string())
}

impl Editable for Agent {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "slug",
        "model",
        "instructions",
        "base_url",
        "api_key",
        "max_tokens",
        "status",
        "accessibility",
        "knowledgebase_ids",
        "mcp_server_ids",
        "trigger_ids",
    ];

    const REQUIRED: &'static [&'static str] = &["name", "slug", "model", "base_url", "api_key"];

    fn empty() -> Self {
        Agent::default()
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = text(field, value)?,
            "slug" => self.slug = text(field, value)?,
            "model" => self.model = text(field, value)?,
            "instructions" => self.instructions = text(field, value)?,
            "base_url" => self.base_url = text(field, value)?,
            "api_key" => self.api_key = text(field, value)?,
            // Blank or unparseable text stays unset until the record is finalized
            "max_tokens" => {
                self.max_tokens = match value {
                    FieldValue::Number(n) => Some(n),
                    other => text(field, other)?.trim().parse().ok(),
                };
            }
            "status" => self.status = RecordStatus::from(text(field, value)?),
            "accessibility" => self.accessibility = Accessibility::from(text(field, value)?),
            "knowledgebase_ids" => self.knowledgebase_ids = ids(field, value)?,
            "mcp_server_ids" => self.mcp_server_ids = ids(field, value)?,
            "trigger_ids" => self.trigger_ids = ids(field, value)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn finalized(&self) -> Self {
        Agent {
            max_tokens: Some(self.max_tokens.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_TOKENS)),
            ..self.clone()
        }
    }
}

impl Editable for KnowledgeBase {
    const FIELDS: &'static [&'static str] = &["name", "slug", "description", "embedding_model", "status"];

    const REQUIRED: &'static [&'static str] = &["name", "slug", "embedding_model"];

    fn empty() -> Self {
        KnowledgeBase::default()
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = text(field, value)?,
            "slug" => self.slug = text(field, value)?,
            "description" => self.description = text(field, value)?,
            "embedding_model" => self.embedding_model = text(field, value)?,
            "status" => self.status = RecordStatus::from(text(field, value)?),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Editable for McpServer {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "transport",
        "base_url",
        "api_key",
        "description",
        "status",
    ];

    const REQUIRED: &'static [&'static str] = &["name", "base_url"];

    fn empty() -> Self {
        McpServer::default()
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = text(field, value)?,
            "transport" => self.transport = McpTransport::from(text(field, value)?),
            "base_url" => self.base_url = text(field, value)?,
            "api_key" => self.api_key = optional_text(field, value)?,
            "description" => self.description = optional_text(field, value)?,
            "status" => self.status = RecordStatus::from(text(field, value)?),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Editable for Trigger {
    const FIELDS: &'static [&'static str] = &["name", "description", "trigger_type", "status"];

    const REQUIRED: &'static [&'static str] = &["name", "trigger_type"];

    fn empty() -> Self {
        Trigger::default()
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = text(field, value)?,
            "description" => self.description = optional_text(field, value)?,
            "trigger_type" => self.trigger_type = text(field, value)?,
            "status" => self.status = RecordStatus::from(text(field, value)?),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Editable for SuggestionPrompt {
    const FIELDS: &'static [&'static str] = &["prompt_title", "prompt"];

    const REQUIRED: &'static [&'static str] = &["prompt_title", "prompt"];

    fn empty() -> Self {
        SuggestionPrompt::default()
    }

    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "prompt_title" => self.prompt_title = text(field, value)?,
            "prompt" => self.prompt = text(field, value)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_agent_editor() -> ResourceEditor<Agent> {
        let mut editor = ResourceEditor::<Agent>::new();
        editor.set_field("name", FieldValue::text("Support")).unwrap();
        editor.set_field("slug", FieldValue::text("support")).unwrap();
        editor.set_field("instructions", FieldValue::text("Be brief")).unwrap();
        editor.set_field("max_tokens", FieldValue::Number(1024)).unwrap();
        editor.set_field("status", FieldValue::text("inactive")).unwrap();
        editor.set_field("accessibility", FieldValue::text("private")).unwrap();
        editor
            .set_field("knowledgebase_ids", FieldValue::Ids(vec!["kb1".into()]))
            .unwrap();
        editor
    }

    #[test]
    fn test_reset_draft_restores_every_default() {
        let mut editor = filled_agent_editor();
        editor.reset_draft();
        assert_eq!(editor.buffer(), &Agent::default());
        assert_eq!(editor.buffer().max_tokens, Some(DEFAULT_MAX_TOKENS));

        let mut kb = ResourceEditor::<KnowledgeBase>::new();
        kb.set_field("embedding_model", FieldValue::text("other")).unwrap();
        kb.set_field("status", FieldValue::text("inactive")).unwrap();
        kb.reset_draft();
        assert_eq!(kb.buffer().embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(kb.buffer().status, RecordStatus::Active);

        let mut mcp = ResourceEditor::<McpServer>::new();
        mcp.set_field("transport", FieldValue::text("stdio")).unwrap();
        mcp.set_field("api_key", FieldValue::text("secret")).unwrap();
        mcp.reset_draft();
        assert_eq!(mcp.buffer().transport, McpTransport::Sse);
        assert_eq!(mcp.buffer().api_key, None);

        let mut trigger = ResourceEditor::<Trigger>::new();
        trigger.set_field("trigger_type", FieldValue::text("cron")).unwrap();
        trigger.reset_draft();
        assert_eq!(trigger.buffer(), &Trigger::default());
    }

    #[test]
    fn test_commit_chooses_create_or_update() {
        let editor = filled_agent_editor();
        assert!(matches!(editor.commit(), Commit::Create(agent) if agent.name == "Support"));

        let mut editor = ResourceEditor::<Agent>::new();
        editor.start_edit(Agent {
            id: Some("a1".into()),
            name: "Old".into(),
            ..Agent::default()
        });
        assert!(editor.is_editing());
        editor.set_field("name", FieldValue::text("New")).unwrap();
        match editor.commit() {
            Commit::Update(agent) => {
                assert_eq!(agent.id.as_deref(), Some("a1"));
                assert_eq!(agent.name, "New");
            }
            other => panic!("expected update, got {:?}", other),
        }
        // commit keeps the buffer
        assert!(editor.is_editing());
    }

    #[test]
    fn test_rejected_field_leaves_buffer_untouched() {
        let mut editor = filled_agent_editor();
        let before = editor.buffer().clone();

        assert_eq!(
            editor.set_field("colour", FieldValue::text("red")),
            Err(FieldError::UnknownField("colour".into()))
        );
        assert!(editor.set_field("trigger_ids", FieldValue::text("t1")).is_err());
        assert!(editor.set_field("name", FieldValue::Ids(vec![])).is_err());
        assert_eq!(editor.buffer(), &before);
    }

    #[test]
    fn test_cleared_max_tokens_stays_blank_until_commit() {
        let mut editor = ResourceEditor::<Agent>::new();
        editor.set_field("max_tokens", FieldValue::text("")).unwrap();
        // the input redraws empty, so the user can type a fresh value
        assert_eq!(editor.buffer().max_tokens, None);
        assert!(matches!(editor.commit(), Commit::Create(a) if a.max_tokens == Some(DEFAULT_MAX_TOKENS)));
        assert_eq!(editor.buffer().max_tokens, None);

        editor.set_field("max_tokens", FieldValue::text("5")).unwrap();
        editor.set_field("max_tokens", FieldValue::text("512")).unwrap();
        assert_eq!(editor.buffer().max_tokens, Some(512));

        editor.set_field("max_tokens", FieldValue::text("lots")).unwrap();
        assert_eq!(editor.buffer().max_tokens, None);
        editor.set_field("max_tokens", FieldValue::text("0")).unwrap();
        assert!(matches!(editor.commit(), Commit::Create(a) if a.max_tokens == Some(DEFAULT_MAX_TOKENS)));
        editor.set_field("max_tokens", FieldValue::text(" 256 ")).unwrap();
        assert!(matches!(editor.commit(), Commit::Create(a) if a.max_tokens == Some(256)));
    }

    #[test]
    fn test_required_fields_belong_to_the_schema() {
        fn check<T: Editable>() {
            for field in T::REQUIRED {
                assert!(T::FIELDS.contains(field), "field {}", field);
            }
        }
        check::<Agent>();
        check::<KnowledgeBase>();
        check::<McpServer>();
        check::<Trigger>();
        check::<SuggestionPrompt>();

        assert_eq!(Agent::REQUIRED, &["name", "slug", "model", "base_url", "api_key"]);
        assert!(!Agent::REQUIRED.contains(&"instructions"));
        assert_eq!(KnowledgeBase::REQUIRED, &["name", "slug", "embedding_model"]);
        assert_eq!(Trigger::REQUIRED, &["name", "trigger_type"]);
        assert!(!McpServer::REQUIRED.contains(&"api_key"));
    }

    #[test]
    fn test_every_schema_field_is_settable() {
        fn check<T: Editable>() {
            for field in T::FIELDS {
                let mut record = T::empty();
                let value = if field.ends_with("_ids") {
                    FieldValue::Ids(vec!["x".into()])
                } else {
                    FieldValue::text("x")
                };
                assert!(record.set_field(field, value).is_ok(), "field {}", field);
            }
        }
        check::<Agent>();
        check::<KnowledgeBase>();
        check::<McpServer>();
        check::<Trigger>();
        check::<SuggestionPrompt>();
    }
}
