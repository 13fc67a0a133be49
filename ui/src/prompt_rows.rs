//! Suggestion prompt rows edited alongside an agent
//!
//! Rows are either new or mirror a prompt already stored for the agent.
//! Saving writes each valid row on its own; a failed row never aborts the
//! remaining ones, and an agent write that fails does not hold back the
//! prompts of an agent that already exists.

use crate::api::Backend;
use crate::error::ApiError;
use crate::resource::ResourceClient;
use crate::types::{Agent, PromptPayload, SuggestionPrompt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOrigin {
    New,
    /// Stored prompt with its backend id
    Existing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRow {
    /// Stable key for rendering, unrelated to backend ids
    pub key: u64,
    pub title: String,
    pub body: String,
    pub origin: RowOrigin,
}

impl PromptRow {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.body.trim().is_empty()
    }

    pub fn payload(&self) -> PromptPayload {
        PromptPayload {
            prompt_title: self.title.trim().to_string(),
            prompt: self.body.trim().to_string(),
        }
    }
}

/// Write planned for one valid row
#[derive(Debug, Clone, PartialEq)]
pub enum PromptWrite {
    Create(PromptPayload),
    Update { id: String, payload: PromptPayload },
}

/// What removing a row requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Drop the row locally
    Local,
    /// Delete the stored prompt first, then drop the row
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRows {
    rows: Vec<PromptRow>,
    next_key: u64,
}

impl Default for PromptRows {
    fn default() -> Self {
        let mut rows = Self {
            rows: Vec::new(),
            next_key: 0,
        };
        rows.add();
        rows
    }
}

impl PromptRows {
    /// One blank row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(prompts: &[SuggestionPrompt]) -> Self {
        let mut rows = Self {
            rows: Vec::new(),
            next_key: 0,
        };
        for prompt in prompts {
            let origin = match &prompt.id {
                Some(id) => RowOrigin::Existing(id.clone()),
                None => RowOrigin::New,
            };
            rows.push(prompt.prompt_title.clone(), prompt.prompt.clone(), origin);
        }
        if rows.rows.is_empty() {
            rows.add();
        }
        rows
    }

    pub fn rows(&self) -> &[PromptRow] {
        &self.rows
    }

    /// Appends a blank row and returns its key.
    pub fn add(&mut self) -> u64 {
        self.push(String::new(), String::new(), RowOrigin::New)
    }

    fn push(&mut self, title: String, body: String, origin: RowOrigin) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.rows.push(PromptRow {
            key,
            title,
            body,
            origin,
        });
        key
    }

    pub fn set_title(&mut self, key: u64, title: impl Into<String>) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.key == key) {
            row.title = title.into();
        }
    }

    pub fn set_body(&mut self, key: u64, body: impl Into<String>) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.key == key) {
            row.body = body.into();
        }
    }

    pub fn can_remove(&self) -> bool {
        self.rows.len() > 1
    }

    /// What removing `key` takes, or `None` when the row is unknown or last.
    pub fn removal(&self, key: u64) -> Option<Removal> {
        if !self.can_remove() {
            return None;
        }
        let row = self.rows.iter().find(|row| row.key == key)?;
        Some(match &row.origin {
            RowOrigin::New => Removal::Local,
            RowOrigin::Existing(id) => Removal::Remote(id.clone()),
        })
    }

    pub fn discard(&mut self, key: u64) {
        if self.can_remove() {
            self.rows.retain(|row| row.key != key);
        }
    }

    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_valid()).count()
    }

    /// Writes for every valid row, in row order. Invalid rows are dropped.
    pub fn plan(&self) -> Vec<PromptWrite> {
        self.rows
            .iter()
            .filter(|row| row.is_valid())
            .map(|row| match &row.origin {
                RowOrigin::New => PromptWrite::Create(row.payload()),
                RowOrigin::Existing(id) => PromptWrite::Update {
                    id: id.clone(),
                    payload: row.payload(),
                },
            })
            .collect()
    }

    /// Line shown under the rows, `None` when nothing would be written.
    pub fn summary(&self, editing: bool) -> Option<String> {
        match self.valid_count() {
            0 => None,
            n => Some(format!(
                "{} prompt(s) will be {} the agent",
                n,
                if editing { "updated for" } else { "created with" }
            )),
        }
    }
}

/// Outcome of writing a set of prompt rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptSaveReport {
    pub saved: usize,
    pub failed: Vec<ApiError>,
}

impl PromptSaveReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads an agent's prompts as rows. A failed fetch yields one blank row.
pub async fn load_prompt_rows(backend: &Backend, agent_id: &str) -> PromptRows {
    match backend.list_suggestion_prompts(agent_id).await {
        Ok(prompts) => PromptRows::from_existing(&prompts),
        Err(e) => {
            log::warn!("Failed to load suggestion prompts for {}: {}", agent_id, e);
            PromptRows::new()
        }
    }
}

/// Issues one request per planned write, sequentially.
pub async fn save_prompt_rows(backend: &Backend, agent_id: &str, rows: &PromptRows) -> PromptSaveReport {
    let mut report = PromptSaveReport::default();
    for write in rows.plan() {
        let result = match &write {
            PromptWrite::Create(payload) => backend.create_suggestion_prompt(agent_id, payload).await,
            PromptWrite::Update { id, payload } => {
                backend.update_suggestion_prompt(agent_id, id, payload).await
            }
        };
        match result {
            Ok(()) => report.saved += 1,
            Err(e) => {
                log::warn!("Suggestion prompt write failed: {}", e);
                report.failed.push(e);
            }
        }
    }
    report
}

/// Outcome of saving an agent together with its prompt rows
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSaveReport {
    pub agent: Result<Agent, ApiError>,
    /// `None` when no agent id was available to write prompts under
    pub prompts: Option<PromptSaveReport>,
}

impl AgentSaveReport {
    /// Message for the prompt banner, `None` when every prompt write succeeded.
    pub fn prompt_failure(&self) -> Option<String> {
        let failed = self.prompts.as_ref()?.failed.len();
        if failed == 0 {
            return None;
        }
        Some(match &self.agent {
            Ok(agent) => format!("Agent \"{}\" saved, but {} prompt write(s) failed", agent.name, failed),
            Err(_) => format!("{} prompt write(s) failed", failed),
        })
    }
}

/// Submits the agent buffer, then writes `rows` under the agent's id.
///
/// An edited agent keeps its id whatever the agent write returns, so its
/// prompts are written even when that write fails. A new agent only has an
/// id once the backend created it.
pub async fn save_agent_with_prompts(agents: &ResourceClient<Agent>, rows: &PromptRows) -> AgentSaveReport {
    let edited_id = agents.editor().buffer().id.clone();
    let agent = agents.submit(&[]).await;

    let agent_id = match (&agent, edited_id) {
        (_, Some(id)) => Some(id),
        (Ok(created), None) => created.id.clone(),
        (Err(_), None) => None,
    };
    let prompts = match agent_id {
        Some(id) => Some(save_prompt_rows(agents.backend(), &id, rows).await),
        None => {
            if agent.is_ok() {
                log::warn!("Saved agent has no id, skipping its prompts");
            }
            None
        }
    };
    AgentSaveReport { agent, prompts }
}
