//! Resource clients: cached listing plus the write operations of one collection
//!
//! Every mutation is followed by exactly one refetch, whether the write
//! succeeded or not, so the listing always reflects the backend.

use crate::api::{Backend, Resource};
use crate::editor::{Commit, Editable, ResourceEditor};
use crate::error::ApiError;
use crate::transport::UploadFile;
use crate::types::McpServer;
use std::cell::{Cell, RefCell};

/// Cached state of a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<L> {
    Loading,
    Ready(Vec<L>),
    /// Optional collection could not be fetched; shown as empty
    Unavailable,
    Failed(ApiError),
}

impl<L> Listing<L> {
    pub fn items(&self) -> &[L] {
        match self {
            Listing::Ready(items) => items,
            _ => &[],
        }
    }
}

/// Identifies one fetch so a slower, older response cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: Cell<u64>,
}

impl FetchSequencer {
    pub fn next(&self) -> FetchToken {
        let token = self.latest.get() + 1;
        self.latest.set(token);
        FetchToken(token)
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        token.0 == self.latest.get()
    }
}

/// Delete waiting for the user to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub label: String,
}

/// Completed delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
    /// The record was open in the editor, which is now back to an empty draft
    pub was_editing: bool,
}

pub struct ResourceClient<T: Resource> {
    backend: Backend,
    collection: String,
    listing: RefCell<Listing<T::Listed>>,
    editor: RefCell<ResourceEditor<T>>,
    sequencer: FetchSequencer,
    pending_delete: RefCell<Option<PendingDelete>>,
    last_error: RefCell<Option<ApiError>>,
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(backend: Backend, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
            listing: RefCell::new(Listing::Loading),
            editor: RefCell::new(ResourceEditor::new()),
            sequencer: FetchSequencer::default(),
            pending_delete: RefCell::new(None),
            last_error: RefCell::new(None),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn listing(&self) -> Listing<T::Listed> {
        self.listing.borrow().clone()
    }

    pub fn items(&self) -> Vec<T::Listed> {
        self.listing.borrow().items().to_vec()
    }

    pub fn find(&self, id: &str) -> Option<T::Listed> {
        self.listing
            .borrow()
            .items()
            .iter()
            .find(|item| T::listed_id(item) == Some(id))
            .cloned()
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Refreshes the listing. Returns `false` if a newer fetch superseded this one.
    pub async fn fetch_all(&self) -> bool {
        let token = self.sequencer.next();
        let result = self.backend.list::<T::Listed>(&self.collection).await;
        self.apply_fetch(token, result)
    }

    /// Installs a fetch result unless a newer fetch has started since `token`.
    pub fn apply_fetch(&self, token: FetchToken, result: Result<Vec<T::Listed>, ApiError>) -> bool {
        if !self.sequencer.is_current(token) {
            log::debug!("Discarding stale {} listing", T::KIND);
            return false;
        }

        let listing = match result {
            Ok(items) => Listing::Ready(items),
            Err(e) if T::OPTIONAL => {
                log::warn!("{} listing unavailable: {}", T::KIND, e);
                Listing::Unavailable
            }
            Err(e) => Listing::Failed(e),
        };
        *self.listing.borrow_mut() = listing;
        true
    }

    pub fn begin_fetch(&self) -> FetchToken {
        self.sequencer.next()
    }

    // ========================================================================
    // Editor
    // ========================================================================

    pub fn editor(&self) -> ResourceEditor<T> {
        self.editor.borrow().clone()
    }

    pub fn edit_draft<R>(&self, f: impl FnOnce(&mut ResourceEditor<T>) -> R) -> R {
        f(&mut self.editor.borrow_mut())
    }

    /// Loads a listed record into the editor. Returns `false` for unknown ids.
    pub fn start_edit(&self, id: &str) -> bool {
        match self.find(id) {
            Some(item) => {
                self.editor.borrow_mut().start_edit(T::from_listed(&item));
                true
            }
            None => false,
        }
    }

    pub fn reset_draft(&self) {
        self.editor.borrow_mut().reset_draft();
    }

    // ========================================================================
    // Writes
    // ========================================================================

    pub async fn create(&self, record: &T) -> Result<T, ApiError> {
        self.create_with_files(record, &[]).await
    }

    pub async fn create_with_files(&self, record: &T, files: &[UploadFile]) -> Result<T, ApiError> {
        if T::FILES_REQUIRED_ON_CREATE && files.is_empty() {
            let err = ApiError::FilesRequired(T::KIND);
            self.set_error(Some(err.clone()));
            return Err(err);
        }

        let result = self.backend.create(&self.collection, record, files).await;
        self.finish_write(&result).await;
        result
    }

    pub async fn update(&self, record: &T) -> Result<(), ApiError> {
        self.update_with_files(record, &[]).await
    }

    pub async fn update_with_files(&self, record: &T, files: &[UploadFile]) -> Result<(), ApiError> {
        let result = self.backend.update(&self.collection, record, files).await;
        self.finish_write(&result).await;
        result
    }

    /// Writes the editor buffer as a create or an update.
    pub async fn submit(&self, files: &[UploadFile]) -> Result<T, ApiError> {
        let commit = self.editor.borrow().commit();
        match commit {
            Commit::Create(record) => self.create_with_files(&record, files).await,
            Commit::Update(record) => self
                .update_with_files(&record, files)
                .await
                .map(|_| record),
        }
    }

    async fn finish_write<R>(&self, result: &Result<R, ApiError>) {
        match result {
            Ok(_) => {
                self.reset_draft();
                self.set_error(None);
            }
            Err(e) => self.set_error(Some(e.clone())),
        }
        self.fetch_all().await;
    }

    // ========================================================================
    // Delete confirmation
    // ========================================================================

    pub fn request_delete(&self, id: impl Into<String>, label: impl Into<String>) {
        *self.pending_delete.borrow_mut() = Some(PendingDelete {
            id: id.into(),
            label: label.into(),
        });
    }

    pub fn cancel_delete(&self) {
        *self.pending_delete.borrow_mut() = None;
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.pending_delete.borrow().clone()
    }

    /// Deletes the pending record. Returns `Ok(None)` if nothing was pending.
    pub async fn confirm_delete(&self) -> Result<Option<Deleted>, ApiError> {
        let Some(pending) = self.pending_delete.borrow_mut().take() else {
            return Ok(None);
        };
        self.delete(&pending.id).await.map(Some)
    }

    pub async fn delete(&self, id: &str) -> Result<Deleted, ApiError> {
        let result = self.backend.delete(&self.collection, id).await;
        let was_editing = self.editor.borrow().buffer().record_id() == Some(id);
        if result.is_ok() && was_editing {
            self.reset_draft();
        }
        match &result {
            Ok(_) => self.set_error(None),
            Err(e) => self.set_error(Some(e.clone())),
        }
        self.fetch_all().await;
        result.map(|_| Deleted {
            id: id.to_string(),
            was_editing,
        })
    }

    // ========================================================================
    // Errors
    // ========================================================================

    pub fn last_error(&self) -> Option<ApiError> {
        self.last_error.borrow().clone()
    }

    /// Surfaces an error raised outside a backend write, such as reading upload files.
    pub fn record_error(&self, error: ApiError) {
        self.set_error(Some(error));
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    fn set_error(&self, error: Option<ApiError>) {
        *self.last_error.borrow_mut() = error;
    }
}

impl ResourceClient<McpServer> {
    /// Flips an MCP server between active and inactive.
    pub async fn toggle_status(&self, id: &str) -> Result<(), ApiError> {
        let result = self.backend.toggle_mcp_status(id).await;
        match &result {
            Ok(_) => self.set_error(None),
            Err(e) => self.set_error(Some(e.clone())),
        }
        self.fetch_all().await;
        result
    }
}
