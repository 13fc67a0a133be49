pub mod agents;
pub mod chat;
pub mod confirm_dialog;
pub mod dashboard;
pub mod fields;
pub mod knowledge_bases;
pub mod mcp_servers;
pub mod notices;
pub mod triggers;

use crate::api::{self, Backend, Resource};
use crate::resource::{Listing, ResourceClient};
use crate::types::RecordStatus;
use leptos::prelude::*;
use std::future::Future;
use std::rc::Rc;

/// Reactive handle on a [`ResourceClient`]
///
/// The client itself is not reactive; readers track `revision`, which is
/// bumped whenever an operation on the client finishes.
pub struct ClientHandle<T: Resource> {
    client: StoredValue<Rc<ResourceClient<T>>, LocalStorage>,
    revision: RwSignal<u64>,
}

impl<T: Resource> Clone for ClientHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Resource> Copy for ClientHandle<T> {}

impl<T: Resource> ClientHandle<T> {
    pub fn new(backend: Backend, collection: impl Into<String>) -> Self {
        Self {
            client: StoredValue::new_local(Rc::new(ResourceClient::new(backend, collection))),
            revision: RwSignal::new(0),
        }
    }

    /// Reads the client and subscribes to later changes.
    pub fn with<R>(&self, f: impl FnOnce(&ResourceClient<T>) -> R) -> R {
        let _ = self.revision.get();
        self.with_untracked(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&ResourceClient<T>) -> R) -> R {
        let client = self.client.get_value();
        f(&client)
    }

    /// Applies a synchronous change and notifies readers.
    pub fn update<R>(&self, f: impl FnOnce(&ResourceClient<T>) -> R) -> R {
        let result = self.with_untracked(f);
        self.touch();
        result
    }

    pub fn touch(&self) {
        self.revision.update(|n| *n += 1);
    }

    /// Runs an async operation on the client, notifying readers when it ends.
    pub fn spawn<F, Fut>(&self, f: F)
    where
        F: FnOnce(Rc<ResourceClient<T>>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let client = self.client.get_value();
        let revision = self.revision;
        wasm_bindgen_futures::spawn_local(async move {
            f(client).await;
            revision.update(|n| *n += 1);
        });
    }

    /// Last write error of the client, for an [`notices::ErrorBanner`].
    pub fn error_message(&self) -> Signal<Option<String>> {
        let handle = *self;
        Signal::derive(move || handle.with(|c| c.last_error()).map(|e| e.to_string()))
    }

    pub fn dismiss_error(&self) -> Callback<()> {
        let handle = *self;
        Callback::new(move |_| handle.update(|c| c.clear_error()))
    }

    pub fn pending_delete(&self) -> Signal<Option<crate::resource::PendingDelete>> {
        let handle = *self;
        Signal::derive(move || handle.with(|c| c.pending_delete()))
    }

    pub fn cancel_delete(&self) -> Callback<()> {
        let handle = *self;
        Callback::new(move |_| handle.update(|c| c.cancel_delete()))
    }

    /// Confirms the pending delete, flagging `deleting` while it runs.
    pub fn confirm_delete(&self, set_deleting: WriteSignal<bool>) -> Callback<()> {
        self.confirm_delete_then(set_deleting, Callback::new(|_| {}))
    }

    /// Like [`ClientHandle::confirm_delete`], then runs `on_edit_discarded`
    /// when the deleted record was open in the editor.
    pub fn confirm_delete_then(&self, set_deleting: WriteSignal<bool>, on_edit_discarded: Callback<()>) -> Callback<()> {
        let handle = *self;
        Callback::new(move |_| {
            set_deleting.set(true);
            handle.spawn(move |client| async move {
                match client.confirm_delete().await {
                    Ok(Some(deleted)) if deleted.was_editing => on_edit_discarded.run(()),
                    Ok(_) => {}
                    Err(e) => log::warn!("Delete failed: {}", e),
                }
                set_deleting.set(false);
            });
        })
    }

    pub fn refresh(&self) {
        self.spawn(|client| async move {
            client.fetch_all().await;
        });
    }
}

/// Resource clients shared by the dashboard tabs and the chat page
#[derive(Clone, Copy)]
pub struct Clients {
    pub backend: StoredValue<Backend, LocalStorage>,
    pub agents: ClientHandle<crate::types::Agent>,
    pub knowledge_bases: ClientHandle<crate::types::KnowledgeBase>,
    pub mcp_servers: ClientHandle<crate::types::McpServer>,
    pub triggers: ClientHandle<crate::types::Trigger>,
}

impl Clients {
    pub fn new(backend: Backend) -> Self {
        Self {
            agents: ClientHandle::new(backend.clone(), api::AGENTS),
            knowledge_bases: ClientHandle::new(backend.clone(), api::KNOWLEDGE_BASES),
            mcp_servers: ClientHandle::new(backend.clone(), api::MCP_SERVERS),
            triggers: ClientHandle::new(backend.clone(), api::TRIGGERS),
            backend: StoredValue::new_local(backend),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.get_value()
    }
}

pub fn use_clients() -> Clients {
    expect_context::<Clients>()
}

/// Placeholder shown instead of rows when a listing has nothing to render.
pub fn listing_notice<L>(listing: &Listing<L>, plural: &'static str) -> Option<AnyView> {
    match listing {
        Listing::Loading => Some(view! { <div class="text-center py-4 text-gray-500">"Loading..."</div> }.into_any()),
        Listing::Unavailable => Some(
            view! {
                <div class="p-4 bg-yellow-50 border border-yellow-200 rounded text-yellow-800 text-sm">
                    "The " {plural} " service is unavailable. Showing an empty list."
                </div>
            }
            .into_any(),
        ),
        Listing::Failed(e) => Some(
            view! {
                <div class="p-4 bg-red-50 border border-red-200 rounded text-red-800 text-sm">
                    <strong>"Failed to load " {plural} "."</strong>
                    " " {e.to_string()}
                </div>
            }
            .into_any(),
        ),
        Listing::Ready(items) if items.is_empty() => Some(
            view! { <div class="text-center py-4 text-gray-500">"No " {plural} " yet."</div> }.into_any(),
        ),
        Listing::Ready(_) => None,
    }
}

pub fn status_badge(status: RecordStatus) -> impl IntoView {
    let class = match status {
        RecordStatus::Active => "px-2 py-0.5 text-xs bg-green-100 text-green-700 rounded",
        RecordStatus::Inactive => "px-2 py-0.5 text-xs bg-gray-200 text-gray-600 rounded",
    };
    view! { <span class=class>{status.as_str()}</span> }
}

/// Adds `id` to `ids` when checked, removes it otherwise.
pub fn toggle_id(ids: &[String], id: &str, checked: bool) -> Vec<String> {
    let mut next: Vec<String> = ids.iter().filter(|existing| *existing != id).cloned().collect();
    if checked {
        next.push(id.to_string());
    }
    next
}

pub const INPUT_CLASS: &str =
    "w-full px-3 py-2 border rounded text-sm focus:ring-2 focus:ring-blue-500 focus:border-blue-500";
pub const PRIMARY_BUTTON: &str =
    "px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50";
pub const SECONDARY_BUTTON: &str =
    "px-4 py-2 text-sm bg-gray-200 text-gray-700 rounded hover:bg-gray-300 disabled:opacity-50";
pub const ROW_BUTTON: &str = "px-2 py-1 text-xs rounded hover:bg-gray-100 text-blue-600";
pub const DANGER_ROW_BUTTON: &str = "px-2 py-1 text-xs rounded hover:bg-red-50 text-red-600";
