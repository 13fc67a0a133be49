//! Knowledge base management tab
//!
//! Documents are uploaded with the knowledge base itself; a new knowledge
//! base needs at least one file.

use super::confirm_dialog::ConfirmDeleteDialog;
use super::fields::{form_actions, status_select, text_area, text_input};
use super::notices::{flash_success, ErrorBanner, SuccessNotice};
use super::{listing_notice, status_badge, use_clients, DANGER_ROW_BUTTON, INPUT_CLASS, ROW_BUTTON};
use crate::transport::read_selected_files;
use crate::types::KnowledgeBase;
use leptos::html::Input;
use leptos::prelude::*;

#[component]
pub fn KnowledgeBasesTab() -> impl IntoView {
    let knowledge_bases = use_clients().knowledge_bases;
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (success, set_success) = signal(None::<String>);
    let editing = knowledge_bases.is_editing();
    let file_input = NodeRef::<Input>::new();

    Effect::new(move || {
        knowledge_bases.refresh();
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = file_input.get_untracked();
        set_saving.set(true);
        knowledge_bases.spawn(move |client| async move {
            let files = match &input {
                Some(input) => read_selected_files(input).await,
                None => Ok(Vec::new()),
            };
            match files {
                Ok(files) => {
                    if let Ok(kb) = client.submit(&files).await {
                        if let Some(input) = &input {
                            input.set_value("");
                        }
                        flash_success(set_success, format!("Knowledge base \"{}\" saved", kb.name));
                    }
                }
                Err(e) => {
                    log::error!("Could not read selected files: {}", e);
                    client.record_error(e);
                }
            }
            set_saving.set(false);
        });
    };

    let on_cancel = Callback::new(move |_| knowledge_bases.update(|c| c.reset_draft()));

    view! {
        <div class="space-y-6">
            <SuccessNotice message=success />
            <ErrorBanner message=knowledge_bases.error_message() on_dismiss=knowledge_bases.dismiss_error() />

            <form class="bg-white p-4 rounded-lg shadow space-y-3" on:submit=on_submit>
                <h3 class="text-lg font-semibold text-gray-700">
                    {move || if editing.get() { "Edit Knowledge Base" } else { "New Knowledge Base" }}
                </h3>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                    {text_input(knowledge_bases, "name", "Name", |kb: &KnowledgeBase| kb.name.clone())}
                    {text_input(knowledge_bases, "slug", "Slug", |kb: &KnowledgeBase| kb.slug.clone())}
                    {text_input(knowledge_bases, "embedding_model", "Embedding Model", |kb: &KnowledgeBase| kb.embedding_model.clone())}
                    {status_select(knowledge_bases, |kb: &KnowledgeBase| kb.status)}
                </div>
                {text_area(knowledge_bases, "description", "Description", |kb: &KnowledgeBase| kb.description.clone())}
                <div>
                    <label class="block text-sm text-gray-600 mb-1">
                        {move || if editing.get() { "Add documents (optional)" } else { "Documents (at least one)" }}
                    </label>
                    <input type="file" multiple class=INPUT_CLASS node_ref=file_input />
                </div>
                {form_actions(knowledge_bases, saving, on_cancel)}
            </form>

            <div class="bg-white rounded-lg shadow divide-y">
                {move || {
                    let listing = knowledge_bases.with(|c| c.listing());
                    if let Some(notice) = listing_notice(&listing, "knowledge bases") {
                        return notice;
                    }
                    listing
                        .items()
                        .iter()
                        .cloned()
                        .map(|entry| {
                            let kb = entry.knowledgebase;
                            let id = kb.id.clone().unwrap_or_default();
                            let id_for_delete = id.clone();
                            let name_for_delete = kb.name.clone();
                            let documents = entry.documents.len();
                            view! {
                                <div class="flex items-center justify-between p-3">
                                    <div class="flex items-center gap-3">
                                        <span class="font-medium">{kb.name.clone()}</span>
                                        {status_badge(kb.status)}
                                        <span class="text-sm text-gray-500">
                                            {format!("{} document(s)", documents)}
                                        </span>
                                    </div>
                                    <div class="flex gap-1">
                                        <button class=ROW_BUTTON on:click=move |_| {
                                            knowledge_bases.update(|c| c.start_edit(&id));
                                        }>"Edit"</button>
                                        <button class=DANGER_ROW_BUTTON on:click=move |_| {
                                            knowledge_bases.update(|c| c.request_delete(id_for_delete.clone(), name_for_delete.clone()));
                                        }>"Delete"</button>
                                    </div>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <ConfirmDeleteDialog
                pending=knowledge_bases.pending_delete()
                kind="knowledge base"
                deleting=deleting
                on_cancel=knowledge_bases.cancel_delete()
                on_confirm=knowledge_bases.confirm_delete(set_deleting)
            />
        </div>
    }
}
