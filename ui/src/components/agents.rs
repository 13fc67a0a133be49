//! Agent management tab
//!
//! Besides the agent record itself the form edits the agent's suggestion
//! prompts. They are written one by one after the agent write.

use super::confirm_dialog::ConfirmDeleteDialog;
use super::fields::{form_actions, password_input, status_select, text_area, text_input};
use super::notices::{flash_success, ErrorBanner, SuccessNotice};
use super::{
    listing_notice, status_badge, toggle_id, use_clients, ClientHandle, DANGER_ROW_BUTTON, INPUT_CLASS,
    ROW_BUTTON,
};
use crate::api::suggestion_prompts_path;
use crate::editor::FieldValue;
use crate::prompt_rows::{load_prompt_rows, save_agent_with_prompts, PromptRows, Removal};
use crate::shell::NavState;
use crate::types::{Agent, SuggestionPrompt};
use leptos::prelude::*;

#[component]
pub fn AgentsTab() -> impl IntoView {
    let clients = use_clients();
    let agents = clients.agents;
    let nav = expect_context::<RwSignal<NavState>>();

    let prompt_rows = RwSignal::new(PromptRows::new());
    let prompt_panel = RwSignal::new(None::<(String, String)>);
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (success, set_success) = signal(None::<String>);
    let (prompt_error, set_prompt_error) = signal(None::<String>);
    let editing = agents.is_editing();

    Effect::new(move || {
        agents.refresh();
        clients.knowledge_bases.refresh();
        clients.mcp_servers.refresh();
        clients.triggers.refresh();
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let rows = prompt_rows.get_untracked();
        set_saving.set(true);
        set_prompt_error.set(None);
        agents.spawn(move |client| async move {
            let edited_id = client.editor().buffer().id.clone();
            let report = save_agent_with_prompts(&client, &rows).await;
            set_prompt_error.set(report.prompt_failure());
            match (&report.agent, edited_id) {
                (Ok(agent), _) => {
                    if report.prompt_failure().is_none() {
                        flash_success(set_success, format!("Agent \"{}\" saved", agent.name));
                    }
                    prompt_rows.set(PromptRows::new());
                }
                // Prompts were written anyway; reload them so new rows are not posted twice
                (Err(_), Some(agent_id)) => {
                    prompt_rows.set(load_prompt_rows(client.backend(), &agent_id).await);
                }
                (Err(_), None) => {}
            }
            set_saving.set(false);
        });
    };

    let on_cancel = Callback::new(move |_| {
        agents.update(|c| c.reset_draft());
        prompt_rows.set(PromptRows::new());
    });

    let start_edit = move |id: String| {
        if !agents.update(|c| c.start_edit(&id)) {
            return;
        }
        prompt_rows.set(PromptRows::new());
        let backend = clients.backend();
        wasm_bindgen_futures::spawn_local(async move {
            let rows = load_prompt_rows(&backend, &id).await;
            // Ignore rows for an agent that is no longer being edited
            let still_editing = agents.with_untracked(|c| c.editor().buffer().id.as_deref() == Some(id.as_str()));
            if still_editing {
                prompt_rows.set(rows);
            }
        });
    };

    let remove_row = move |key: u64| {
        let Some(removal) = prompt_rows.with_untracked(|rows| rows.removal(key)) else {
            return;
        };
        let agent_id = agents.with_untracked(|c| c.editor().buffer().id.clone());
        match (removal, agent_id) {
            (Removal::Remote(prompt_id), Some(agent_id)) => {
                let backend = clients.backend();
                wasm_bindgen_futures::spawn_local(async move {
                    match backend.delete_suggestion_prompt(&agent_id, &prompt_id).await {
                        Ok(()) => prompt_rows.update(|rows| rows.discard(key)),
                        Err(e) => set_prompt_error.set(Some(format!("Failed to delete prompt: {}", e))),
                    }
                });
            }
            _ => prompt_rows.update(|rows| rows.discard(key)),
        }
    };

    view! {
        <div class="space-y-6">
            <SuccessNotice message=success />
            <ErrorBanner message=agents.error_message() on_dismiss=agents.dismiss_error() />
            <ErrorBanner message=prompt_error on_dismiss=Callback::new(move |_| set_prompt_error.set(None)) />

            <form class="bg-white p-4 rounded-lg shadow space-y-4" on:submit=on_submit>
                <h3 class="text-lg font-semibold text-gray-700">
                    {move || if editing.get() { "Edit Agent" } else { "New Agent" }}
                </h3>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                    {text_input(agents, "name", "Name", |a: &Agent| a.name.clone())}
                    {text_input(agents, "slug", "Slug", |a: &Agent| a.slug.clone())}
                    {text_input(agents, "model", "Model", |a: &Agent| a.model.clone())}
                    {text_input(agents, "base_url", "Base URL", |a: &Agent| a.base_url.clone())}
                    {password_input(agents, "api_key", "API Key", |a: &Agent| a.api_key.clone())}
                    <input
                        type="number"
                        min="1"
                        class=INPUT_CLASS
                        placeholder="Max Tokens"
                        prop:value=move || agents.read(|a| a.max_tokens.map(|n| n.to_string()).unwrap_or_default())
                        on:input=move |ev| agents.set_field("max_tokens", FieldValue::Text(event_target_value(&ev)))
                    />
                    {status_select(agents, |a: &Agent| a.status)}
                    <select
                        class=INPUT_CLASS
                        prop:value=move || agents.read(|a| a.accessibility.as_str())
                        on:change=move |ev| agents.set_field("accessibility", FieldValue::Text(event_target_value(&ev)))
                    >
                        <option value="public">"Public"</option>
                        <option value="private">"Private"</option>
                    </select>
                </div>
                {text_area(agents, "instructions", "Instructions", |a: &Agent| a.instructions.clone())}

                <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                    {reference_picker(
                        agents,
                        "knowledgebase_ids",
                        "Knowledge Bases",
                        |a: &Agent| a.knowledgebase_ids.clone(),
                        Signal::derive(move || clients.knowledge_bases.with(|c| {
                            c.items()
                                .into_iter()
                                .filter_map(|entry| Some((entry.knowledgebase.id?, entry.knowledgebase.name)))
                                .collect()
                        })),
                    )}
                    {reference_picker(
                        agents,
                        "mcp_server_ids",
                        "MCP Servers",
                        |a: &Agent| a.mcp_server_ids.clone(),
                        Signal::derive(move || clients.mcp_servers.with(|c| {
                            c.items().into_iter().filter_map(|s| Some((s.id?, s.name))).collect()
                        })),
                    )}
                    {reference_picker(
                        agents,
                        "trigger_ids",
                        "Triggers",
                        |a: &Agent| a.trigger_ids.clone(),
                        Signal::derive(move || clients.triggers.with(|c| {
                            c.items().into_iter().filter_map(|t| Some((t.id?, t.name))).collect()
                        })),
                    )}
                </div>

                <div class="space-y-2">
                    <div class="flex justify-between items-center">
                        <span class="text-sm font-medium text-gray-700">"Suggestion Prompts"</span>
                        <button type="button" class=ROW_BUTTON on:click=move |_| {
                            prompt_rows.update(|rows| {
                                rows.add();
                            });
                        }>"+ Add prompt"</button>
                    </div>
                    <For
                        each=move || prompt_rows.with(|rows| rows.rows().iter().map(|row| row.key).collect::<Vec<_>>())
                        key=|key| *key
                        children=move |key: u64| {
                            let read_row = move |f: fn(&crate::prompt_rows::PromptRow) -> String| {
                                prompt_rows.with(|rows| {
                                    rows.rows().iter().find(|row| row.key == key).map(f).unwrap_or_default()
                                })
                            };
                            view! {
                                <div class="flex gap-2 items-start">
                                    <input
                                        type="text"
                                        class=INPUT_CLASS
                                        placeholder="Prompt title"
                                        prop:value=move || read_row(|row| row.title.clone())
                                        on:input=move |ev| prompt_rows.update(|rows| rows.set_title(key, event_target_value(&ev)))
                                    />
                                    <textarea
                                        class=INPUT_CLASS
                                        rows=2
                                        placeholder="Prompt"
                                        prop:value=move || read_row(|row| row.body.clone())
                                        on:input=move |ev| prompt_rows.update(|rows| rows.set_body(key, event_target_value(&ev)))
                                    ></textarea>
                                    {move || prompt_rows.with(|rows| rows.can_remove()).then(|| view! {
                                        <button type="button" class=DANGER_ROW_BUTTON on:click=move |_| remove_row(key)>
                                            "Remove"
                                        </button>
                                    })}
                                </div>
                            }
                        }
                    />
                    {move || prompt_rows.with(|rows| rows.summary(editing.get())).map(|summary| view! {
                        <p class="text-xs text-gray-500">{summary}</p>
                    })}
                </div>

                {form_actions(agents, saving, on_cancel)}
            </form>

            <div class="bg-white rounded-lg shadow divide-y">
                {move || {
                    let listing = agents.with(|c| c.listing());
                    if let Some(notice) = listing_notice(&listing, "agents") {
                        return notice;
                    }
                    listing
                        .items()
                        .iter()
                        .cloned()
                        .map(|agent| {
                            let id = agent.id.clone().unwrap_or_default();
                            let id_for_chat = id.clone();
                            let id_for_prompts = id.clone();
                            let id_for_delete = id.clone();
                            let name_for_prompts = agent.name.clone();
                            let name_for_delete = agent.name.clone();
                            view! {
                                <div class="flex items-center justify-between p-3">
                                    <div class="flex items-center gap-3">
                                        <span class="font-medium">{agent.name.clone()}</span>
                                        <span class="text-sm font-mono text-gray-500">{agent.slug.clone()}</span>
                                        <span class="text-sm text-gray-500">{agent.model.clone()}</span>
                                        {status_badge(agent.status)}
                                        <span class="text-xs text-gray-500">{agent.accessibility.as_str()}</span>
                                    </div>
                                    <div class="flex gap-1">
                                        <button class=ROW_BUTTON on:click=move |_| start_edit(id.clone())>"Edit"</button>
                                        <button class=ROW_BUTTON on:click=move |_| {
                                            nav.update(|n| n.open_chat(id_for_chat.clone()));
                                        }>"Chat"</button>
                                        <button class=ROW_BUTTON on:click=move |_| {
                                            prompt_panel.set(Some((id_for_prompts.clone(), name_for_prompts.clone())));
                                        }>"Prompts"</button>
                                        <button class=DANGER_ROW_BUTTON on:click=move |_| {
                                            agents.update(|c| c.request_delete(id_for_delete.clone(), name_for_delete.clone()));
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
                pending=agents.pending_delete()
                kind="agent"
                deleting=deleting
                on_cancel=agents.cancel_delete()
                on_confirm=agents.confirm_delete_then(set_deleting, Callback::new(move |_| prompt_rows.set(PromptRows::new())))
            />

            {move || prompt_panel.get().map(|(agent_id, agent_name)| view! {
                <SuggestionPromptPanel
                    agent_id=agent_id
                    agent_name=agent_name
                    on_close=Callback::new(move |_| prompt_panel.set(None))
                />
            })}
        </div>
    }
}

/// Checkbox group storing the selected ids in an agent field
fn reference_picker(
    agents: ClientHandle<Agent>,
    field: &'static str,
    label: &'static str,
    read: fn(&Agent) -> Vec<String>,
    options: Signal<Vec<(String, String)>>,
) -> impl IntoView {
    view! {
        <div class="border rounded p-3">
            <div class="text-sm font-medium text-gray-700 mb-2">{label}</div>
            {move || {
                let options = options.get();
                if options.is_empty() {
                    return view! { <div class="text-xs text-gray-400">"None available"</div> }.into_any();
                }
                options
                    .into_iter()
                    .map(|(id, name)| {
                        let id_for_check = id.clone();
                        view! {
                            <label class="flex items-center gap-2 text-sm">
                                <input
                                    type="checkbox"
                                    prop:checked=move || agents.read(|a| read(a).contains(&id_for_check))
                                    on:change=move |ev| {
                                        let selected = agents.read(read);
                                        let next = toggle_id(&selected, &id, event_target_checked(&ev));
                                        agents.set_field(field, FieldValue::Ids(next));
                                    }
                                />
                                {name}
                            </label>
                        }
                    })
                    .collect::<Vec<_>>()
                    .into_any()
            }}
        </div>
    }
}

/// Stand-alone editor for one agent's suggestion prompts
#[component]
fn SuggestionPromptPanel(agent_id: String, agent_name: String, on_close: Callback<()>) -> impl IntoView {
    let clients = use_clients();
    let prompts = ClientHandle::<SuggestionPrompt>::new(clients.backend(), suggestion_prompts_path(&agent_id));
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (success, set_success) = signal(None::<String>);

    prompts.refresh();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        prompts.spawn(move |client| async move {
            if let Ok(prompt) = client.submit(&[]).await {
                flash_success(set_success, format!("Prompt \"{}\" saved", prompt.prompt_title));
            }
            set_saving.set(false);
        });
    };

    let on_cancel = Callback::new(move |_| prompts.update(|c| c.reset_draft()));

    view! {
        <div class="fixed inset-0 bg-gray-600 bg-opacity-50 z-40 flex items-center justify-center p-4">
            <div class="w-full max-w-2xl max-h-[85vh] overflow-y-auto bg-white rounded-lg shadow-xl p-5 space-y-4">
                <div class="flex justify-between items-center">
                    <h3 class="text-lg font-semibold text-gray-800">"Suggestion Prompts: " {agent_name}</h3>
                    <button class=ROW_BUTTON on:click=move |_| on_close.run(())>"Close"</button>
                </div>

                <SuccessNotice message=success />
                <ErrorBanner message=prompts.error_message() on_dismiss=prompts.dismiss_error() />

                <form class="space-y-3" on:submit=on_submit>
                    {text_input(prompts, "prompt_title", "Title", |p: &SuggestionPrompt| p.prompt_title.clone())}
                    {text_area(prompts, "prompt", "Prompt", |p: &SuggestionPrompt| p.prompt.clone())}
                    {form_actions(prompts, saving, on_cancel)}
                </form>

                <div class="divide-y border rounded">
                    {move || {
                        let listing = prompts.with(|c| c.listing());
                        if let Some(notice) = listing_notice(&listing, "suggestion prompts") {
                            return notice;
                        }
                        listing
                            .items()
                            .iter()
                            .cloned()
                            .map(|prompt| {
                                let id = prompt.id.clone().unwrap_or_default();
                                let id_for_delete = id.clone();
                                let title_for_delete = prompt.prompt_title.clone();
                                view! {
                                    <div class="flex items-start justify-between p-3 gap-4">
                                        <div>
                                            <div class="font-medium text-sm">{prompt.prompt_title.clone()}</div>
                                            <div class="text-xs text-gray-500 whitespace-pre-wrap">{prompt.prompt.clone()}</div>
                                        </div>
                                        <div class="flex gap-1">
                                            <button class=ROW_BUTTON on:click=move |_| {
                                                prompts.update(|c| c.start_edit(&id));
                                            }>"Edit"</button>
                                            <button class=DANGER_ROW_BUTTON on:click=move |_| {
                                                prompts.update(|c| c.request_delete(id_for_delete.clone(), title_for_delete.clone()));
                                            }>"Delete"</button>
                                        </div>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                            .into_any()
                    }}
                </div>
            </div>

            <ConfirmDeleteDialog
                pending=prompts.pending_delete()
                kind="suggestion prompt"
                deleting=deleting
                on_cancel=prompts.cancel_delete()
                on_confirm=prompts.confirm_delete(set_deleting)
            />
        </div>
    }
}
