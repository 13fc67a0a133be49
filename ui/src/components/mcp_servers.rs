//! MCP server management tab

use super::confirm_dialog::ConfirmDeleteDialog;
use super::fields::{form_actions, password_input, text_area, text_input};
use super::notices::{flash_success, ErrorBanner, SuccessNotice};
use super::{listing_notice, status_badge, use_clients, DANGER_ROW_BUTTON, INPUT_CLASS, ROW_BUTTON};
use crate::editor::FieldValue;
use crate::mcp_form::{ConnectionMode, LaunchCommand, McpForm};
use crate::types::{McpServer, McpTransport, RecordStatus};
use leptos::prelude::*;

#[component]
pub fn McpServersTab() -> impl IntoView {
    let servers = use_clients().mcp_servers;
    let form = RwSignal::new(McpForm::new());
    let (saving, set_saving) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (success, set_success) = signal(None::<String>);
    let editing = servers.is_editing();

    Effect::new(move || {
        servers.refresh();
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current = form.get_untracked();
        set_saving.set(true);
        servers.spawn(move |client| async move {
            client.edit_draft(|editor| {
                let built = current.build(editor.buffer());
                editor.update(|server| *server = built);
            });
            if let Ok(server) = client.submit(&[]).await {
                form.set(McpForm::new());
                flash_success(set_success, format!("MCP server \"{}\" saved", server.name));
            }
            set_saving.set(false);
        });
    };

    let on_cancel = Callback::new(move |_| {
        servers.update(|c| c.reset_draft());
        form.set(McpForm::new());
    });

    let toggle_status = move |id: String| {
        servers.spawn(move |client| async move {
            if let Err(e) = client.toggle_status(&id).await {
                log::warn!("Toggle failed: {}", e);
            }
        });
    };

    let is_local = Memo::new(move |_| form.with(|f| f.mode() == ConnectionMode::Local));

    // base_url holds a URL in cloud mode and a launch command in local mode
    let switch_mode = move |mode: ConnectionMode| {
        if form.with_untracked(|f| f.mode()) != mode {
            form.update(|f| f.set_mode(mode));
            servers.set_field("base_url", FieldValue::text(""));
        }
    };

    view! {
        <div class="space-y-6">
            <SuccessNotice message=success />
            <ErrorBanner message=servers.error_message() on_dismiss=servers.dismiss_error() />

            <form class="bg-white p-4 rounded-lg shadow space-y-3" on:submit=on_submit>
                <h3 class="text-lg font-semibold text-gray-700">
                    {move || if editing.get() { "Edit MCP Server" } else { "New MCP Server" }}
                </h3>

                <div class="flex gap-6 text-sm">
                    <label>
                        <input
                            type="radio"
                            name="mode"
                            class="mr-2"
                            prop:checked=move || !is_local.get()
                            on:change=move |_| switch_mode(ConnectionMode::Cloud)
                        />
                        "Cloud"
                    </label>
                    <label>
                        <input
                            type="radio"
                            name="mode"
                            class="mr-2"
                            prop:checked=move || is_local.get()
                            on:change=move |_| switch_mode(ConnectionMode::Local)
                        />
                        "Local"
                    </label>
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                    {text_input(servers, "name", "Name", |s: &McpServer| s.name.clone())}
                    {move || if is_local.get() {
                        view! {
                            <select
                                class=INPUT_CLASS
                                prop:value=move || form.with(|f| f.command().as_str())
                                on:change=move |ev| {
                                    let command = LaunchCommand::parse(&event_target_value(&ev));
                                    form.update(|f| f.set_command(command));
                                }
                            >
                                {LaunchCommand::ALL
                                    .iter()
                                    .map(|command| view! { <option value=command.as_str()>{command.as_str()}</option> })
                                    .collect::<Vec<_>>()}
                            </select>
                            <input
                                type="text"
                                class=INPUT_CLASS
                                placeholder="Absolute path to server"
                                prop:value=move || form.with(|f| f.server_path().to_string())
                                on:input=move |ev| form.update(|f| f.set_server_path(event_target_value(&ev)))
                            />
                        }
                        .into_any()
                    } else {
                        view! {
                            <select
                                class=INPUT_CLASS
                                prop:value=move || form.with(|f| f.transport().as_str())
                                on:change=move |ev| {
                                    let transport = McpTransport::from(event_target_value(&ev));
                                    form.update(|f| f.set_cloud_transport(transport));
                                }
                            >
                                <option value="sse">{McpTransport::Sse.label()}</option>
                                <option value="streamable_http">{McpTransport::StreamableHttp.label()}</option>
                            </select>
                            {text_input(servers, "base_url", "Base URL", |s: &McpServer| s.base_url.clone())}
                            {password_input(servers, "api_key", "API Key", |s: &McpServer| s.api_key.clone().unwrap_or_default())}
                        }
                        .into_any()
                    }}
                </div>

                {text_area(servers, "description", "Description", |s: &McpServer| s.description.clone().unwrap_or_default())}

                <div class="space-y-2">
                    <div class="flex justify-between items-center">
                        <span class="text-sm text-gray-600">"Arguments"</span>
                        <button type="button" class=ROW_BUTTON on:click=move |_| form.update(|f| f.add_arg())>
                            "+ Add argument"
                        </button>
                    </div>
                    {move || {
                        form.with(|f| f.args().to_vec())
                            .into_iter()
                            .enumerate()
                            .map(|(index, arg)| {
                                let value_for_key = arg.value.clone();
                                let key_for_value = arg.key.clone();
                                view! {
                                    <div class="flex gap-2">
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            placeholder="Key"
                                            prop:value=arg.key.clone()
                                            on:change=move |ev| {
                                                let key = event_target_value(&ev);
                                                let value = value_for_key.clone();
                                                form.update(|f| f.set_arg(index, key, value));
                                            }
                                        />
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            placeholder="Value"
                                            prop:value=arg.value.clone()
                                            on:change=move |ev| {
                                                let value = event_target_value(&ev);
                                                let key = key_for_value.clone();
                                                form.update(|f| f.set_arg(index, key, value));
                                            }
                                        />
                                        <button type="button" class=DANGER_ROW_BUTTON on:click=move |_| form.update(|f| f.remove_arg(index))>
                                            "Remove"
                                        </button>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </div>

                {form_actions(servers, saving, on_cancel)}
            </form>

            <div class="bg-white rounded-lg shadow divide-y">
                {move || {
                    let listing = servers.with(|c| c.listing());
                    if let Some(notice) = listing_notice(&listing, "MCP servers") {
                        return notice;
                    }
                    listing
                        .items()
                        .iter()
                        .cloned()
                        .map(|server| {
                            let id = server.id.clone().unwrap_or_default();
                            let id_for_toggle = id.clone();
                            let id_for_delete = id.clone();
                            let name_for_delete = server.name.clone();
                            let server_for_edit = server.clone();
                            let args = server
                                .args
                                .iter()
                                .map(|arg| format!("{}={}", arg.key, arg.value.clone().unwrap_or_default()))
                                .collect::<Vec<_>>()
                                .join(", ");
                            view! {
                                <div class="flex items-center justify-between p-3">
                                    <div>
                                        <div class="flex items-center gap-3">
                                            <span class="font-medium">{server.name.clone()}</span>
                                            <span class="text-sm text-gray-500">{server.transport.label()}</span>
                                            <span class="text-sm font-mono text-gray-500">{server.base_url.clone()}</span>
                                            {status_badge(server.status)}
                                        </div>
                                        {(!args.is_empty()).then(|| view! {
                                            <div class="text-xs text-gray-500 mt-1">"Args: " {args.clone()}</div>
                                        })}
                                    </div>
                                    <div class="flex gap-1">
                                        <button class=ROW_BUTTON on:click=move |_| toggle_status(id_for_toggle.clone())>
                                            {match server.status {
                                                RecordStatus::Active => "Deactivate",
                                                RecordStatus::Inactive => "Activate",
                                            }}
                                        </button>
                                        <button class=ROW_BUTTON on:click=move |_| {
                                            if servers.update(|c| c.start_edit(&id)) {
                                                form.set(McpForm::from_server(&server_for_edit));
                                            }
                                        }>"Edit"</button>
                                        <button class=DANGER_ROW_BUTTON on:click=move |_| {
                                            servers.update(|c| c.request_delete(id_for_delete.clone(), name_for_delete.clone()));
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
                pending=servers.pending_delete()
                kind="MCP server"
                deleting=deleting
                on_cancel=servers.cancel_delete()
                on_confirm=servers.confirm_delete_then(set_deleting, Callback::new(move |_| form.set(McpForm::new())))
            />
        </div>
    }
}
