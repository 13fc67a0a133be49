//! Chat page for trying out an agent

use super::{listing_notice, use_clients, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::chat::{ChatClient, ChatMessage, ChatRole};
use crate::shell::NavState;
use leptos::prelude::*;
use std::rc::Rc;

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn local_time(timestamp_ms: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp_ms));
    String::from(date.to_locale_time_string("default"))
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let clients = use_clients();
    let agents = clients.agents;
    let nav = expect_context::<RwSignal<NavState>>();
    let chat = StoredValue::new_local(Rc::new(ChatClient::new(clients.backend())));
    let revision = RwSignal::new(0u64);
    let bump = move || revision.update(|n| *n += 1);

    let session = Memo::new(move |_| {
        let _ = revision.get();
        chat.with_value(|c| c.session())
    });

    let select_agent = move |agent_id: String| {
        let client = chat.get_value();
        let epoch = client.select_agent(&agent_id);
        bump();
        wasm_bindgen_futures::spawn_local(async move {
            client.load_suggestions(&agent_id, epoch).await;
            bump();
        });
    };

    Effect::new(move || {
        agents.refresh();
        if let Some(agent_id) = nav.with_untracked(|n| n.selected_agent.clone()) {
            select_agent(agent_id);
        }
    });

    let send = move || {
        let client = chat.get_value();
        let Some(pending) = client.begin_send(now_ms()) else {
            return;
        };
        bump();
        wasm_bindgen_futures::spawn_local(async move {
            client.complete(pending, now_ms).await;
            bump();
        });
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="p-6 h-full flex flex-col gap-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"Test Agent"</h2>
                <button class=SECONDARY_BUTTON on:click=move |_| nav.update(|n| n.back_to_dashboard())>
                    "Back to Dashboard"
                </button>
            </div>

            <div class="flex flex-wrap gap-2">
                {move || {
                    let listing = agents.with(|c| c.listing());
                    if let Some(notice) = listing_notice(&listing, "agents") {
                        return notice;
                    }
                    let selected = session.with(|s| s.agent_id().map(str::to_string));
                    listing
                        .items()
                        .iter()
                        .filter_map(|agent| Some((agent.id.clone()?, agent.name.clone())))
                        .map(|(id, name)| {
                            let class = if selected.as_deref() == Some(id.as_str()) {
                                "px-3 py-1.5 text-sm rounded bg-blue-600 text-white"
                            } else {
                                "px-3 py-1.5 text-sm rounded bg-gray-200 text-gray-800 hover:bg-gray-300"
                            };
                            view! {
                                <button class=class on:click=move |_| select_agent(id.clone())>{name}</button>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </div>

            <div class="flex-1 overflow-y-auto bg-white rounded-lg shadow p-4 space-y-3">
                {move || {
                    let messages = session.with(|s| s.messages().to_vec());
                    if session.with(|s| s.agent_id().is_none()) {
                        return view! { <div class="text-center text-gray-500">"Select an agent to start chatting."</div> }.into_any();
                    }
                    if messages.is_empty() {
                        return view! { <div class="text-center text-gray-500">"No messages yet."</div> }.into_any();
                    }
                    messages.into_iter().map(message_bubble).collect::<Vec<_>>().into_any()
                }}
                {move || session.with(|s| s.is_awaiting_reply()).then(|| view! {
                    <div class="text-sm text-gray-400">"Thinking..."</div>
                })}
            </div>

            <div class="flex flex-wrap gap-2">
                {move || {
                    session
                        .with(|s| s.suggestions().to_vec())
                        .into_iter()
                        .map(|prompt| {
                            let title = prompt.prompt_title.clone();
                            view! {
                                <button
                                    class="px-3 py-1 text-xs rounded-full bg-blue-50 text-blue-700 hover:bg-blue-100"
                                    on:click=move |_| {
                                        chat.with_value(|c| c.with_session(|s| s.use_suggestion(&prompt)));
                                        bump();
                                    }
                                >
                                    {title}
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>

            <div class="flex gap-2">
                <textarea
                    class="flex-1 px-3 py-2 border rounded text-sm focus:ring-2 focus:ring-blue-500"
                    rows=2
                    placeholder="Type a message. Enter sends, Shift+Enter adds a line."
                    prop:value=move || session.with(|s| s.input().to_string())
                    on:input=move |ev| {
                        chat.with_value(|c| c.with_session(|s| s.set_input(event_target_value(&ev))));
                        bump();
                    }
                    on:keydown=on_keydown
                ></textarea>
                <button
                    class=PRIMARY_BUTTON
                    disabled=move || !session.with(|s| s.can_send())
                    on:click=move |_| send()
                >
                    {move || if session.with(|s| s.is_awaiting_reply()) { "Sending..." } else { "Send" }}
                </button>
            </div>
        </div>
    }
}

fn message_bubble(message: ChatMessage) -> impl IntoView {
    let (row_class, bubble_class) = match message.role {
        ChatRole::User => ("flex justify-end", "max-w-[75%] rounded-lg px-3 py-2 bg-blue-600 text-white"),
        ChatRole::Assistant => ("flex justify-start", "max-w-[75%] rounded-lg px-3 py-2 bg-gray-100 text-gray-900"),
    };
    let usage = message.usage.map(|usage| {
        let part = |label: &str, value: Option<u64>| value.map(|v| format!("{} {}", label, v));
        [
            part("in", usage.input_tokens),
            part("out", usage.output_tokens),
            part("total", usage.total_tokens),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ")
    });
    view! {
        <div class=row_class>
            <div class=bubble_class>
                <div class="whitespace-pre-wrap text-sm">{message.content}</div>
                <div class="text-[10px] opacity-70 mt-1 flex gap-2">
                    <span>{local_time(message.timestamp_ms)}</span>
                    {usage.map(|u| view! { <span>"tokens: " {u}</span> })}
                </div>
            </div>
        </div>
    }
}
