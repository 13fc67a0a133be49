use leptos::prelude::*;

mod api;
mod chat;
mod components;
mod editor;
mod error;
mod mcp_form;
mod prompt_rows;
mod resource;
mod shell;
#[cfg(test)]
mod testing;
mod transport;
mod types;

use api::Backend;
use components::chat::ChatPage;
use components::dashboard::Dashboard;
use components::Clients;
use shell::{NavState, Page};

#[component]
pub fn App() -> impl IntoView {
    let nav = RwSignal::new(NavState::default());
    provide_context(nav);
    provide_context(Clients::new(Backend::browser()));

    let page = Memo::new(move |_| nav.with(|n| n.page));

    view! {
        <div class="min-h-screen bg-gray-100 flex flex-col">
            <header class="bg-gray-800 text-white px-6 py-4 flex items-center justify-between">
                <h1 class="text-2xl font-bold">"Agent Studio"</h1>
                <button
                    class="px-4 py-2 text-sm bg-blue-600 rounded hover:bg-blue-700"
                    on:click=move |_| nav.update(|n| n.show_chat())
                >
                    "Test Agent"
                </button>
            </header>

            <main class="flex-1 overflow-y-auto">
                {move || match page.get() {
                    Page::Dashboard => view! { <Dashboard /> }.into_any(),
                    Page::Chat => view! { <ChatPage /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(App);
}
