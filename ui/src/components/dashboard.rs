use super::agents::AgentsTab;
use super::knowledge_bases::KnowledgeBasesTab;
use super::mcp_servers::McpServersTab;
use super::triggers::TriggersTab;
use crate::shell::{DashboardTab, NavState};
use leptos::prelude::*;

/// Management tabs for agents and their plugins
#[component]
pub fn Dashboard() -> impl IntoView {
    let nav = expect_context::<RwSignal<NavState>>();
    let active_tab = Memo::new(move |_| nav.with(|n| n.tab));

    view! {
        <div class="p-6 space-y-6">
            <div class="flex gap-1 border-b">
                {DashboardTab::ALL
                    .iter()
                    .map(|tab| {
                        let tab = *tab;
                        view! {
                            <button
                                class=move || {
                                    if active_tab.get() == tab {
                                        "px-4 py-2 text-sm font-medium border-b-2 border-blue-600 text-blue-700"
                                    } else {
                                        "px-4 py-2 text-sm text-gray-600 hover:text-gray-900"
                                    }
                                }
                                on:click=move |_| nav.update(|n| n.select_tab(tab))
                            >
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>

            {move || match active_tab.get() {
                DashboardTab::Agents => view! { <AgentsTab /> }.into_any(),
                DashboardTab::KnowledgeBases => view! { <KnowledgeBasesTab /> }.into_any(),
                DashboardTab::McpServers => view! { <McpServersTab /> }.into_any(),
                DashboardTab::Triggers => view! { <TriggersTab /> }.into_any(),
            }}
        </div>
    }
}
