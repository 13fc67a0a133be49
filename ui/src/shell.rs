//! Page switching between the dashboard and the chat tester

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    Chat,
}

/// Management tabs of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Agents,
    KnowledgeBases,
    McpServers,
    Triggers,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Agents,
        DashboardTab::KnowledgeBases,
        DashboardTab::McpServers,
        DashboardTab::Triggers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Agents => "Agents",
            DashboardTab::KnowledgeBases => "Knowledge Bases",
            DashboardTab::McpServers => "MCP Servers",
            DashboardTab::Triggers => "Triggers",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub page: Page,
    pub tab: DashboardTab,
    pub selected_agent: Option<String>,
}

impl NavState {
    /// "Chat" on an agent row: select it and switch pages.
    pub fn open_chat(&mut self, agent_id: impl Into<String>) {
        self.selected_agent = Some(agent_id.into());
        self.page = Page::Chat;
    }

    /// Header "Test Agent" button; keeps the current selection.
    pub fn show_chat(&mut self) {
        self.page = Page::Chat;
    }

    pub fn back_to_dashboard(&mut self) {
        self.selected_agent = None;
        self.page = Page::Dashboard;
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_flow() {
        let mut nav = NavState::default();
        assert_eq!(nav.page, Page::Dashboard);
        assert_eq!(nav.tab, DashboardTab::Agents);

        nav.select_tab(DashboardTab::Triggers);
        nav.open_chat("a1");
        assert_eq!(nav.page, Page::Chat);
        assert_eq!(nav.selected_agent.as_deref(), Some("a1"));

        nav.back_to_dashboard();
        assert_eq!(nav.selected_agent, None);
        assert_eq!(nav.tab, DashboardTab::Triggers);

        nav.show_chat();
        assert_eq!(nav.page, Page::Chat);
        assert_eq!(nav.selected_agent, None);
    }
}
