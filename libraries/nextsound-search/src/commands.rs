//! Built-in palette commands

use crate::types::{CommandCategory, PaletteAction, ResultData, ResultKind, SearchResult};

/// Host UI state that changes command labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub dark_theme: bool,
    pub sidebar_visible: bool,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self {
            dark_theme: false,
            sidebar_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: &'static str,
    pub title: String,
    pub subtitle: String,
    pub category: CommandCategory,
    pub keywords: &'static [&'static str],
    pub shortcut: Option<&'static str>,
    pub action: PaletteAction,
}

impl Command {
    /// Case-insensitive substring match on title, subtitle or any keyword
    fn matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self.subtitle.to_lowercase().contains(term)
            || self.keywords.iter().any(|k| k.contains(term))
    }

    fn is_exact(&self, term: &str) -> bool {
        self.title.to_lowercase() == term || self.keywords.iter().any(|k| *k == term)
    }

    pub fn to_result(&self, is_exact_match: bool) -> SearchResult {
        SearchResult {
            id: self.id.to_string(),
            kind: ResultKind::Command,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            image: None,
            data: ResultData::Command {
                category: self.category,
            },
            action: Some(self.action.clone()),
            is_exact_match,
            keep_open: false,
        }
    }
}

pub fn builtin_commands(ctx: &CommandContext) -> Vec<Command> {
    vec![
        Command {
            id: "nav-home",
            title: "Go to Home".to_string(),
            subtitle: "Navigate to the homepage".to_string(),
            category: CommandCategory::Navigation,
            keywords: &["home", "homepage", "main", "start"],
            shortcut: None,
            action: PaletteAction::Navigate("/".to_string()),
        },
        Command {
            id: "settings-theme",
            title: "Toggle Dark Mode".to_string(),
            subtitle: format!(
                "Switch to {} theme",
                if ctx.dark_theme { "light" } else { "dark" }
            ),
            category: CommandCategory::Settings,
            keywords: &["theme", "dark", "light", "mode", "appearance"],
            shortcut: Some("⌘+D"),
            action: PaletteAction::ToggleTheme,
        },
        Command {
            id: "settings-sidebar",
            title: if ctx.sidebar_visible {
                "Hide Sidebar"
            } else {
                "Show Sidebar"
            }
            .to_string(),
            subtitle: "Toggle navigation sidebar".to_string(),
            category: CommandCategory::Settings,
            keywords: &["sidebar", "navigation", "menu", "toggle"],
            shortcut: None,
            action: PaletteAction::ToggleSidebar,
        },
        Command {
            id: "help-shortcuts",
            title: "Keyboard Shortcuts".to_string(),
            subtitle: "View all available keyboard shortcuts".to_string(),
            category: CommandCategory::Help,
            keywords: &["help", "shortcuts", "keys", "commands"],
            shortcut: Some("⌘+?"),
            action: PaletteAction::ShowShortcuts,
        },
    ]
}

pub fn find_command(id: &str, ctx: &CommandContext) -> Option<Command> {
    builtin_commands(ctx).into_iter().find(|c| c.id == id)
}

/// Commands matching a query, in declaration order
pub fn match_commands(query: &str, ctx: &CommandContext) -> Vec<SearchResult> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    builtin_commands(ctx)
        .iter()
        .filter(|c| c.matches(&term))
        .map(|c| c.to_result(c.is_exact(&term)))
        .collect()
}
