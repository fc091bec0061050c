use std::fmt;

use shared::domain::{STATUS_ACTIVE, STATUS_DRAFT, STATUS_SOLD};

/// One tab of the "my listings" screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusTab {
    All,
    /// Exact, case-sensitive match against the server's status string.
    Status(String),
}

impl StatusTab {
    pub fn status(key: impl Into<String>) -> Self {
        StatusTab::Status(key.into())
    }

    pub fn defaults() -> Vec<StatusTab> {
        vec![
            StatusTab::All,
            StatusTab::status(STATUS_ACTIVE),
            StatusTab::status(STATUS_DRAFT),
            StatusTab::status(STATUS_SOLD),
        ]
    }

    pub fn key(&self) -> &str {
        match self {
            StatusTab::All => "all",
            StatusTab::Status(key) => key,
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Status(key) => status == Some(key.as_str()),
        }
    }
}

impl fmt::Display for StatusTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTab::All => f.write_str("All"),
            StatusTab::Status(key) => f.write_str(key),
        }
    }
}

/// Items whose status matches `tab`, in their original order.
pub fn filter_by_tab<'a, T, F>(items: &'a [T], tab: &StatusTab, status_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    items
        .iter()
        .filter(|item| tab.matches(status_of(*item)))
        .collect()
}

/// Tab bar state: the available tabs and the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    tabs: Vec<StatusTab>,
    selected: StatusTab,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::new(StatusTab::defaults())
    }
}

impl StatusFilter {
    pub fn new(tabs: Vec<StatusTab>) -> Self {
        Self {
            tabs,
            selected: StatusTab::All,
        }
    }

    pub fn tabs(&self) -> &[StatusTab] {
        &self.tabs
    }

    pub fn selected(&self) -> &StatusTab {
        &self.selected
    }

    /// Selects the tab with `key`; unknown keys leave the selection alone.
    pub fn select(&mut self, key: &str) -> bool {
        match self.tabs.iter().find(|tab| tab.key() == key) {
            Some(tab) => {
                self.selected = tab.clone();
                true
            }
            None => false,
        }
    }

    pub fn apply<'a, T, F>(&self, items: &'a [T], status_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> Option<&str>,
    {
        filter_by_tab(items, &self.selected, status_of)
    }
}

/// Card badge text: `Live` for active listings, otherwise the raw status.
pub fn badge_label(status: Option<&str>) -> String {
    match status.map(str::trim).filter(|status| !status.is_empty()) {
        Some(STATUS_ACTIVE) => "Live".to_string(),
        Some(status) => status.to_string(),
        None => "Info".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/status_filter_tests.rs"]
mod tests;
