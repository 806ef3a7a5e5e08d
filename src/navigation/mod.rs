//! Navigation views.
//!
//! The sidebar and the bottom dock are pure consumers of the store: they
//! re-render from every snapshot and navigate through the [`Router`].
//!
//! [`Router`]: crate::router::Router

mod dock;
mod sidebar;

pub use dock::{dock_layout, Dock, DockMenu, DockSlot, DOCK_MAX_ITEMS, DOCK_MENU_START};
pub use sidebar::Sidebar;

use crate::store::AppState;

/// One entry of the navigation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub icon: String,
    pub label: String,
    pub page: String,
}

impl NavItem {
    pub fn new(icon: &str, label: &str, page: &str) -> Self {
        Self {
            icon: icon.to_string(),
            label: label.to_string(),
            page: page.to_string(),
        }
    }
}

/// A rendered navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub icon: String,
    pub label: String,
    pub page: String,
    pub active: bool,
}

impl NavEntry {
    fn from_item(item: &NavItem, state: &AppState) -> Self {
        Self {
            icon: item.icon.clone(),
            label: item.label.clone(),
            page: item.page.clone(),
            active: state.current_page() == item.page,
        }
    }
}

/// The pages every build ships with.
pub fn default_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new("🏠", "Home", "home"),
        NavItem::new("📂", "File Explorer", "fileexplorer"),
        NavItem::new("🌐", "Web Shell", "webshell"),
        NavItem::new("🔧", "Service Manager", "servicemanager"),
        NavItem::new("📊", "Sysinfo", "sysinfo"),
    ]
}

/// Render `items` with the active flag taken from `state`.
pub fn render_entries(items: &[NavItem], state: &AppState) -> Vec<NavEntry> {
    items
        .iter()
        .map(|item| NavEntry::from_item(item, state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_nav_items_pages() {
        let pages: Vec<String> = default_nav_items().into_iter().map(|i| i.page).collect();
        assert_eq!(
            pages,
            vec!["home", "fileexplorer", "webshell", "servicemanager", "sysinfo"]
        );
    }

    #[test]
    fn test_render_entries_marks_active() {
        let state = AppState::initial("sysinfo");
        let entries = render_entries(&default_nav_items(), &state);
        let active: Vec<&str> = entries
            .iter()
            .filter(|e| e.active)
            .map(|e| e.page.as_str())
            .collect();
        assert_eq!(active, vec!["sysinfo"]);
    }
}
