//! Page containers.
//!
//! A [`PageHost`] owns one container per mounted page. Page ids without a
//! container are simply skipped; that is never an error.

use std::cell::RefCell;
use std::collections::BTreeMap;

/// Where pages are rendered.
pub trait PageHost {
    /// Ids of every page that has a container.
    fn page_ids(&self) -> Vec<String>;

    fn set_visible(&self, page: &str, visible: bool);

    /// `None` when the page has no container.
    fn is_empty(&self, page: &str) -> Option<bool>;

    /// Replace a container's content. Returns false when there is no container.
    fn fill(&self, page: &str, content: &str) -> bool;

    /// Hide every container except `page`'s.
    fn show_only(&self, page: &str) {
        for id in self.page_ids() {
            self.set_visible(&id, id == page);
        }
    }

    fn render_placeholder(&self, page: &str) {
        self.fill(page, &placeholder_text(page));
    }
}

/// Fallback content for pages nobody registered hooks for.
pub fn placeholder_text(page: &str) -> String {
    format!("🚧 {} is under construction", page)
}

#[derive(Debug, Clone, Default)]
struct Container {
    visible: bool,
    content: String,
}

/// In-process page host.
#[derive(Debug, Default)]
pub struct MemoryPageHost {
    containers: RefCell<BTreeMap<String, Container>>,
}

impl MemoryPageHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with an empty, hidden container for each page.
    pub fn with_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let host = Self::new();
        for page in pages {
            host.mount(page);
        }
        host
    }

    pub fn mount(&self, page: impl Into<String>) {
        self.containers
            .borrow_mut()
            .entry(page.into())
            .or_default();
    }

    pub fn content(&self, page: &str) -> Option<String> {
        self.containers.borrow().get(page).map(|c| c.content.clone())
    }

    pub fn is_visible(&self, page: &str) -> bool {
        self.containers
            .borrow()
            .get(page)
            .map(|c| c.visible)
            .unwrap_or(false)
    }

    pub fn visible_pages(&self) -> Vec<String> {
        self.containers
            .borrow()
            .iter()
            .filter(|(_, c)| c.visible)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl PageHost for MemoryPageHost {
    fn page_ids(&self) -> Vec<String> {
        self.containers.borrow().keys().cloned().collect()
    }

    fn set_visible(&self, page: &str, visible: bool) {
        if let Some(container) = self.containers.borrow_mut().get_mut(page) {
            container.visible = visible;
        }
    }

    fn is_empty(&self, page: &str) -> Option<bool> {
        self.containers
            .borrow()
            .get(page)
            .map(|c| c.content.trim().is_empty())
    }

    fn fill(&self, page: &str, content: &str) -> bool {
        match self.containers.borrow_mut().get_mut(page) {
            Some(container) => {
                container.content = content.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_only_one_page() {
        let host = MemoryPageHost::with_pages(["home", "sysinfo", "webshell"]);
        host.show_only("sysinfo");
        assert_eq!(host.visible_pages(), vec!["sysinfo".to_string()]);

        host.show_only("home");
        assert_eq!(host.visible_pages(), vec!["home".to_string()]);
    }

    #[test]
    fn test_missing_container_is_skipped() {
        let host = MemoryPageHost::with_pages(["home"]);
        host.show_only("nowhere");
        assert!(host.visible_pages().is_empty());
        assert_eq!(host.is_empty("nowhere"), None);
        assert!(!host.fill("nowhere", "x"));
    }

    #[test]
    fn test_placeholder() {
        let host = MemoryPageHost::with_pages(["servicemanager"]);
        assert_eq!(host.is_empty("servicemanager"), Some(true));
        host.render_placeholder("servicemanager");
        assert_eq!(
            host.content("servicemanager").as_deref(),
            Some("🚧 servicemanager is under construction")
        );
        assert_eq!(host.is_empty("servicemanager"), Some(false));
    }
}
