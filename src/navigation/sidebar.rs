//! Left-hand navigation list.

use std::cell::RefCell;
use std::rc::Rc;

use super::{render_entries, NavEntry, NavItem};
use crate::router::Router;
use crate::store::{listener, StateStore, Subscription};

/// Sidebar navigation, re-rendered on every store notification.
pub struct Sidebar {
    entries: Rc<RefCell<Vec<NavEntry>>>,
    router: Rc<Router>,
    subscription: Subscription,
}

impl Sidebar {
    /// Render once from the current state and keep following the store.
    pub fn mount(store: &StateStore, router: Rc<Router>, items: Vec<NavItem>) -> Self {
        let entries = Rc::new(RefCell::new(Vec::new()));

        let target = Rc::clone(&entries);
        let subscription = store.subscribe(listener(move |state| {
            *target.borrow_mut() = render_entries(&items, state);
            Ok(())
        }));

        Self {
            entries,
            router,
            subscription,
        }
    }

    pub fn entries(&self) -> Vec<NavEntry> {
        self.entries.borrow().clone()
    }

    pub fn active_page(&self) -> Option<String> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.active)
            .map(|e| e.page.clone())
    }

    pub fn click(&self, page: &str) {
        self.router.go(page);
    }

    pub fn unmount(&self) {
        self.subscription.dispose();
    }
}
