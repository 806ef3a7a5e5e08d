//! Page lifecycle management.
//!
//! Exactly one page container is visible at a time. When the store's
//! `currentPage` changes from A to B the manager calls A's `on_leave`, swaps
//! visibility, then calls B's `on_enter`, each exactly once. Notifications
//! that leave `currentPage` unchanged (a theme toggle, a new subpath) do no
//! work at all.

mod hooks;
mod host;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::isolate;
use crate::store::{listener, AppState, StateStore, Subscription};

pub use hooks::{Hook, PageHooks};
pub use host::{placeholder_text, MemoryPageHost, PageHost};

struct ManagerInner {
    host: Rc<dyn PageHost>,
    hooks: RefCell<HashMap<String, PageHooks>>,
    /// `None` until the first transition.
    current: RefCell<Option<String>>,
    subscription: RefCell<Option<Subscription>>,
}

/// Enforces single-active-page semantics and hook ordering.
///
/// Cloning shares the same manager.
#[derive(Clone)]
pub struct PageLifecycleManager {
    inner: Rc<ManagerInner>,
}

impl PageLifecycleManager {
    pub fn new(host: Rc<dyn PageHost>) -> Self {
        Self {
            inner: Rc::new(ManagerInner {
                host,
                hooks: RefCell::new(HashMap::new()),
                current: RefCell::new(None),
                subscription: RefCell::new(None),
            }),
        }
    }

    /// Register (or replace) the hooks for `page`.
    pub fn register_hooks(&self, page: impl Into<String>, hooks: PageHooks) {
        let page = page.into();
        tracing::debug!(%page, ?hooks, "registered page hooks");
        self.inner.hooks.borrow_mut().insert(page, hooks);
    }

    pub fn has_hooks(&self, page: &str) -> bool {
        self.inner.hooks.borrow().contains_key(page)
    }

    /// The page the manager last transitioned to.
    pub fn current_page(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    pub fn host(&self) -> &Rc<dyn PageHost> {
        &self.inner.host
    }

    /// Follow `store`. Subscribing delivers the current snapshot right away,
    /// so the initial page is entered before this returns.
    pub fn init(&self, store: &StateStore) {
        let weak: Weak<ManagerInner> = Rc::downgrade(&self.inner);
        let subscription = store.subscribe(listener(move |state| {
            if let Some(inner) = weak.upgrade() {
                PageLifecycleManager { inner }.handle_page_change(state);
            }
            Ok(())
        }));

        if let Some(previous) = self.inner.subscription.borrow_mut().replace(subscription) {
            previous.dispose();
        }
    }

    /// Stop following the store.
    pub fn detach(&self) {
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.dispose();
        }
    }

    /// React to a store snapshot.
    pub fn handle_page_change(&self, state: &AppState) {
        let next = state.current_page();
        if next.is_empty() {
            return;
        }

        let previous = self.inner.current.borrow().clone();
        if previous.as_deref() == Some(next) {
            return;
        }

        tracing::debug!(from = ?previous, to = %next, "page transition");

        if let Some(prev) = previous.as_deref() {
            if let Some(on_leave) = self.hooks_for(prev).and_then(|h| h.on_leave) {
                let _ = isolate(&format!("onLeave({})", prev), || on_leave(state));
            }
        }

        self.inner.host.show_only(next);

        // Recorded before on_enter so a redirect issued from inside the hook
        // transitions away from `next`, not from `previous`.
        *self.inner.current.borrow_mut() = Some(next.to_string());

        match self.hooks_for(next) {
            Some(hooks) => {
                if let Some(on_enter) = hooks.on_enter {
                    let _ = isolate(&format!("onEnter({})", next), || on_enter(state));
                }
            }
            None => {
                if self.inner.host.is_empty(next) == Some(true) {
                    self.inner.host.render_placeholder(next);
                }
            }
        }
    }

    fn hooks_for(&self, page: &str) -> Option<PageHooks> {
        self.inner.hooks.borrow().get(page).cloned()
    }
}
