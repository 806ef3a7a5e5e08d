//! Reactive application state.
//!
//! [`StateStore`] is the single source of truth for cross-page UI state.
//! Writes merge into the current state and, when something actually changed,
//! every subscriber is called synchronously with one shared snapshot before
//! `set_state` returns.
//!
//! The store is a constructed value, cheap to clone, and every clone shares
//! the same state. Independent stores never see each other's updates.

mod app_state;
mod subscription;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::error::isolate;

pub use app_state::{AppState, RouteParams, CURRENT_PAGE, ROUTE_PARAMS, SUBPATH, THEME};
pub use subscription::{listener, Subscriber, Subscription};

pub(crate) struct StoreInner {
    state: RefCell<AppState>,
    /// Insertion-ordered, deduplicated by `Rc` identity.
    subscribers: RefCell<Vec<Subscriber>>,
}

/// Process-wide reactive key/value store with subscribe/notify semantics.
#[derive(Clone)]
pub struct StateStore {
    inner: Rc<StoreInner>,
}

impl StateStore {
    /// Create a store whose `currentPage` starts at `default_page`.
    pub fn new(default_page: &str) -> Self {
        Self::with_state(AppState::initial(default_page))
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Return a copy of the current state.
    pub fn get_state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Merge `partial` into the state.
    ///
    /// A non-object `partial` is ignored. Subscribers are notified once if
    /// any key changed and `silent` is false.
    pub fn set_state(&self, partial: Value, silent: bool) {
        let Value::Object(partial) = partial else {
            tracing::debug!("set_state ignored non-object partial");
            return;
        };

        // Borrow must end before notify: subscribers may write back.
        let changed = self.inner.state.borrow_mut().merge(partial);
        if changed && !silent {
            self.notify();
        }
    }

    /// Set a single key and notify on change.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let mut partial = serde_json::Map::new();
        partial.insert(key.to_string(), value.into());
        self.set_state(Value::Object(partial), false);
    }

    /// Register `subscriber` and call it once with the current state.
    ///
    /// Registering the same `Rc` again does not add a second entry, though it
    /// still receives the initial call.
    pub fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            if !subscribers.iter().any(|s| Rc::ptr_eq(s, &subscriber)) {
                subscribers.push(Rc::clone(&subscriber));
            }
        }

        let snapshot = self.get_state();
        let _ = isolate("state subscriber (initial call)", || subscriber(&snapshot));

        Subscription::new(Rc::downgrade(&self.inner), subscriber)
    }

    /// Call every subscriber with one shared snapshot.
    ///
    /// Iterates over a copy of the subscriber list, so subscribing or
    /// disposing during the pass only affects the next notification.
    pub fn notify(&self) {
        let snapshot = self.get_state();
        let subscribers: Vec<Subscriber> = self.inner.subscribers.borrow().clone();
        for subscriber in subscribers {
            let _ = isolate("state subscriber", || subscriber(&snapshot));
        }
    }

    /// Null out the listed keys and notify.
    ///
    /// `currentPage` is never cleared.
    pub fn reset(&self, keys: &[&str]) {
        {
            let mut state = self.inner.state.borrow_mut();
            for key in keys {
                if *key == CURRENT_PAGE {
                    tracing::warn!("reset refused to clear {}", CURRENT_PAGE);
                    continue;
                }
                state.clear_key(key);
            }
        }
        self.notify();
    }

    /// Emit the current state at debug level.
    pub fn log(&self) {
        let state = self.get_state();
        match serde_json::to_string(&state) {
            Ok(json) => tracing::debug!(state = %json, "app state"),
            Err(e) => tracing::warn!("failed to serialize app state: {}", e),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE)
    }
}
