//! Subscriber handles.

use std::fmt;
use std::rc::{Rc, Weak};

use super::app_state::AppState;
use super::StoreInner;
use crate::error::HookResult;

/// A state listener.
///
/// Identity is the `Rc` allocation: subscribing the same `Rc` twice keeps a
/// single registration.
pub type Subscriber = Rc<dyn Fn(&AppState) -> HookResult>;

/// Wrap a closure as a [`Subscriber`].
pub fn listener<F>(f: F) -> Subscriber
where
    F: Fn(&AppState) -> HookResult + 'static,
{
    Rc::new(f)
}

/// Disposer returned by [`StateStore::subscribe`](super::StateStore::subscribe).
///
/// Dropping the handle does not unsubscribe; call [`dispose`](Self::dispose).
/// Disposing twice is harmless.
pub struct Subscription {
    store: Weak<StoreInner>,
    subscriber: Subscriber,
}

impl Subscription {
    pub(super) fn new(store: Weak<StoreInner>, subscriber: Subscriber) -> Self {
        Self { store, subscriber }
    }

    /// Remove the subscriber from the store.
    pub fn dispose(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .subscribers
                .borrow_mut()
                .retain(|s| !Rc::ptr_eq(s, &self.subscriber));
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("store_alive", &(self.store.strong_count() > 0))
            .finish()
    }
}
