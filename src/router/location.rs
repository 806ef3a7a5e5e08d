//! The address-bar hash.

use std::cell::RefCell;

use crate::events::{EventSender, ShellEvent};

/// Read/write access to the location hash.
///
/// Assigning a different hash must eventually deliver a
/// [`ShellEvent::HashChanged`]; assigning the current hash must not.
pub trait Location {
    fn hash(&self) -> String;
    fn set_hash(&self, hash: &str);
}

/// In-process location that queues hash changes on the shell event channel.
#[derive(Debug)]
pub struct MemoryLocation {
    hash: RefCell<String>,
    events: Option<EventSender>,
}

impl MemoryLocation {
    pub fn new(initial: &str, events: EventSender) -> Self {
        Self {
            hash: RefCell::new(normalize(initial)),
            events: Some(events),
        }
    }

    /// A location nobody listens to.
    pub fn detached(initial: &str) -> Self {
        Self {
            hash: RefCell::new(normalize(initial)),
            events: None,
        }
    }
}

impl Location for MemoryLocation {
    fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn set_hash(&self, hash: &str) {
        let new = normalize(hash);
        let old = {
            let mut current = self.hash.borrow_mut();
            if *current == new {
                return;
            }
            std::mem::replace(&mut *current, new.clone())
        };

        tracing::debug!(%old, %new, "location hash changed");
        if let Some(events) = &self.events {
            if events.send(ShellEvent::HashChanged { old, new }).is_err() {
                tracing::debug!("hash change dropped: event loop gone");
            }
        }
    }
}

/// Browsers store a non-empty hash with its leading `#`.
fn normalize(hash: &str) -> String {
    if hash.is_empty() || hash.starts_with('#') {
        hash.to_string()
    } else {
        format!("#{}", hash)
    }
}
