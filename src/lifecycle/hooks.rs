//! Per-page lifecycle hooks.

use std::fmt;
use std::rc::Rc;

use crate::error::HookResult;
use crate::store::AppState;

/// A lifecycle callback. It receives the snapshot that caused the transition.
pub type Hook = Rc<dyn Fn(&AppState) -> HookResult>;

/// Optional enter/leave callbacks for one page.
#[derive(Clone, Default)]
pub struct PageHooks {
    pub(crate) on_enter: Option<Hook>,
    pub(crate) on_leave: Option<Hook>,
}

impl PageHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, f: F) -> Self
    where
        F: Fn(&AppState) -> HookResult + 'static,
    {
        self.on_enter = Some(Rc::new(f));
        self
    }

    pub fn on_leave<F>(mut self, f: F) -> Self
    where
        F: Fn(&AppState) -> HookResult + 'static,
    {
        self.on_leave = Some(Rc::new(f));
        self
    }

    pub fn has_enter(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_leave(&self) -> bool {
        self.on_leave.is_some()
    }
}

impl fmt::Debug for PageHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHooks")
            .field("on_enter", &self.has_enter())
            .field("on_leave", &self.has_leave())
            .finish()
    }
}
