//! Bottom dock with an overflow menu.

use std::cell::RefCell;
use std::rc::Rc;

use super::{render_entries, NavEntry, NavItem};
use crate::router::Router;
use crate::store::{listener, AppState, StateStore, Subscription};

/// Most icons the dock shows without an overflow button.
pub const DOCK_MAX_ITEMS: usize = 5;

/// Index of the first item listed in the overflow menu.
pub const DOCK_MENU_START: usize = 4;

/// One position in the dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockSlot {
    Page(NavEntry),
    /// Opens the [`DockMenu`].
    More,
}

/// Lay out the dock: all items if they fit, otherwise the first four plus
/// a "more" button.
pub fn dock_layout(items: &[NavItem], state: &AppState) -> Vec<DockSlot> {
    let overflow = items.len() > DOCK_MAX_ITEMS;
    let shown = if overflow {
        DOCK_MENU_START
    } else {
        DOCK_MAX_ITEMS
    };
    let visible = &items[..items.len().min(shown)];

    let mut slots: Vec<DockSlot> = render_entries(visible, state)
        .into_iter()
        .map(DockSlot::Page)
        .collect();
    if overflow {
        slots.push(DockSlot::More);
    }
    slots
}

#[derive(Debug, Default)]
struct MenuState {
    open: bool,
    entries: Vec<NavEntry>,
}

/// Overflow navigation menu. Cloning shares the same menu.
#[derive(Debug, Clone)]
pub struct DockMenu {
    items: Rc<[NavItem]>,
    state: Rc<RefCell<MenuState>>,
}

impl DockMenu {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self {
            items: items.into(),
            state: Rc::new(RefCell::new(MenuState::default())),
        }
    }

    /// Open the menu with entries rendered from `state`, or close it if it
    /// is already open. Returns whether the menu is now open.
    pub fn toggle(&self, state: &AppState) -> bool {
        let mut menu = self.state.borrow_mut();
        if menu.open {
            menu.open = false;
            return false;
        }

        let remaining = self.items.get(DOCK_MENU_START..).unwrap_or_default();
        menu.entries = render_entries(remaining, state);
        menu.open = true;
        true
    }

    pub fn close(&self) {
        self.state.borrow_mut().open = false;
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    /// Entries rendered when the menu was last opened.
    pub fn entries(&self) -> Vec<NavEntry> {
        self.state.borrow().entries.clone()
    }

    /// Navigate to a menu entry and close the menu.
    pub fn select(&self, router: &Router, page: &str) {
        router.go(page);
        self.close();
    }
}

/// The bottom dock, re-rendered on every store notification.
pub struct Dock {
    slots: Rc<RefCell<Vec<DockSlot>>>,
    store: StateStore,
    router: Rc<Router>,
    menu: DockMenu,
    subscription: Subscription,
}

impl Dock {
    pub fn mount(
        store: &StateStore,
        router: Rc<Router>,
        items: Vec<NavItem>,
        menu: DockMenu,
    ) -> Self {
        let slots = Rc::new(RefCell::new(Vec::new()));

        let target = Rc::clone(&slots);
        let subscription = store.subscribe(listener(move |state| {
            *target.borrow_mut() = dock_layout(&items, state);
            Ok(())
        }));

        Self {
            slots,
            store: store.clone(),
            router,
            menu,
            subscription,
        }
    }

    pub fn slots(&self) -> Vec<DockSlot> {
        self.slots.borrow().clone()
    }

    pub fn menu(&self) -> &DockMenu {
        &self.menu
    }

    pub fn click(&self, page: &str) {
        self.router.go(page);
    }

    /// The "more" button.
    pub fn click_more(&self) -> bool {
        self.menu.toggle(&self.store.get_state())
    }

    pub fn unmount(&self) {
        self.subscription.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::default_nav_items;
    use crate::router::{Location, MemoryLocation};

    fn many_items() -> Vec<NavItem> {
        let mut items = default_nav_items();
        items.push(NavItem::new("🗂", "Files", "files"));
        items.push(NavItem::new("⚙", "Settings", "settings"));
        items
    }

    fn page_of(slot: &DockSlot) -> Option<&str> {
        match slot {
            DockSlot::Page(entry) => Some(entry.page.as_str()),
            DockSlot::More => None,
        }
    }

    #[test]
    fn test_layout_without_overflow() {
        let state = AppState::initial("home");
        let slots = dock_layout(&default_nav_items(), &state);
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| *s != DockSlot::More));
    }

    #[test]
    fn test_layout_with_overflow() {
        let state = AppState::initial("home");
        let slots = dock_layout(&many_items(), &state);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[4], DockSlot::More);
        let pages: Vec<&str> = slots.iter().filter_map(page_of).collect();
        assert_eq!(pages, vec!["home", "fileexplorer", "webshell", "servicemanager"]);
    }

    #[test]
    fn test_menu_toggle_lists_remaining_items() {
        let menu = DockMenu::new(many_items());
        let state = AppState::initial("files");

        assert!(menu.toggle(&state));
        let entries = menu.entries();
        let pages: Vec<&str> = entries.iter().map(|e| e.page.as_str()).collect();
        assert_eq!(pages, vec!["sysinfo", "files", "settings"]);
        assert!(entries.iter().find(|e| e.page == "files").unwrap().active);

        assert!(!menu.toggle(&state));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_menu_select_navigates_and_closes() {
        let store = StateStore::new("home");
        let location: Rc<dyn Location> = Rc::new(MemoryLocation::detached(""));
        let router = Router::new(store.clone(), location, ["home", "sysinfo"], "home");
        let menu = DockMenu::new(many_items());

        menu.toggle(&store.get_state());
        menu.select(&router, "sysinfo");
        assert!(!menu.is_open());
        assert_eq!(router.location().hash(), "#/sysinfo");
    }

    #[test]
    fn test_dock_click_more_toggles_menu() {
        let store = StateStore::new("home");
        let location: Rc<dyn Location> = Rc::new(MemoryLocation::detached(""));
        let router = Rc::new(Router::new(store.clone(), location, ["home"], "home"));
        let dock = Dock::mount(&store, router, many_items(), DockMenu::new(many_items()));

        assert!(dock.click_more());
        assert!(dock.menu().is_open());
        assert!(!dock.click_more());
    }
}
