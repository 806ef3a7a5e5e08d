//! File explorer routing.
//!
//! The explorer keeps its browsing position in the hash:
//! `#/fileexplorer/directory/<path>?page=<n>&perPage=<n>`. A directory hash
//! is remembered in persisted storage; opening the explorer with any other
//! hash puts the remembered one back.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use once_cell::sync::Lazy;
use regex::Regex;

use super::actions::ActionTable;
use crate::error::ShellResult;
use crate::lifecycle::{PageHooks, PageHost, PageLifecycleManager};
use crate::router::{build_hash, parse_query, Location};
use crate::storage::KeyValueStore;
use crate::store::{listener, RouteParams, StateStore, Subscription};

/// Page id of the explorer.
pub const FILE_EXPLORER_PAGE: &str = "fileexplorer";

/// Storage key holding the last directory hash.
pub const DIRECTORY_HASH_KEY: &str = "currentDirectoryHash";

/// Where the explorer goes when nothing is remembered.
pub const FILE_EXPLORER_HASH: &str = "#/fileexplorer";

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 100;

static DIRECTORY_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#/fileexplorer/directory/([^?]+)(\?(.*))?").expect("Invalid directory route regex")
});

/// The directory listing the explorer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    /// `/`-separated, always ending in `/`.
    pub path: String,
    pub page: u32,
    pub per_page: u32,
}

impl Default for DirectoryView {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Unify separators and add the trailing slash.
pub fn normalize_directory(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.ends_with('/') {
        path
    } else {
        format!("{}/", path)
    }
}

/// The directory containing `path`. The root is its own parent.
pub fn parent_directory(path: &str) -> String {
    let path = normalize_directory(path);
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.pop();
    parts.pop();
    let parent = parts.join("/");
    if parent.is_empty() {
        "/".to_string()
    } else {
        parent
    }
}

/// Hash for a directory listing.
pub fn directory_hash(path: &str, page: u32, per_page: u32) -> String {
    let path = normalize_directory(path);
    let mut params = RouteParams::new();
    params.insert("page".to_string(), page.to_string());
    params.insert("perPage".to_string(), per_page.to_string());
    build_hash(
        FILE_EXPLORER_PAGE,
        &params,
        Some(&format!("directory/{}", path)),
    )
}

/// Parse a directory hash. Returns `None` for any other hash.
pub fn parse_directory_hash(hash: &str) -> Option<DirectoryView> {
    let captures = DIRECTORY_ROUTE.captures(hash)?;
    let raw_path = captures.get(1).map(|m| m.as_str()).unwrap_or("/");
    let path = urlencoding::decode(raw_path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| raw_path.to_string());

    let query = captures
        .get(3)
        .map(|m| parse_query(m.as_str()))
        .unwrap_or_default();
    let number = |key: &str, default: u32| {
        query
            .get(key)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    };

    Some(DirectoryView {
        path: normalize_directory(&path),
        page: number("page", DEFAULT_PAGE_NUMBER),
        per_page: number("perPage", DEFAULT_PER_PAGE),
    })
}

/// Persists and restores the explorer's directory hash.
pub struct DirectoryRoutes {
    location: Rc<dyn Location>,
    storage: Rc<dyn KeyValueStore>,
}

impl DirectoryRoutes {
    pub fn new(location: Rc<dyn Location>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self { location, storage }
    }

    /// Resolve the directory for the current hash.
    ///
    /// A directory hash is remembered. Anything else is replaced by the
    /// remembered hash (or [`FILE_EXPLORER_HASH`]).
    pub fn resolve(&self) -> DirectoryView {
        let hash = self.location.hash();
        if let Some(view) = parse_directory_hash(&hash) {
            // Unrelated store notifications land here too; only write on change.
            if self.storage.get(DIRECTORY_HASH_KEY).as_deref() != Some(hash.as_str()) {
                if let Err(e) = self.storage.set(DIRECTORY_HASH_KEY, &hash) {
                    tracing::warn!("failed to remember directory hash: {}", e);
                }
            }
            return view;
        }

        let restored = self
            .storage
            .get(DIRECTORY_HASH_KEY)
            .unwrap_or_else(|| FILE_EXPLORER_HASH.to_string());
        tracing::debug!(%restored, "restoring file explorer location");
        self.location.set_hash(&restored);
        parse_directory_hash(&restored).unwrap_or_default()
    }

    pub fn go_to_directory(&self, path: &str, page: u32, per_page: u32) {
        self.location.set_hash(&directory_hash(path, page, per_page));
    }
}

/// The file explorer page: follows the route while active and dispatches
/// row actions.
pub struct FileExplorerPage {
    routes: DirectoryRoutes,
    host: Rc<dyn PageHost>,
    actions: RefCell<ActionTable>,
    view: RefCell<Option<DirectoryView>>,
    subscription: RefCell<Option<Subscription>>,
}

impl FileExplorerPage {
    pub fn new(routes: DirectoryRoutes, host: Rc<dyn PageHost>) -> Rc<Self> {
        Rc::new(Self {
            routes,
            host,
            actions: RefCell::new(ActionTable::new()),
            view: RefCell::new(None),
            subscription: RefCell::new(None),
        })
    }

    /// Register lifecycle hooks for this page.
    pub fn register(self: &Rc<Self>, manager: &PageLifecycleManager, store: &StateStore) {
        let enter_page = Rc::downgrade(self);
        let leave_page = Rc::downgrade(self);
        let store = store.clone();

        manager.register_hooks(
            FILE_EXPLORER_PAGE,
            PageHooks::new()
                .on_enter(move |_| {
                    if let Some(page) = enter_page.upgrade() {
                        page.enter(&store);
                    }
                    Ok(())
                })
                .on_leave(move |_| {
                    if let Some(page) = leave_page.upgrade() {
                        page.leave();
                    }
                    Ok(())
                }),
        );
    }

    /// The listing currently shown, if the page is active.
    pub fn view(&self) -> Option<DirectoryView> {
        self.view.borrow().clone()
    }

    pub fn actions_mut(&self) -> std::cell::RefMut<'_, ActionTable> {
        self.actions.borrow_mut()
    }

    pub fn handle_file_action(&self, name: &str, path: &str) -> ShellResult<()> {
        self.actions.borrow().dispatch(name, path)
    }

    pub fn go_to_directory(&self, path: &str) {
        let (page, per_page) = self
            .view()
            .map(|v| (v.page, v.per_page))
            .unwrap_or((DEFAULT_PAGE_NUMBER, DEFAULT_PER_PAGE));
        self.routes.go_to_directory(path, page, per_page);
    }

    pub fn go_to_parent_directory(&self) {
        let current = self.view().map(|v| v.path).unwrap_or_else(|| "/".to_string());
        self.go_to_directory(&parent_directory(&current));
    }

    fn enter(self: &Rc<Self>, store: &StateStore) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let subscription = store.subscribe(listener(move |state| {
            if state.current_page() != FILE_EXPLORER_PAGE {
                return Ok(());
            }
            if let Some(page) = weak.upgrade() {
                page.refresh();
            }
            Ok(())
        }));
        if let Some(previous) = self.subscription.borrow_mut().replace(subscription) {
            previous.dispose();
        }
    }

    fn leave(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.dispose();
        }
        *self.view.borrow_mut() = None;
    }

    fn refresh(&self) {
        let view = self.routes.resolve();
        if self.view.borrow().as_ref() == Some(&view) {
            return;
        }
        self.host.fill(
            FILE_EXPLORER_PAGE,
            &format!(
                "File Explorer: {} (page {}, {} per page)",
                view.path, view.page, view.per_page
            ),
        );
        *self.view.borrow_mut() = Some(view);
    }
}
