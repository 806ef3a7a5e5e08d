//! Hash-based router.
//!
//! The router maps the location hash to a [`Route`], validates the page
//! against the registered whitelist and writes the result into the
//! [`StateStore`]. Navigation only assigns the hash: the resulting
//! [`ShellEvent::HashChanged`](crate::events::ShellEvent::HashChanged) is
//! what eventually calls [`Router::apply_route`], so navigating to the
//! current route does nothing.

mod location;
mod route;

use std::rc::Rc;

use serde_json::json;

use crate::config::ShellConfig;
use crate::navigation::DockMenu;
use crate::store::{RouteParams, StateStore, CURRENT_PAGE, ROUTE_PARAMS, SUBPATH};

pub use location::{Location, MemoryLocation};
pub use route::{build_hash, parse_query, parse_route, Route};

/// Two-way mapping between the location hash and the store's route keys.
pub struct Router {
    store: StateStore,
    location: Rc<dyn Location>,
    pages: Vec<String>,
    default_page: String,
    dock_menu: Option<DockMenu>,
}

impl Router {
    pub fn new<I, S>(
        store: StateStore,
        location: Rc<dyn Location>,
        pages: I,
        default_page: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store,
            location,
            pages: pages.into_iter().map(Into::into).collect(),
            default_page: default_page.into(),
            dock_menu: None,
        }
    }

    /// Router whose whitelist is the configured navigation table.
    pub fn from_config(store: StateStore, location: Rc<dyn Location>, config: &ShellConfig) -> Self {
        Self::new(
            store,
            location,
            config.nav_items.iter().map(|item| item.page.clone()),
            config.default_page.clone(),
        )
    }

    /// Overflow menu to close whenever a route is applied.
    pub fn with_dock_menu(mut self, menu: DockMenu) -> Self {
        self.dock_menu = Some(menu);
        self
    }

    pub fn default_page(&self) -> &str {
        &self.default_page
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn location(&self) -> &Rc<dyn Location> {
        &self.location
    }

    pub fn is_valid_page(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }

    /// Parse `hash` without whitelist validation.
    pub fn parse_route(&self, hash: &str) -> Route {
        parse_route(hash, &self.default_page)
    }

    /// Parse `hash` and substitute the default page for unknown pages.
    pub fn resolve(&self, hash: &str) -> Route {
        let mut route = self.parse_route(hash);
        if !self.is_valid_page(&route.page) {
            tracing::warn!(
                page = %route.page,
                default = %self.default_page,
                "unknown page, falling back to default"
            );
            route.page = self.default_page.clone();
        }
        route
    }

    /// Apply the current location hash to the store.
    ///
    /// Called once at startup and on every hash change.
    pub fn apply_route(&self) -> Route {
        let hash = self.location.hash();
        let route = self.resolve(&hash);
        tracing::debug!(%hash, page = %route.page, subpath = ?route.subpath, "applying route");

        self.store.set_state(
            json!({
                CURRENT_PAGE: route.page,
                SUBPATH: route.subpath,
                ROUTE_PARAMS: route.params,
            }),
            false,
        );

        if let Some(menu) = &self.dock_menu {
            menu.close();
        }
        route
    }

    /// Assign the hash for `page`. The store is updated when the resulting
    /// hash change is handled, never synchronously.
    pub fn navigate_to(&self, page: &str, params: &RouteParams, subpath: Option<&str>) {
        let hash = build_hash(page, params, subpath);
        tracing::debug!(%hash, "navigate");
        self.location.set_hash(&hash);
    }

    /// Navigate to a page with no params or subpath.
    pub fn go(&self, page: &str) {
        self.navigate_to(page, &RouteParams::new(), None);
    }

    /// Apply the initial route.
    pub fn init(&self) {
        self.apply_route();
    }
}
