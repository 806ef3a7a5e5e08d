//! The application state snapshot.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Key holding the active page id.
pub const CURRENT_PAGE: &str = "currentPage";
/// Key holding the optional route subpath.
pub const SUBPATH: &str = "subpath";
/// Key holding the decoded route query parameters.
pub const ROUTE_PARAMS: &str = "routeParams";
/// Key holding the UI theme name.
pub const THEME: &str = "theme";

/// Decoded query parameters of a route. Order is irrelevant, so a sorted map
/// keeps hashes built from it deterministic.
pub type RouteParams = BTreeMap<String, String>;

/// A string-keyed mapping of everything the pages share.
///
/// The store hands out clones, so holding an `AppState` never aliases the
/// store's internal state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct AppState {
    values: Map<String, Value>,
}

impl AppState {
    /// The state the store starts with.
    pub fn initial(default_page: &str) -> Self {
        let values = match json!({
            CURRENT_PAGE: default_page,
            SUBPATH: null,
            ROUTE_PARAMS: {},
            THEME: "light",
            "user": null,
            "notifications": [],
            "windows": [],
            "plugins": {},
        }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { values }
    }

    /// Raw access to any key, including ones owned by unrelated features.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The active page id.
    pub fn current_page(&self) -> &str {
        self.values
            .get(CURRENT_PAGE)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn subpath(&self) -> Option<&str> {
        self.values.get(SUBPATH).and_then(Value::as_str)
    }

    /// Route params as strings. Non-string values are skipped.
    pub fn route_params(&self) -> RouteParams {
        self.values
            .get(ROUTE_PARAMS)
            .and_then(Value::as_object)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Option<&str> {
        self.values.get(THEME).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge `partial` into this state. Returns true if any key changed.
    pub(crate) fn merge(&mut self, partial: Map<String, Value>) -> bool {
        let mut changed = false;
        for (key, value) in partial {
            if self.values.get(&key) != Some(&value) {
                self.values.insert(key, value);
                changed = true;
            }
        }
        changed
    }

    /// Null out an existing key. Returns false if the key was absent.
    pub(crate) fn clear_key(&mut self, key: &str) -> bool {
        match self.values.get_mut(key) {
            Some(value) => {
                *value = Value::Null;
                true
            }
            None => false,
        }
    }
}
