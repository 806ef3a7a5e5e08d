//! The URL hash grammar.
//!
//! ```text
//! "#/" [page] ["/" subpath] ["?" key "=" value ("&" key "=" value)*]
//! ```
//!
//! Parsing never fails: anything unrecognisable degrades to the default page
//! with no subpath and no params.

use std::borrow::Cow;

use crate::store::RouteParams;

/// A parsed view of the URL hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub page: String,
    pub subpath: Option<String>,
    pub params: RouteParams,
}

impl Route {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            subpath: None,
            params: RouteParams::new(),
        }
    }

    pub fn with_subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = Some(subpath.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Render this route back into a hash string.
    pub fn to_hash(&self) -> String {
        build_hash(&self.page, &self.params, self.subpath.as_deref())
    }
}

/// Parse a location hash into a [`Route`].
pub fn parse_route(hash: &str, default_page: &str) -> Route {
    let body = hash
        .strip_prefix("#/")
        .or_else(|| hash.strip_prefix('#'))
        .unwrap_or(hash);

    let (path, query) = match body.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (body, None),
    };

    let mut segments = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(decode_component);

    let page = segments.next().unwrap_or_else(|| default_page.to_string());
    let rest: Vec<String> = segments.collect();
    let subpath = if rest.is_empty() {
        None
    } else {
        Some(rest.join("/"))
    };

    Route {
        page,
        subpath,
        params: query.map(parse_query).unwrap_or_default(),
    }
}

/// Decode `&`-separated `key=value` pairs. Keys and values are decoded
/// independently; empty keys are dropped and later duplicates win.
pub fn parse_query(query: &str) -> RouteParams {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some((decode_component(key), decode_component(value)))
        })
        .collect()
}

/// Build `#/<page>[/<subpath>][?<query>]`.
///
/// Each subpath segment and each query key/value is percent-encoded on its
/// own, so `/` inside the subpath survives as a separator.
pub fn build_hash(page: &str, params: &RouteParams, subpath: Option<&str>) -> String {
    let mut hash = format!("#/{}", page);

    if let Some(subpath) = subpath.filter(|s| !s.is_empty()) {
        let encoded: Vec<Cow<'_, str>> = subpath.split('/').map(urlencoding::encode).collect();
        hash.push('/');
        hash.push_str(&encoded.join("/"));
    }

    if !params.is_empty() {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        hash.push('?');
        hash.push_str(&query.join("&"));
    }

    hash
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}
