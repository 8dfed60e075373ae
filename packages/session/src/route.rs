//! # Route table
//!
//! A route is a path plus a single piece of metadata: whether entering it
//! requires a valid session. [`RouteTable`] resolves an incoming path to its
//! [`RouteDescriptor`], or to [`Resolution::Unmatched`] for the catch-all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A declared route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Path identity, e.g. `"/login"`.
    pub path: String,
    /// Human-friendly name, e.g. `"dashboard"`.
    pub name: String,
    #[serde(default)]
    pub requires_auth: bool,
}

impl RouteDescriptor {
    /// An open route.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
        }
    }

    /// Builder method marking the route as requiring a session.
    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

/// Outcome of looking up a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched(&'a RouteDescriptor),
    /// No declared route; the catch-all sends these home.
    Unmatched,
}

/// Declared routes keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        let routes = routes
            .into_iter()
            .map(|route| (normalize_path(&route.path), route))
            .collect();
        Self { routes }
    }

    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        match self.routes.get(&normalize_path(path)) {
            Some(route) => Resolution::Matched(route),
            None => Resolution::Unmatched,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strip `?query` and `#fragment`, drop trailing slashes, and make the path
/// absolute. `""` and `"/"` both become `"/"`.
pub fn normalize_path(path: &str) -> String {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    let trimmed = path[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
