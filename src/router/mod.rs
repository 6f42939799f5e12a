//! View Router
//!
//! Maps a small set of paths to view templates. Navigation pushes onto a
//! history stack and re-resolves the current route; [`Router::back`] pops
//! it the way a browser's back button does.
//!
//! # Routes
//!
//! - `/login` - login and registration forms
//! - `/dashboard` - balance and transactions, refreshed on entry
//! - `/credits` - credits page
//!
//! Any other path resolves to [`Resolution::Fallback`] and is redirected
//! to the default route (`/dashboard`).

mod table;

pub use table::{Initializer, Resolution, Route, RouteId, RouteTable, Template, DEFAULT_PATH};

/// What the app must display after a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteChange {
    pub route: RouteId,
    pub template: Template,
    pub initializer: Option<Initializer>,
}

impl From<&Route> for RouteChange {
    fn from(route: &Route) -> Self {
        Self {
            route: route.id,
            template: route.template,
            initializer: route.initializer,
        }
    }
}

/// Router state: route table, history and current route
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    history: Vec<String>,
    current: RouteId,
}

impl Router {
    /// Create a router positioned at `initial_path`.
    ///
    /// An unknown initial path is redirected to the default route.
    pub fn new(table: RouteTable, initial_path: &str) -> Self {
        let mut router = Self {
            current: table.default_route().id,
            table,
            history: Vec::new(),
        };
        router.history.push(initial_path.to_string());
        router.render_route();
        router
    }

    /// Router over the standard route table
    pub fn standard(initial_path: &str) -> Self {
        Self::new(RouteTable::standard(), initial_path)
    }

    /// Current path (top of history)
    pub fn path(&self) -> &str {
        self.history
            .last()
            .map(String::as_str)
            .unwrap_or(DEFAULT_PATH)
    }

    /// Currently displayed route
    pub fn current(&self) -> RouteId {
        self.current
    }

    /// Number of history entries
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Push `path` onto history and resolve it
    pub fn navigate(&mut self, path: &str) -> RouteChange {
        tracing::debug!(path = %path, "Navigate");
        self.history.push(path.to_string());
        self.render_route()
    }

    /// Pop the current history entry and resolve the previous one.
    ///
    /// Returns `None` when there is no earlier entry.
    pub fn back(&mut self) -> Option<RouteChange> {
        if self.history.len() < 2 {
            return None;
        }
        self.history.pop();
        tracing::debug!(path = %self.path(), "Back");
        Some(self.render_route())
    }

    /// Navigate to the path a link points at
    pub fn follow_link(&mut self, href: &str) -> RouteChange {
        let path = link_path(href);
        self.navigate(&path)
    }

    /// Resolve the current path and make it the displayed route.
    ///
    /// An unmatched path is replaced in history by the default path, the
    /// same as a redirect.
    pub fn render_route(&mut self) -> RouteChange {
        let path = self.path().to_string();
        let change = match self.table.resolve(&path) {
            Resolution::Matched(route) => RouteChange::from(route),
            Resolution::Fallback { requested, route } => {
                tracing::debug!(requested = %requested, redirect = %route.path, "Unknown path, redirecting");
                if let Some(last) = self.history.last_mut() {
                    *last = route.path.to_string();
                }
                RouteChange::from(route)
            }
        };

        self.current = change.route;
        change
    }
}

/// Extract the path from a link target.
///
/// Absolute URLs keep only their path; bare paths are returned as given,
/// minus any query or fragment.
pub fn link_path(href: &str) -> String {
    if let Ok(url) = reqwest::Url::parse(href) {
        return url.path().to_string();
    }

    let end = href.find(['?', '#']).unwrap_or(href.len());
    let path = &href[..end];
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
