//! Route table
//!
//! Static mapping from path to template and optional initializer,
//! built once at startup.

use std::fmt;

/// Path of the route unknown paths redirect to
pub const DEFAULT_PATH: &str = "/dashboard";

/// Identifies a registered route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Login,
    Dashboard,
    Credits,
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteId::Login => "login",
            RouteId::Dashboard => "dashboard",
            RouteId::Credits => "credits",
        };
        write!(f, "{}", name)
    }
}

/// View template a route displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Login,
    Dashboard,
    Credits,
}

/// Work to run after a route's template is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Initializer {
    /// Re-fetch the account and redraw the dashboard
    Refresh,
}

/// A registered route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub path: &'static str,
    pub template: Template,
    pub initializer: Option<Initializer>,
}

/// Result of looking up a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Path is registered
    Matched(&'a Route),
    /// Path is unknown; `route` is the default it redirects to
    Fallback { requested: &'a str, route: &'a Route },
}

impl<'a> Resolution<'a> {
    /// Route that will be displayed either way
    pub fn route(&self) -> &'a Route {
        match self {
            Resolution::Matched(route) => route,
            Resolution::Fallback { route, .. } => route,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }
}

/// Read-only set of routes plus the default
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    default: usize,
}

impl RouteTable {
    /// The client's routes: login, dashboard (refreshed on entry), credits
    pub fn standard() -> Self {
        let routes = vec![
            Route {
                id: RouteId::Login,
                path: "/login",
                template: Template::Login,
                initializer: None,
            },
            Route {
                id: RouteId::Dashboard,
                path: DEFAULT_PATH,
                template: Template::Dashboard,
                initializer: Some(Initializer::Refresh),
            },
            Route {
                id: RouteId::Credits,
                path: "/credits",
                template: Template::Credits,
                initializer: None,
            },
        ];

        Self { routes, default: 1 }
    }

    /// Look up `path`, falling back to the default route.
    ///
    /// Matching is exact: no trailing-slash or case normalization.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Resolution<'a> {
        match self.routes.iter().find(|route| route.path == path) {
            Some(route) => Resolution::Matched(route),
            None => Resolution::Fallback {
                requested: path,
                route: self.default_route(),
            },
        }
    }

    /// Route for a given id
    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.routes.iter().find(|route| route.id == id)
    }

    /// Path registered for `id`
    pub fn path_of(&self, id: RouteId) -> &'static str {
        self.get(id).map(|route| route.path).unwrap_or(DEFAULT_PATH)
    }

    pub fn default_route(&self) -> &Route {
        &self.routes[self.default]
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
