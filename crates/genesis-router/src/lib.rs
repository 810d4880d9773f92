//! Radix tree router for Genesis endpoints.
//!
//! The router resolves `(verb, path)` pairs to [`RouteId`]s. It only knows the
//! five verbs endpoints can be mapped to (see [`HttpVerb`]); the handlers and
//! filters behind a route id live in the application host.
//!
//! # Example
//!
//! ```rust
//! use genesis_router::{join_route_template, normalize_path, HttpVerb, RouteId, Router};
//! use http::Method;
//!
//! let path = normalize_path(&join_route_template("api", "echo"));
//!
//! let mut router = Router::new();
//! router.route(HttpVerb::Get, &path, RouteId::new(0));
//! router.route(HttpVerb::Delete, &path, RouteId::new(1));
//!
//! let found = router.match_route(&Method::DELETE, "/api/echo").unwrap();
//! assert_eq!(found.route, RouteId::new(1));
//! ```
//!
//! # Layout
//!
//! ```text
//!              (root)
//!                │
//!              "api"
//!         ┌──────┴──────┐
//!       "echo"       "todos"
//!   [GET,DELETE,..]  [GET,PUT]
//!                       │
//!                     "{id}"
//!                     [GET]
//! ```

mod method_router;
mod node;
mod params;
mod router;
mod template;
mod verb;

pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;
pub use template::{join_route_template, normalize_path};
pub use verb::HttpVerb;

/// Index of a registered endpoint in the host's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    /// Wraps a route table index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the route table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A matched route and its captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Route table entry for the matched verb
    pub route: RouteId,
    /// Captured path parameters
    pub params: Params,
}

impl RouteMatch {
    /// Creates a route match.
    #[must_use]
    pub fn new(route: RouteId, params: Params) -> Self {
        Self { route, params }
    }
}

/// Outcome of [`Router::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLookup {
    /// Path and verb matched
    Found(RouteMatch),
    /// Path matched; the verb is not registered. Carries the registered verbs.
    MethodNotAllowed(Vec<HttpVerb>),
    /// No template matched the path
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_joined_template_routes() {
        let mut router = Router::new();
        for (n, template) in ["todos", "/todos/{id}", "todos/complete"].iter().enumerate() {
            let path = normalize_path(&join_route_template("api/", template));
            router.route(HttpVerb::Get, &path, RouteId::new(n));
        }

        let m = router.match_route(&Method::GET, "/api/todos").unwrap();
        assert_eq!(m.route.index(), 0);

        let m = router.match_route(&Method::GET, "/api/todos/5").unwrap();
        assert_eq!(m.route.index(), 1);
        assert_eq!(m.params.get("id"), Some("5"));

        let m = router.match_route(&Method::GET, "/api/todos/complete").unwrap();
        assert_eq!(m.route.index(), 2);
    }
}
