//! Path-and-verb route table.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::verb::HttpVerb;
use crate::{RouteId, RouteLookup, RouteMatch};

/// Radix tree router resolving `(verb, path)` to a [`RouteId`].
///
/// Literal segments win over `{param}` segments, which win over `*wildcard`.
///
/// # Example
///
/// ```rust
/// use genesis_router::{HttpVerb, RouteId, RouteLookup, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(HttpVerb::Get, "/api/todos/{id}", RouteId::new(0));
///
/// match router.lookup(&Method::GET, "/api/todos/3") {
///     RouteLookup::Found(m) => assert_eq!(m.params.get("id"), Some("3")),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Router {
    root: Node,
    route_count: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Inserts a verb table for a path template.
    ///
    /// Inserting the same template twice merges the verb tables; verbs that
    /// are already registered keep their first route.
    pub fn insert(&mut self, path: &str, methods: MethodRouter) {
        self.route_count += methods.allowed_verbs().len();
        self.root.insert(path, methods);
    }

    /// Registers a single `(verb, path)` route.
    pub fn route(&mut self, verb: HttpVerb, path: &str, route: RouteId) {
        self.insert(path, MethodRouter::new().on(verb, route));
    }

    /// Matches a request method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        match self.lookup(method, path) {
            RouteLookup::Found(found) => Some(found),
            _ => None,
        }
    }

    /// Matches a request, distinguishing unknown paths from unknown verbs.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> RouteLookup {
        let Some((methods, params)) = self.root.match_path(path) else {
            return RouteLookup::NotFound;
        };
        match methods.route_for_method(method) {
            Some(route) => RouteLookup::Found(RouteMatch::new(route, params)),
            None => RouteLookup::MethodNotAllowed(methods.allowed_verbs()),
        }
    }

    /// Matches a path regardless of verb.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        self.root.match_path(path)
    }

    /// Number of `(verb, path)` registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> RouteId {
        RouteId::new(n)
    }

    #[test]
    fn test_router_new() {
        let router = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn test_router_counts_each_verb() {
        let mut router = Router::new();
        router.insert("/api/echo", MethodRouter::new().get(id(0)).delete(id(1)));
        router.route(HttpVerb::Post, "/api/echo", id(2));
        assert_eq!(router.len(), 3);
    }

    #[test]
    fn test_router_same_path_many_verbs() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/api/echo", id(0));
        router.route(HttpVerb::Delete, "/api/echo", id(1));
        router.route(HttpVerb::Post, "/api/echo", id(2));

        assert_eq!(router.match_route(&Method::GET, "/api/echo").map(|m| m.route), Some(id(0)));
        assert_eq!(router.match_route(&Method::DELETE, "/api/echo").map(|m| m.route), Some(id(1)));
        assert_eq!(router.match_route(&Method::POST, "/api/echo").map(|m| m.route), Some(id(2)));
    }

    #[test]
    fn test_router_method_not_allowed() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/api/todos", id(0));
        router.route(HttpVerb::Put, "/api/todos", id(1));

        assert_eq!(
            router.lookup(&Method::DELETE, "/api/todos"),
            RouteLookup::MethodNotAllowed(vec![HttpVerb::Get, HttpVerb::Put])
        );
        assert_eq!(router.lookup(&Method::GET, "/missing"), RouteLookup::NotFound);
    }

    #[test]
    fn test_router_unsupported_method_is_not_allowed() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/api/todos", id(0));
        assert!(matches!(
            router.lookup(&Method::HEAD, "/api/todos"),
            RouteLookup::MethodNotAllowed(_)
        ));
    }

    #[test]
    fn test_router_params() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/api/todos/{id}", id(0));

        let found = router.match_route(&Method::GET, "/api/todos/12").unwrap();
        assert_eq!(found.route, id(0));
        assert_eq!(found.params.get("id"), Some("12"));
    }

    #[test]
    fn test_router_trailing_slash() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/api/todos", id(0));
        assert!(router.match_route(&Method::GET, "/api/todos/").is_some());
    }

    #[test]
    fn test_router_root_path() {
        let mut router = Router::new();
        router.route(HttpVerb::Get, "/", id(0));
        assert!(router.match_route(&Method::GET, "/").is_some());
    }
}
