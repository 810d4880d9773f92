//! Verb-based routing for a single path.
//!
//! [`MethodRouter`] maps each supported [`HttpVerb`] to the [`RouteId`] of the
//! endpoint registered for it.

use http::Method;

use crate::verb::HttpVerb;
use crate::RouteId;

/// Maps verbs to route ids for one path.
///
/// # Example
///
/// ```rust
/// use genesis_router::{HttpVerb, MethodRouter, RouteId};
///
/// let router = MethodRouter::new()
///     .get(RouteId::new(0))
///     .delete(RouteId::new(1));
///
/// assert_eq!(router.route_for(HttpVerb::Get), Some(RouteId::new(0)));
/// assert_eq!(router.route_for(HttpVerb::Post), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodRouter {
    slots: [Option<RouteId>; 5],
}

impl MethodRouter {
    /// Creates an empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route for a verb, replacing any previous registration.
    #[must_use]
    pub fn on(mut self, verb: HttpVerb, route: RouteId) -> Self {
        self.slots[verb.slot()] = Some(route);
        self
    }

    /// Registers a GET route.
    #[must_use]
    pub fn get(self, route: RouteId) -> Self {
        self.on(HttpVerb::Get, route)
    }

    /// Registers a POST route.
    #[must_use]
    pub fn post(self, route: RouteId) -> Self {
        self.on(HttpVerb::Post, route)
    }

    /// Registers a PUT route.
    #[must_use]
    pub fn put(self, route: RouteId) -> Self {
        self.on(HttpVerb::Put, route)
    }

    /// Registers a PATCH route.
    #[must_use]
    pub fn patch(self, route: RouteId) -> Self {
        self.on(HttpVerb::Patch, route)
    }

    /// Registers a DELETE route.
    #[must_use]
    pub fn delete(self, route: RouteId) -> Self {
        self.on(HttpVerb::Delete, route)
    }

    /// Registers a route for an [`http::Method`].
    ///
    /// Methods outside the supported set are ignored.
    #[must_use]
    pub fn method(self, method: &Method, route: RouteId) -> Self {
        match HttpVerb::from_method(method) {
            Some(verb) => self.on(verb, route),
            None => self,
        }
    }

    /// Returns the route registered for a verb.
    #[must_use]
    pub fn route_for(&self, verb: HttpVerb) -> Option<RouteId> {
        self.slots[verb.slot()]
    }

    /// Returns the route registered for an [`http::Method`].
    #[must_use]
    pub fn route_for_method(&self, method: &Method) -> Option<RouteId> {
        HttpVerb::from_method(method).and_then(|verb| self.route_for(verb))
    }

    /// Merges another method router into this one.
    ///
    /// Verbs already registered here are kept; only empty slots are filled.
    pub fn merge(&mut self, other: MethodRouter) {
        for (slot, incoming) in self.slots.iter_mut().zip(other.slots) {
            if slot.is_none() {
                *slot = incoming;
            }
        }
    }

    /// Returns true if any verb is registered.
    #[must_use]
    pub fn has_any_verb(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Returns the registered verbs in slot order.
    #[must_use]
    pub fn allowed_verbs(&self) -> Vec<HttpVerb> {
        HttpVerb::ALL
            .into_iter()
            .filter(|verb| self.route_for(*verb).is_some())
            .collect()
    }
}
