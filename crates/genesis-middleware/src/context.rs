//! Per-invocation state shared by an endpoint's filters and its handler.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use genesis_core::Scope;
use http::Method;

use crate::argument::BoxedArgument;

/// The invocation of one endpoint: its bound arguments, the request line,
/// and the request's service scope.
///
/// Filters read arguments through their payloads; the handler takes
/// ownership of them once every filter has called through.
pub struct FilterContext {
    method: Method,
    path: String,
    arguments: Vec<BoxedArgument>,
    scope: Arc<Scope>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    started_at: Instant,
}

impl FilterContext {
    /// Creates a context for a bound invocation.
    #[must_use]
    pub fn new(
        method: Method,
        path: impl Into<String>,
        arguments: Vec<BoxedArgument>,
        scope: Arc<Scope>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            arguments,
            scope,
            extensions: HashMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request's service scope.
    #[must_use]
    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    /// Number of bound arguments.
    #[must_use]
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Payload of the argument at `index`.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&(dyn Any + Send + Sync)> {
        self.arguments.get(index).and_then(|argument| argument.payload())
    }

    /// Short type names of the bound arguments, in order.
    pub fn argument_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.arguments.iter().map(|argument| argument.type_name())
    }

    /// The first argument whose payload is a `T`.
    #[must_use]
    pub fn find_payload<T: Any>(&self) -> Option<&T> {
        self.arguments
            .iter()
            .filter_map(|argument| argument.payload())
            .find(|payload| (**payload).type_id() == TypeId::of::<T>())
            .and_then(|payload| payload.downcast_ref::<T>())
    }

    /// Hands the arguments to the handler, leaving the context empty.
    pub fn take_arguments(&mut self) -> Vec<BoxedArgument> {
        std::mem::take(&mut self.arguments)
    }

    /// Time since the invocation started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a value for later filters.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Reads a value stored by an earlier filter.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    /// Removes a stored value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast().ok())
            .map(|value| *value)
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        Self::with_arguments(Vec::new())
    }

    #[cfg(test)]
    pub(crate) fn with_arguments(arguments: Vec<BoxedArgument>) -> Self {
        let scope = Arc::new(Arc::new(genesis_core::Container::new()).create_scope());
        Self::new(Method::GET, "/", arguments, scope)
    }
}

impl fmt::Debug for FilterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("arguments", &self.argument_types().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
