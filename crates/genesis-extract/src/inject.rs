//! Dependency injection extractor.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use genesis_core::short_type_name;

use crate::{ExtractionContext, ExtractionError, FromRequest};

/// Resolves a service from the request's scope.
///
/// ```rust
/// use std::sync::Arc;
/// use genesis_core::Container;
/// use genesis_extract::{ExtractionContextBuilder, FromRequest, Inject};
///
/// struct Clock {
///     now: u64,
/// }
///
/// let mut container = Container::new();
/// container.add_singleton_instance(Clock { now: 42 });
/// let scope = Arc::new(Arc::new(container).create_scope());
///
/// let ctx = ExtractionContextBuilder::new().scope(scope).build();
/// let clock = Inject::<Clock>::from_request(&ctx).unwrap();
/// assert_eq!(clock.now, 42);
/// ```
pub struct Inject<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> Inject<T> {
    /// Consumes the wrapper and returns the inner Arc.
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Inject").field(&short_type_name::<T>()).finish()
    }
}

impl<T: ?Sized + Send + Sync + 'static> FromRequest for Inject<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        let name = short_type_name::<T>();
        let scope = ctx.scope().ok_or_else(|| {
            ExtractionError::service_unavailable(name, "no service scope available")
        })?;

        scope
            .resolve::<T>()
            .map(Inject)
            .map_err(|err| ExtractionError::service_unavailable(name, err.to_string()))
    }

    fn payload(&self) -> Option<&(dyn Any + Send + Sync)> {
        None
    }
}
