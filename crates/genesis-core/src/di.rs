//! Dependency injection container.
//!
//! Services are registered at startup with a [`Lifetime`] and a factory, then
//! resolved through a [`Scope`]. The host creates one scope per request.
//!
//! Any `T: ?Sized` can be registered, including trait objects, because the
//! container stores the `Arc<T>` handed out by the factory.
//!
//! # Example
//!
//! ```rust
//! use genesis_core::di::{Container, Lifetime};
//! use std::sync::Arc;
//!
//! struct Greeting(&'static str);
//!
//! let mut container = Container::new();
//! container.add_singleton(|_| Ok(Arc::new(Greeting("Hello"))));
//!
//! let container = Arc::new(container);
//! let scope = container.create_scope();
//! let greeting = scope.resolve::<Greeting>().unwrap();
//! assert_eq!(greeting.0, "Hello");
//! assert_eq!(container.lifetime_of::<Greeting>(), Some(Lifetime::Singleton));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::{GenesisError, GenesisResult};
use crate::naming::short_type_name;

/// Type-erased service: an `Arc<Arc<T>>` seen as `Any`.
type Erased = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn(&Scope) -> GenesisResult<Erased> + Send + Sync>;

/// How long a resolved service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// A new instance on every resolution.
    Transient,
    /// One instance per scope.
    Scoped,
    /// One instance per container.
    Singleton,
}

struct Registration {
    lifetime: Lifetime,
    factory: Factory,
    singleton: OnceLock<Erased>,
    type_name: &'static str,
}

/// Service registrations.
///
/// Cloning is cheap and clones share singleton instances.
#[derive(Clone, Default)]
pub struct Container {
    registrations: HashMap<TypeId, Arc<Registration>>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for `T`. A later registration for the same type
    /// replaces the earlier one.
    pub fn add<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> GenesisResult<Arc<T>> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |scope: &Scope| {
            let service = factory(scope)?;
            Ok(Arc::new(service) as Erased)
        });
        self.insert::<T>(lifetime, factory, OnceLock::new());
        self
    }

    /// Registers a singleton factory.
    pub fn add_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> GenesisResult<Arc<T>> + Send + Sync + 'static,
    {
        self.add(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory.
    pub fn add_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> GenesisResult<Arc<T>> + Send + Sync + 'static,
    {
        self.add(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory.
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> GenesisResult<Arc<T>> + Send + Sync + 'static,
    {
        self.add(Lifetime::Transient, factory)
    }

    /// Registers an existing value as a singleton.
    pub fn add_singleton_instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add_shared_instance(Arc::new(value))
    }

    /// Registers an existing shared value as a singleton.
    pub fn add_shared_instance<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        value: Arc<T>,
    ) -> &mut Self {
        let erased: Erased = Arc::new(Arc::clone(&value));
        let cell = OnceLock::new();
        let _ = cell.set(Arc::clone(&erased));
        let factory: Factory = Arc::new(move |_: &Scope| Ok(Arc::clone(&erased)));
        self.insert::<T>(Lifetime::Singleton, factory, cell);
        self
    }

    fn insert<T: ?Sized + 'static>(
        &mut self,
        lifetime: Lifetime,
        factory: Factory,
        singleton: OnceLock<Erased>,
    ) {
        let type_name = short_type_name::<T>();
        tracing::trace!(service = type_name, ?lifetime, "service registered");
        self.registrations.insert(
            TypeId::of::<T>(),
            Arc::new(Registration {
                lifetime,
                factory,
                singleton,
                type_name,
            }),
        );
    }

    /// Returns true if `T` is registered.
    #[must_use]
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// Returns the registered lifetime of `T`.
    #[must_use]
    pub fn lifetime_of<T: ?Sized + 'static>(&self) -> Option<Lifetime> {
        self.registrations
            .get(&TypeId::of::<T>())
            .map(|registration| registration.lifetime)
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Opens a new resolution scope.
    #[must_use]
    pub fn create_scope(self: &Arc<Self>) -> Scope {
        Scope::new(Arc::clone(self))
    }

    /// Resolves `T` in a throwaway scope.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(self: &Arc<Self>) -> GenesisResult<Arc<T>> {
        self.create_scope().resolve::<T>()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut services: Vec<_> = self
            .registrations
            .values()
            .map(|registration| (registration.type_name, registration.lifetime))
            .collect();
        services.sort_by_key(|(name, _)| *name);
        f.debug_struct("Container")
            .field("services", &services)
            .finish()
    }
}

/// A resolution scope. Scoped services are cached here.
pub struct Scope {
    container: Arc<Container>,
    scoped: Mutex<HashMap<TypeId, Erased>>,
}

impl Scope {
    /// Opens a scope over a container.
    #[must_use]
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            scoped: Mutex::new(HashMap::new()),
        }
    }

    /// The container this scope resolves from.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Resolves `T`, failing with [`GenesisError::ServiceNotFound`] when it
    /// is not registered.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> GenesisResult<Arc<T>> {
        self.try_resolve::<T>()?
            .ok_or_else(GenesisError::service_not_found::<T>)
    }

    /// Resolves `T`, returning `Ok(None)` when it is not registered.
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> GenesisResult<Option<Arc<T>>> {
        let Some(erased) = self.resolve_erased(TypeId::of::<T>())? else {
            return Ok(None);
        };
        erased
            .downcast_ref::<Arc<T>>()
            .map(|service| Some(Arc::clone(service)))
            .ok_or_else(|| {
                GenesisError::internal(format!(
                    "registration for {} produced a different type",
                    short_type_name::<T>()
                ))
            })
    }

    fn resolve_erased(&self, id: TypeId) -> GenesisResult<Option<Erased>> {
        let Some(registration) = self.container.registrations.get(&id) else {
            return Ok(None);
        };
        let service = match registration.lifetime {
            Lifetime::Transient => (registration.factory)(self)?,
            Lifetime::Singleton => {
                if let Some(existing) = registration.singleton.get() {
                    return Ok(Some(Arc::clone(existing)));
                }
                let created = (registration.factory)(self)?;
                // First writer wins when two scopes race.
                Arc::clone(registration.singleton.get_or_init(|| created))
            }
            Lifetime::Scoped => {
                if let Some(existing) = self.scoped.lock().get(&id) {
                    return Ok(Some(Arc::clone(existing)));
                }
                // The factory may resolve other scoped services; the lock is
                // not held across the call.
                let created = (registration.factory)(self)?;
                Arc::clone(self.scoped.lock().entry(id).or_insert(created))
            }
        };
        Ok(Some(service))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("container", &self.container)
            .field("cached", &self.scoped.lock().len())
            .finish()
    }
}
