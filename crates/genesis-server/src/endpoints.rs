//! Mapping whole endpoint types from their route tables.
//!
//! A type describes its routes once, in [`MapAttributes::route_attributes`]:
//! a route root, then per method the verbs and templates it answers,
//! method-level validation markers and the function to call. The
//! `#[endpoints]` attribute macro writes that description from annotated
//! methods; it can also be written by hand.
//!
//! ```rust
//! use std::sync::Arc;
//! use genesis_extract::{Json, Query};
//! use genesis_server::{App, EndpointTable, MapAttributes};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Message {
//!     message: String,
//! }
//!
//! struct EchoEndpoints;
//!
//! impl MapAttributes for EchoEndpoints {
//!     fn route_attributes(table: &mut EndpointTable<Self>) {
//!         table.route_root("api");
//!         table
//!             .method("echo_query")
//!             .route(&["GET", "DELETE"], "echo")
//!             .bind_static(|Query(m): Query<Message>| async move { m.message });
//!         table
//!             .method("echo_body")
//!             .route(&["POST"], "/echo")
//!             .bind_static(|Json(m): Json<String>| async move { m });
//!     }
//! }
//!
//! let mut app = App::new();
//! app.map_static_endpoints::<EchoEndpoints>().unwrap();
//!
//! let paths: Vec<_> = app.routes().map(|r| (r.verb.as_str(), r.path.as_str())).collect();
//! assert_eq!(paths, [("GET", "/api/echo"), ("DELETE", "/api/echo"), ("POST", "/api/echo")]);
//! ```

use std::any::type_name;
use std::sync::Arc;

use genesis_core::{short_type_name, Container, GenesisError, GenesisResult, Lifetime, Scope};
use genesis_middleware::{ValidationRequirement, ValidationRequirements};
use genesis_router::{join_route_template, HttpVerb};

use crate::app::App;
use crate::handler::{BoxedHandler, Handler};

/// A type whose methods are mapped as endpoints.
pub trait MapAttributes: Send + Sync + Sized + 'static {
    /// Describes the type's routes.
    fn route_attributes(table: &mut EndpointTable<Self>);

    /// The self-registering view of this value, if the type has one.
    fn as_endpoints(self: Arc<Self>) -> Option<Arc<dyn Endpoints>> {
        None
    }
}

/// Endpoints that map additional routes themselves.
pub trait Endpoints: Send + Sync + 'static {
    /// Adds routes to `app`.
    fn register_endpoints(self: Arc<Self>, app: &mut App);
}

type InstanceBinding<S> = Box<dyn Fn(Arc<S>) -> BoxedHandler + Send + Sync>;

enum Binding<S> {
    Instance {
        bind: InstanceBinding<S>,
        requirements: fn() -> Vec<ValidationRequirement>,
    },
    Static(BoxedHandler),
}

impl<S> Binding<S> {
    fn requirements(&self) -> Vec<ValidationRequirement> {
        match self {
            Self::Instance { requirements, .. } => requirements(),
            Self::Static(handler) => handler.requirements(),
        }
    }
}

struct MethodEntry<S> {
    name: &'static str,
    routes: Vec<(Vec<String>, String)>,
    validators: ValidationRequirements,
    binding: Option<Binding<S>>,
}

/// Route description of an endpoint type.
pub struct EndpointTable<S> {
    route_root: String,
    methods: Vec<MethodEntry<S>>,
}

impl<S: MapAttributes> EndpointTable<S> {
    /// Builds the table of `S`.
    #[must_use]
    pub fn of() -> Self {
        let mut table = Self {
            route_root: String::new(),
            methods: Vec::new(),
        };
        S::route_attributes(&mut table);
        table
    }

    /// Sets the template every method template is joined onto.
    pub fn route_root(&mut self, template: impl Into<String>) -> &mut Self {
        self.route_root = template.into();
        self
    }

    /// Starts describing a method.
    pub fn method(&mut self, name: &'static str) -> MethodBuilder<'_, S> {
        self.methods.push(MethodEntry {
            name,
            routes: Vec::new(),
            validators: ValidationRequirements::new(),
            binding: None,
        });
        let index = self.methods.len() - 1;
        MethodBuilder {
            entry: &mut self.methods[index],
        }
    }

    /// The route root.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.route_root
    }

    /// Every `(verb, path)` pair the table maps, in declaration order.
    ///
    /// Unsupported verb literals are left out.
    #[must_use]
    pub fn route_paths(&self) -> Vec<(HttpVerb, String)> {
        self.methods
            .iter()
            .flat_map(|method| method.routes.iter())
            .flat_map(|(verbs, template)| {
                let path = join_route_template(&self.route_root, template);
                verbs
                    .iter()
                    .filter_map(|literal| HttpVerb::parse(literal))
                    .map(move |verb| (verb, path.clone()))
            })
            .collect()
    }
}

impl<S> std::fmt::Debug for EndpointTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointTable")
            .field("route_root", &self.route_root)
            .field(
                "methods",
                &self.methods.iter().map(|m| m.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Describes one method of an [`EndpointTable`].
pub struct MethodBuilder<'t, S> {
    entry: &'t mut MethodEntry<S>,
}

impl<S: MapAttributes> MethodBuilder<'_, S> {
    /// Answers `template` for each verb literal.
    ///
    /// Literals other than `GET`, `POST`, `PUT`, `PATCH` and `DELETE` are
    /// ignored when the table is mapped.
    #[must_use = "bind a handler to finish the method"]
    pub fn route(self, verbs: &[&str], template: impl Into<String>) -> Self {
        let verbs = verbs.iter().map(|verb| (*verb).to_string()).collect();
        self.entry.routes.push((verbs, template.into()));
        self
    }

    /// Validates the first argument of type `T` on every route of the method.
    #[must_use = "bind a handler to finish the method"]
    pub fn validate<T: Send + Sync + 'static>(self) -> Self {
        self.entry.validators.insert(ValidationRequirement::of::<T>());
        self
    }

    /// Binds a handler built from the mapped instance.
    pub fn bind<F, H, Args>(self, bind: F)
    where
        F: Fn(Arc<S>) -> H + Send + Sync + 'static,
        H: Handler<Args>,
        Args: 'static,
    {
        self.entry.binding = Some(Binding::Instance {
            bind: Box::new(move |this: Arc<S>| BoxedHandler::new(bind(this))),
            requirements: H::requirements,
        });
    }

    /// Binds a handler that needs no instance.
    pub fn bind_static<H, Args>(self, handler: H)
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.entry.binding = Some(Binding::Static(BoxedHandler::new(handler)));
    }
}

impl App {
    /// Resolves `T` from a fresh scope and maps its endpoints.
    ///
    /// When `T` is self-registering its [`Endpoints::register_endpoints`]
    /// runs first.
    ///
    /// # Errors
    ///
    /// [`GenesisError::ServiceNotFound`] when `T` is not registered, the
    /// factory's error when it fails, and [`GenesisError::InvalidArgument`]
    /// when a routed method has no handler.
    pub fn map_endpoints<T: MapAttributes>(&mut self) -> GenesisResult<&mut Self> {
        let scope = self.services().create_scope();
        let service = match scope.try_resolve::<T>()? {
            Some(service) => service,
            None => return Err(GenesisError::service_not_found::<T>()),
        };

        if let Some(endpoints) = Arc::clone(&service).as_endpoints() {
            endpoints.register_endpoints(self);
        }

        self.register_table(EndpointTable::<T>::of(), Some(service))?;
        Ok(self)
    }

    /// Maps the endpoints of a stateless type.
    ///
    /// # Errors
    ///
    /// [`GenesisError::InvalidArgument`] when `T` carries state or one of
    /// its methods needs an instance.
    pub fn map_static_endpoints<T: MapAttributes>(&mut self) -> GenesisResult<&mut Self> {
        if std::mem::size_of::<T>() != 0 {
            return Err(GenesisError::invalid_argument(
                "type",
                format!("{} must be a static class!", short_type_name::<T>()),
            ));
        }

        self.register_table(EndpointTable::<T>::of(), None)?;
        Ok(self)
    }

    fn register_table<S: MapAttributes>(
        &mut self,
        table: EndpointTable<S>,
        instance: Option<Arc<S>>,
    ) -> GenesisResult<()> {
        let type_name = short_type_name::<S>();
        let EndpointTable { route_root, methods } = table;

        let mut bound = Vec::with_capacity(methods.len());
        for method in methods {
            if method.routes.is_empty() {
                continue;
            }
            let Some(binding) = method.binding else {
                return Err(GenesisError::invalid_argument(
                    "method",
                    format!("{type_name}::{} has routes but no handler", method.name),
                ));
            };

            let mut requirements = method.validators;
            requirements.extend(binding.requirements());

            let handler = match (binding, &instance) {
                (Binding::Static(handler), _) => handler,
                (Binding::Instance { bind, .. }, Some(instance)) => bind(Arc::clone(instance)),
                (Binding::Instance { .. }, None) => {
                    return Err(GenesisError::invalid_argument(
                        "type",
                        format!(
                            "{type_name}::{} needs an instance and cannot be mapped statically",
                            method.name
                        ),
                    ));
                }
            };
            bound.push((method.name, method.routes, requirements, handler));
        }

        for (name, routes, requirements, handler) in bound {
            for (verbs, template) in routes {
                let path = join_route_template(&route_root, &template);
                for literal in verbs {
                    let Some(verb) = HttpVerb::parse(&literal) else {
                        tracing::debug!(
                            r#type = type_name,
                            method = name,
                            verb = %literal,
                            "skipping unsupported verb"
                        );
                        continue;
                    };
                    self.insert_route(verb, &path, handler.clone(), &requirements);
                }
            }
        }

        tracing::debug!(r#type = type_name, root = %route_root, "mapped endpoints");
        Ok(())
    }
}

/// Registration helpers for endpoint types.
///
/// Each helper registers `T` under the matching [`Lifetime`] so that
/// [`App::map_endpoints`] can resolve it.
pub trait EndpointServices {
    /// Registers `T` as a singleton.
    fn add_singleton_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static;

    /// Registers `T` as scoped.
    fn add_scoped_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static;

    /// Registers `T` as transient.
    fn add_transient_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static;

    /// Registers `T` through an arbitrary factory, as a singleton.
    fn register_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static;
}

fn add_endpoints<T, F>(container: &mut Container, lifetime: Lifetime, factory: F)
where
    T: MapAttributes,
    F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static,
{
    tracing::debug!(r#type = type_name::<T>(), ?lifetime, "registering endpoints");
    container.add::<T, _>(lifetime, move |scope: &Scope| factory(scope).map(Arc::new));
}

impl EndpointServices for Container {
    fn add_singleton_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static,
    {
        add_endpoints(self, Lifetime::Singleton, factory);
        self
    }

    fn add_scoped_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static,
    {
        add_endpoints(self, Lifetime::Scoped, factory);
        self
    }

    fn add_transient_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static,
    {
        add_endpoints(self, Lifetime::Transient, factory);
        self
    }

    fn register_endpoints<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: MapAttributes,
        F: Fn(&Scope) -> GenesisResult<T> + Send + Sync + 'static,
    {
        add_endpoints(self, Lifetime::Singleton, factory);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use genesis_extract::{Inject, Json, Query};
    use genesis_middleware::Validate;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Message {
        message: String,
    }

    #[derive(Debug, Deserialize)]
    struct Person {
        name: String,
    }

    struct Greeter {
        greeting: &'static str,
    }

    struct SampleEndpoints {
        greeter: Arc<Greeter>,
    }

    impl SampleEndpoints {
        fn greet(&self, name: &str) -> String {
            format!("{} {name}!", self.greeter.greeting)
        }
    }

    impl MapAttributes for SampleEndpoints {
        fn route_attributes(table: &mut EndpointTable<Self>) {
            table.route_root("api/");
            table
                .method("echo_content")
                .route(&["PATCH"], "echo")
                .route(&["POST", "PUT"], "/echo")
                .bind_static(|Json(message): Json<String>| async move { message });
            table
                .method("echo_non_content")
                .route(&["DELETE", "GET", "OPTIONS"], "echo")
                .bind_static(|Query(m): Query<Message>| async move { m.message });
            table
                .method("greet")
                .route(&["GET"], "hello")
                .validate::<Person>()
                .bind(|this: Arc<Self>| {
                    move |Query(person): Query<Person>| {
                        let this = Arc::clone(&this);
                        async move { this.greet(&person.name) }
                    }
                });
        }

        fn as_endpoints(self: Arc<Self>) -> Option<Arc<dyn Endpoints>> {
            Some(self)
        }
    }

    impl Endpoints for SampleEndpoints {
        fn register_endpoints(self: Arc<Self>, app: &mut App) {
            app.map_get("/api/greet", move |Query(person): Query<Person>| {
                let this = Arc::clone(&self);
                async move { this.greet(&person.name) }
            });
        }
    }

    struct StaticEndpoints;

    impl MapAttributes for StaticEndpoints {
        fn route_attributes(table: &mut EndpointTable<Self>) {
            table.route_root("api");
            table
                .method("static_echo")
                .route(&["GET", "DELETE"], "echo/static")
                .bind_static(|Validate(Query(m)): Validate<Query<Message>>| async move { m.message });
        }
    }

    fn sample_app() -> App {
        let mut app = App::new();
        app.services_mut()
            .add_singleton_instance(Greeter { greeting: "Hello" })
            .add_singleton_endpoints(|scope| {
                Ok(SampleEndpoints {
                    greeter: scope.resolve::<Greeter>()?,
                })
            });
        app
    }

    async fn get(app: &App, uri: &str) -> (StatusCode, String) {
        let request = http::Request::get(uri).body(Bytes::new()).unwrap();
        let response = app.handle(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_route_paths_join_root() {
        let table = EndpointTable::<SampleEndpoints>::of();
        assert_eq!(table.root(), "api/");
        let paths = table.route_paths();
        assert!(paths.iter().all(|(_, path)| path.starts_with("api/")));
        assert!(paths.contains(&(HttpVerb::Put, "api/echo".to_string())));
        assert_eq!(paths.len(), 6);
    }

    #[tokio::test]
    async fn test_map_endpoints_maps_table_and_self_registration() {
        let mut app = sample_app();
        app.map_endpoints::<SampleEndpoints>().unwrap();

        let mapped: Vec<_> = app.routes().map(|r| (r.verb, r.path.clone())).collect();
        assert_eq!(mapped[0], (HttpVerb::Get, "/api/greet".to_string()));
        assert_eq!(mapped.len(), 7);

        assert_eq!(
            get(&app, "/api/greet?name=sample").await,
            (StatusCode::OK, "Hello sample!".to_string())
        );
        assert_eq!(
            get(&app, "/api/echo?message=hello").await,
            (StatusCode::OK, "hello".to_string())
        );
    }

    #[tokio::test]
    async fn test_method_markers_attach_validation() {
        let mut app = sample_app();
        app.map_endpoints::<SampleEndpoints>().unwrap();

        let hello = app.routes().find(|r| r.path == "/api/hello").unwrap();
        assert!(hello.validators.contains::<Person>());

        let (status, body) = get(&app, "/api/hello?name=sample").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("Could not find validator for Person"));
    }

    #[test]
    fn test_missing_service() {
        let mut app = App::new();
        let err = app.map_endpoints::<SampleEndpoints>().unwrap_err();
        assert_eq!(err.to_string(), "Cannot find registered service SampleEndpoints");
        assert_eq!(app.routes().count(), 0);
    }

    #[tokio::test]
    async fn test_static_endpoints() {
        let mut app = App::new();
        app.map_static_endpoints::<StaticEndpoints>().unwrap();

        let route = app.routes().next().unwrap();
        assert!(route.validators.contains::<Message>());
        assert_eq!(route.path, "/api/echo/static");

        let (status, _) = get(&app, "/api/echo/static?message=hello").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_static_mapping_rejects_stateful_type() {
        let mut app = sample_app();
        let err = app.map_static_endpoints::<SampleEndpoints>().unwrap_err();
        assert_eq!(
            err,
            GenesisError::invalid_argument("type", "SampleEndpoints must be a static class!")
        );
        assert!(err.to_string().starts_with("SampleEndpoints must be a static class!"));
    }

    #[test]
    fn test_static_mapping_rejects_instance_binding() {
        struct Stateless;

        impl MapAttributes for Stateless {
            fn route_attributes(table: &mut EndpointTable<Self>) {
                table
                    .method("needs_self")
                    .route(&["GET"], "x")
                    .bind(|_this: Arc<Self>| || async { "x" });
            }
        }

        let mut app = App::new();
        let err = app.map_static_endpoints::<Stateless>().unwrap_err();
        assert!(matches!(err, GenesisError::InvalidArgument { ref name, .. } if name == "type"));
        assert_eq!(app.routes().count(), 0);
    }

    #[test]
    fn test_unbound_method_is_rejected() {
        struct Unbound;

        impl MapAttributes for Unbound {
            fn route_attributes(table: &mut EndpointTable<Self>) {
                let _ = table.method("orphan").route(&["GET"], "orphan");
            }
        }

        let err = App::new().map_static_endpoints::<Unbound>().unwrap_err();
        assert!(err.to_string().contains("Unbound::orphan has routes but no handler"));
    }

    #[tokio::test]
    async fn test_lifetimes_resolve_through_helpers() {
        for lifetime in [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient] {
            let mut app = App::new();
            app.services_mut().add_singleton_instance(Greeter { greeting: "Hello" });
            let factory = |scope: &Scope| -> GenesisResult<SampleEndpoints> {
                Ok(SampleEndpoints {
                    greeter: scope.resolve::<Greeter>()?,
                })
            };
            match lifetime {
                Lifetime::Singleton => app.services_mut().register_endpoints(factory),
                Lifetime::Scoped => app.services_mut().add_scoped_endpoints(factory),
                Lifetime::Transient => app.services_mut().add_transient_endpoints(factory),
            };
            assert_eq!(app.services().lifetime_of::<SampleEndpoints>(), Some(lifetime));

            app.map_endpoints::<SampleEndpoints>().unwrap();
            let (_, body) = get(&app, "/api/greet?name=sample").await;
            assert_eq!(body, "Hello sample!");
        }
    }

    #[tokio::test]
    async fn test_inject_inside_mapped_endpoint() {
        struct Clock;

        impl MapAttributes for Clock {
            fn route_attributes(table: &mut EndpointTable<Self>) {
                table
                    .method("now")
                    .route(&["GET"], "now")
                    .bind_static(|Inject(greeter): Inject<Greeter>| async move {
                        greeter.greeting.to_string()
                    });
            }
        }

        let mut app = sample_app();
        app.map_static_endpoints::<Clock>().unwrap();
        assert_eq!(get(&app, "/now").await, (StatusCode::OK, "Hello".to_string()));
    }
}
