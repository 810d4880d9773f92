//! The application: services, routes and request dispatch.

use std::sync::Arc;

use bytes::Bytes;
use genesis_core::{Container, ProblemDetails};
use genesis_extract::response::problem_response;
use genesis_extract::{ExtractionContext, IntoResponse, Response};
use genesis_middleware::{
    EndpointFilter, FilterContext, FilterPipeline, ValidationRequirement, ValidationRequirements,
};
use genesis_router::{normalize_path, HttpVerb, RouteId, RouteLookup, Router};
use http::header::ALLOW;
use http::{HeaderValue, StatusCode};

use crate::handler::{BoxedHandler, Handler};

/// Verb, template and validators of a mapped route.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Normalized path template.
    pub path: String,
    /// Types validated before the handler runs.
    pub validators: ValidationRequirements,
}

#[derive(Debug, Clone)]
pub(crate) struct RouteEntry {
    descriptor: RouteDescriptor,
    handler: BoxedHandler,
    filters: FilterPipeline,
}

/// Services plus routes.
///
/// ```rust
/// use genesis_server::App;
/// use genesis_extract::Query;
///
/// let mut app = App::new();
/// app.map_get("/ping", || async { "pong" });
/// app.map_get("/square", |Query(n): Query<u64>| async move { (n * n).to_string() });
///
/// assert_eq!(app.routes().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    container: Arc<Container>,
    router: Router,
    routes: Vec<RouteEntry>,
}

impl App {
    /// An application with no services and no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An application using an existing service container.
    #[must_use]
    pub fn with_container(container: Container) -> Self {
        Self {
            container: Arc::new(container),
            ..Self::default()
        }
    }

    /// The service container.
    #[must_use]
    pub fn services(&self) -> &Arc<Container> {
        &self.container
    }

    /// Mutable access to the service container.
    ///
    /// Registrations made here are visible to every later request.
    pub fn services_mut(&mut self) -> &mut Container {
        Arc::make_mut(&mut self.container)
    }

    /// Maps a GET route.
    pub fn map_get<H, Args>(&mut self, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.map(HttpVerb::Get, path, handler)
    }

    /// Maps a POST route.
    pub fn map_post<H, Args>(&mut self, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.map(HttpVerb::Post, path, handler)
    }

    /// Maps a PUT route.
    pub fn map_put<H, Args>(&mut self, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.map(HttpVerb::Put, path, handler)
    }

    /// Maps a PATCH route.
    pub fn map_patch<H, Args>(&mut self, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.map(HttpVerb::Patch, path, handler)
    }

    /// Maps a DELETE route.
    pub fn map_delete<H, Args>(&mut self, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        self.map(HttpVerb::Delete, path, handler)
    }

    /// Maps a route for `verb`.
    ///
    /// Parameters wrapped in [`Validate`](genesis_middleware::Validate) get
    /// their validation filters here.
    pub fn map<H, Args>(&mut self, verb: HttpVerb, path: &str, handler: H) -> RouteHandle<'_>
    where
        H: Handler<Args>,
        Args: 'static,
    {
        let handler = BoxedHandler::new(handler);
        let requirements = handler.requirements().into_iter().collect();
        let index = self.insert_route(verb, path, handler, &requirements);
        RouteHandle {
            entries: &mut self.routes[index..=index],
        }
    }

    pub(crate) fn insert_route(
        &mut self,
        verb: HttpVerb,
        path: &str,
        handler: BoxedHandler,
        requirements: &ValidationRequirements,
    ) -> usize {
        let path = normalize_path(path);
        if self.routes.iter().any(|r| r.descriptor.verb == verb && r.descriptor.path == path) {
            tracing::warn!(verb = verb.as_str(), path = %path, "route mapped twice, first mapping wins");
        }

        let index = self.routes.len();
        self.router.route(verb, &path, RouteId::new(index));

        let mut filters = FilterPipeline::new();
        for requirement in requirements.iter() {
            filters.push(requirement.create_filter());
        }

        tracing::debug!(
            verb = verb.as_str(),
            path = %path,
            validators = requirements.len(),
            "mapped route"
        );

        self.routes.push(RouteEntry {
            descriptor: RouteDescriptor {
                verb,
                path,
                validators: requirements.clone(),
            },
            handler,
            filters,
        });
        index
    }

    /// Descriptors of every mapped route, in mapping order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().map(|entry| &entry.descriptor)
    }

    /// Dispatches one request whose body was already read.
    pub async fn handle(&self, request: http::Request<Bytes>) -> Response {
        let (parts, body) = request.into_parts();

        let route_match = match self.router.lookup(&parts.method, parts.uri.path()) {
            RouteLookup::Found(route_match) => route_match,
            RouteLookup::MethodNotAllowed(verbs) => return method_not_allowed(&verbs),
            RouteLookup::NotFound => {
                let problem = ProblemDetails::new(StatusCode::NOT_FOUND, "Not Found")
                    .with_detail(format!("No endpoint matches {}", parts.uri.path()));
                return problem_response(&problem);
            }
        };

        let Some(entry) = self.routes.get(route_match.route.index()) else {
            tracing::error!(route = route_match.route.index(), "router returned an unknown route");
            return problem_response(&ProblemDetails::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ));
        };

        let scope = Arc::new(self.container.create_scope());
        let extraction = ExtractionContext::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers,
            body,
            route_match.params,
        )
        .with_scope(Arc::clone(&scope));

        let arguments = match entry.handler.bind(&extraction) {
            Ok(arguments) => arguments,
            Err(err) => {
                tracing::debug!(path = parts.uri.path(), error = %err, "argument binding failed");
                return err.into_response();
            }
        };

        let mut ctx = FilterContext::new(parts.method, parts.uri.path(), arguments, scope);
        let handler = &entry.handler;
        entry
            .filters
            .run(&mut ctx, |ctx| handler.call(ctx.take_arguments()))
            .await
    }
}

fn method_not_allowed(verbs: &[HttpVerb]) -> Response {
    let allow = verbs.iter().map(|verb| verb.as_str()).collect::<Vec<_>>().join(", ");
    let problem = ProblemDetails::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
        .with_detail(format!("Allowed methods: {allow}"));
    let mut response = problem_response(&problem);
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

/// Builder returned when routes are mapped; applies to every route it holds.
///
/// ```rust
/// use genesis_server::App;
/// use genesis_extract::Json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct EchoRequest { message: String }
///
/// let mut app = App::new();
/// app.map_post("/echo", |Json(r): Json<EchoRequest>| async move { r.message })
///     .add_validation_filter::<EchoRequest>();
///
/// let route = app.routes().next().unwrap();
/// assert!(route.validators.contains::<EchoRequest>());
/// ```
#[derive(Debug)]
pub struct RouteHandle<'a> {
    entries: &'a mut [RouteEntry],
}

impl RouteHandle<'_> {
    /// Appends a filter to every route.
    #[must_use = "the handle is returned for chaining"]
    pub fn add_filter<F: EndpointFilter>(self, filter: F) -> Self {
        let filter: Arc<dyn EndpointFilter> = Arc::new(filter);
        for entry in self.entries.iter_mut() {
            entry.filters.push(Arc::clone(&filter));
        }
        self
    }

    /// Validates the first argument of type `T` before the handler runs.
    #[must_use = "the handle is returned for chaining"]
    pub fn add_validation_filter<T: Send + Sync + 'static>(self) -> Self {
        let requirement = ValidationRequirement::of::<T>();
        for entry in self.entries.iter_mut() {
            if entry.descriptor.validators.insert(requirement) {
                entry.filters.push(requirement.create_filter());
            }
        }
        self
    }

    /// Descriptors of the routes this handle applies to.
    pub fn descriptors(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_core::{validator_fn, ValidationFailure, ValidationResult};
    use genesis_extract::{Inject, Json, Path, Query};
    use genesis_middleware::{filter_fn, Validate};
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct EchoRequest {
        message: String,
    }

    fn request(method: &str, uri: &str, body: &'static str) -> http::Request<Bytes> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    async fn send(app: &App, method: &str, uri: &str, body: &'static str) -> (StatusCode, String) {
        let response = app.handle(request(method, uri, body)).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn check_message(request: &EchoRequest) -> ValidationResult {
        if request.message.is_empty() {
            ValidationResult::from_failures([ValidationFailure::new(
                "Message",
                "Message must not be empty",
            )])
        } else {
            ValidationResult::valid()
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_verb_and_path() {
        let mut app = App::new();
        app.map_get("/api/echo", |Query(r): Query<EchoRequest>| async move { r.message });
        app.map_post("api/echo", |Json(r): Json<String>| async move { r });
        app.map_get("/api/todos/{id}", |Path(id): Path<u32>| async move { id.to_string() });

        assert_eq!(
            send(&app, "GET", "/api/echo?message=hello", "").await,
            (StatusCode::OK, "hello".into())
        );
        assert_eq!(
            send(&app, "POST", "/api/echo", r#""hello""#).await,
            (StatusCode::OK, "hello".into())
        );
        assert_eq!(
            send(&app, "GET", "/api/todos/9", "").await,
            (StatusCode::OK, "9".into())
        );
    }

    #[tokio::test]
    async fn test_not_found_and_method_not_allowed() {
        let mut app = App::new();
        app.map_get("/api/echo", || async { "hi" });
        app.map_delete("/api/echo", || async { "bye" });

        let (status, body) = send(&app, "GET", "/missing", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("No endpoint matches /missing"));

        let response = app.handle(request("PUT", "/api/echo", "")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, DELETE");
    }

    #[tokio::test]
    async fn test_bind_failure_skips_handler() {
        let mut app = App::new();
        app.map_get("/api/todos/{id}", |Path(id): Path<u32>| async move { id.to_string() });

        let (status, body) = send(&app, "GET", "/api/todos/abc", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("\"status\":400"));
    }

    #[tokio::test]
    async fn test_validate_marker_adds_filter() {
        let mut app = App::new();
        app.services_mut().add_scoped_validator::<EchoRequest, _, _>(|_| Ok(validator_fn(check_message)));
        app.map_post("/api/echo", |Validate(Json(r)): Validate<Json<EchoRequest>>| async move {
            r.message
        });

        let route = app.routes().next().unwrap();
        assert!(route.validators.contains::<EchoRequest>());

        let (status, body) = send(&app, "POST", "/api/echo", r#"{"message":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Message must not be empty"));

        let (status, body) = send(&app, "POST", "/api/echo", r#"{"message":"hi"}"#).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "hi"));
    }

    #[tokio::test]
    async fn test_validation_filter_without_validator_is_403() {
        let mut app = App::new();
        app.map_get("/api/echo", |Query(r): Query<EchoRequest>| async move { r.message })
            .add_validation_filter::<EchoRequest>()
            .add_validation_filter::<EchoRequest>();

        assert_eq!(app.routes().next().unwrap().validators.len(), 1);

        let (status, body) = send(&app, "GET", "/api/echo?message=hello", "").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("Could not find validator for EchoRequest"));
    }

    #[tokio::test]
    async fn test_custom_filter_short_circuits() {
        let mut app = App::new();
        app.map_get("/api/secret", || async { "secret" })
            .add_filter(filter_fn("deny", |_ctx, _next| {
                Box::pin(async { StatusCode::UNAUTHORIZED.into_response() })
            }));

        let (status, _) = send(&app, "GET", "/api/secret", "").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_scoped_service_per_request() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct RequestId(usize);
        static NEXT: AtomicUsize = AtomicUsize::new(0);

        let mut app = App::new();
        app.services_mut()
            .add_scoped(|_| Ok(Arc::new(RequestId(NEXT.fetch_add(1, Ordering::SeqCst)))));
        app.map_get("/id", |Inject(a): Inject<RequestId>, Inject(b): Inject<RequestId>| async move {
            assert!(Arc::ptr_eq(&a, &b));
            a.0.to_string()
        });

        let (_, first) = send(&app, "GET", "/id", "").await;
        let (_, second) = send(&app, "GET", "/id", "").await;
        assert_ne!(first, second);
    }
}
