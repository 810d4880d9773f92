//! Attribute-mapped endpoints end to end, for every way of registering them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use genesis::prelude::*;
use genesis_test::TestClient;
use http::{Method, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EchoQuery {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
}

#[derive(Debug, Deserialize)]
struct EchoRequest {
    message: Option<String>,
}

struct GreetingService;

impl GreetingService {
    fn greet(&self, name: &str) -> String {
        format!("Hello {name}!")
    }
}

#[derive(Default)]
struct CallCounter(AtomicUsize);

impl CallCounter {
    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

struct SampleEndpoints {
    greeting: Arc<GreetingService>,
}

#[endpoints(route = "api", register, crate = "genesis::server")]
impl SampleEndpoints {
    #[get("echo")]
    #[delete("echo")]
    fn echo_non_content(Query(query): Query<EchoQuery>) -> String {
        query.message
    }

    #[post("echo")]
    #[put("echo")]
    #[patch("echo")]
    fn echo_content(Json(message): Json<String>) -> String {
        message
    }

    #[post("validated")]
    #[validate(EchoRequest)]
    async fn validated(Json(request): Json<EchoRequest>, calls: Inject<CallCounter>) -> String {
        calls.hit();
        request.message.unwrap_or_default()
    }
}

impl Endpoints for SampleEndpoints {
    fn register_endpoints(self: Arc<Self>, app: &mut App) {
        app.map_get("/api/greet", move |Query(person): Query<Person>| {
            let greeting = Arc::clone(&self.greeting);
            async move { greeting.greet(&person.name) }
        });
    }
}

struct StaticEndpoints;

#[endpoints(route = "api/static", crate = "genesis::server")]
impl StaticEndpoints {
    #[http(methods = ["GET", "DELETE"], path = "echo")]
    fn echo_non_content(Query(query): Query<EchoQuery>) -> String {
        query.message
    }

    #[http(methods = ["POST", "PUT", "PATCH"], path = "echo")]
    fn echo_content(Json(message): Json<String>) -> String {
        message
    }
}

#[derive(Debug, Clone, Copy)]
enum Registration {
    Singleton,
    Scoped,
    Transient,
    Factory,
}

const REGISTRATIONS: [Registration; 4] = [
    Registration::Singleton,
    Registration::Scoped,
    Registration::Transient,
    Registration::Factory,
];

fn sample_endpoints(scope: &Scope) -> GenesisResult<SampleEndpoints> {
    Ok(SampleEndpoints {
        greeting: scope.resolve::<GreetingService>()?,
    })
}

fn echo_rules() -> RuleSet<EchoRequest> {
    rule_for(
        property!(EchoRequest => message),
        |message: &Option<String>| message.is_some(),
        "Message is required",
    )
}

fn sample_app(registration: Registration, with_validator: bool) -> App {
    let mut app = App::new();
    let services = app.services_mut();
    services
        .add_singleton_instance(GreetingService)
        .add_singleton_instance(CallCounter::default());
    match registration {
        Registration::Singleton => services.add_singleton_endpoints(sample_endpoints),
        Registration::Scoped => services.add_scoped_endpoints(sample_endpoints),
        Registration::Transient => services.add_transient_endpoints(sample_endpoints),
        Registration::Factory => services.register_endpoints(|_: &Scope| {
            Ok(SampleEndpoints {
                greeting: Arc::new(GreetingService),
            })
        }),
    };
    if with_validator {
        services.add_scoped_validator::<EchoRequest, _, _>(|_| Ok(echo_rules()));
    }

    app.map_endpoints::<SampleEndpoints>()
        .and_then(|app| app.map_static_endpoints::<StaticEndpoints>())
        .unwrap();
    app
}

async fn assert_echoes(client: &TestClient, root: &str) {
    for verb in [Method::GET, Method::DELETE] {
        client
            .request(verb.clone(), format!("{root}/echo?message=hello"))
            .send()
            .await
            .assert_status(StatusCode::OK)
            .assert_text("hello");
    }
    for verb in [Method::POST, Method::PUT, Method::PATCH] {
        client
            .request(verb.clone(), format!("{root}/echo"))
            .json("hello")
            .send()
            .await
            .assert_status(StatusCode::OK)
            .assert_text("hello");
    }
}

#[tokio::test]
async fn test_self_registered_greeting() {
    for registration in REGISTRATIONS {
        let client = TestClient::new(sample_app(registration, false));
        let response = client.get("/api/greet?name=sample").send().await;
        assert_eq!(response.text().unwrap(), "Hello sample!", "{registration:?}");
    }
}

#[tokio::test]
async fn test_attribute_routes_echo() {
    for registration in REGISTRATIONS {
        let client = TestClient::new(sample_app(registration, false));
        assert_echoes(&client, "/api").await;
    }
}

#[tokio::test]
async fn test_static_routes_echo() {
    let mut app = App::new();
    app.map_static_endpoints::<StaticEndpoints>().unwrap();
    assert_echoes(&TestClient::new(app), "/api/static").await;
}

#[test]
fn test_endpoints_resolve_per_scope() {
    let app = sample_app(Registration::Scoped, false);
    let scope_a = app.services().create_scope();
    let a1 = scope_a.resolve::<SampleEndpoints>().unwrap();
    let a2 = scope_a.resolve::<SampleEndpoints>().unwrap();
    assert!(Arc::ptr_eq(&a1, &a2));

    let scope_b = app.services().create_scope();
    let b = scope_b.resolve::<SampleEndpoints>().unwrap();
    assert!(!Arc::ptr_eq(&a1, &b));
}

#[tokio::test]
async fn test_validation_rejects_invalid_payload() {
    let client = TestClient::new(sample_app(Registration::Scoped, true));
    let response = client.post("/api/validated").json(&serde_json::json!({})).send().await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_content_type("application/problem+json")
        .assert_body_contains("message")
        .assert_body_contains("Message is required");

    let calls = client.app().services().create_scope().resolve::<CallCounter>().unwrap();
    assert_eq!(calls.count(), 0);
}

#[tokio::test]
async fn test_validation_passes_valid_payload_once() {
    let client = TestClient::new(sample_app(Registration::Singleton, true));
    client
        .post("/api/validated")
        .json(&serde_json::json!({ "message": "hello" }))
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_text("hello");

    let calls = client.app().services().create_scope().resolve::<CallCounter>().unwrap();
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn test_validation_without_validator_is_forbidden() {
    let client = TestClient::new(sample_app(Registration::Transient, false));
    client
        .post("/api/validated")
        .json(&serde_json::json!({ "message": "hello" }))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_body_contains("EchoRequest");
}

#[test]
fn test_missing_service_fails_mapping() {
    let mut app = App::new();
    let err = app.map_endpoints::<SampleEndpoints>().unwrap_err();
    assert!(matches!(err, GenesisError::ServiceNotFound { .. }));
    assert!(err.to_string().contains("SampleEndpoints"));
}

#[test]
fn test_stateful_type_cannot_map_statically() {
    let mut app = App::new();
    let err = app.map_static_endpoints::<SampleEndpoints>().unwrap_err();
    assert_eq!(err.to_string(), "SampleEndpoints must be a static class! (Parameter 'type')");
}
