//! Validation of a typed handler argument before the handler runs.

use std::marker::PhantomData;

use genesis_core::{short_type_name, BoxFuture, ProblemDetails, Validator};
use genesis_extract::response::problem_response;
use genesis_extract::{IntoResponse, Response};

use crate::{EndpointFilter, FilterContext, Next};

/// Runs the registered `Validator<T>` against the first argument whose
/// payload is a `T`.
///
/// | Situation | Result |
/// |-----------|--------|
/// | no argument of type `T` | 403 problem, handler skipped |
/// | no `Validator<T>` registered | 403 problem, handler skipped |
/// | validation failed | 400 problem with per-property errors |
/// | validation passed | the rest of the chain |
pub struct ValidationFilter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ValidationFilter<T> {
    /// Creates the filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ValidationFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ValidationFilter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ValidationFilter<{}>", short_type_name::<T>())
    }
}

fn unavailable(type_name: &str) -> Response {
    problem_response(&ProblemDetails::validation_unavailable(type_name))
}

impl<T: Send + Sync + 'static> EndpointFilter for ValidationFilter<T> {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn invoke<'a>(&'a self, ctx: &'a mut FilterContext, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let type_name = short_type_name::<T>();

            let Some(value) = ctx.find_payload::<T>() else {
                tracing::warn!(path = ctx.path(), r#type = type_name, "no argument to validate");
                return unavailable(type_name);
            };

            let validator = match ctx.scope().try_resolve::<dyn Validator<T>>() {
                Ok(Some(validator)) => validator,
                Ok(None) => {
                    tracing::warn!(path = ctx.path(), r#type = type_name, "no validator registered");
                    return unavailable(type_name);
                }
                Err(err) => {
                    tracing::error!(path = ctx.path(), r#type = type_name, error = %err, "validator construction failed");
                    return err.into_response();
                }
            };

            let result = validator.validate(value).await;
            if !result.is_valid() {
                tracing::warn!(
                    path = ctx.path(),
                    r#type = type_name,
                    errors = result.errors.len(),
                    "validation failed"
                );
                return problem_response(&result.to_problem_details());
            }

            next.run(ctx).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::FilterPipeline;
    use genesis_core::{validator_fn, Container, ValidationFailure, ValidationResult};
    use genesis_extract::{Json, Query};
    use genesis_validation::{property, RuleSet};
    use http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    struct EchoRequest {
        message: String,
    }

    fn context(container: Container, message: &str) -> FilterContext {
        let scope = Arc::new(Arc::new(container).create_scope());
        FilterContext::new(
            Method::POST,
            "/api/echo",
            vec![Box::new(Json(EchoRequest {
                message: message.to_string(),
            }))],
            scope,
        )
    }

    fn echo_rules() -> RuleSet<EchoRequest> {
        RuleSet::new().rule_for(
            property!(EchoRequest => message),
            |message: &String| !message.is_empty(),
            "Message must not be empty",
        )
    }

    async fn run(ctx: &mut FilterContext, calls: &AtomicUsize) -> (StatusCode, serde_json::Value) {
        let mut pipeline = FilterPipeline::new();
        pipeline.push(Arc::new(ValidationFilter::<EchoRequest>::new()));
        let response = pipeline
            .run(ctx, |_ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { "hello".into_response() })
            })
            .await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_invalid_payload_is_400() {
        let mut container = Container::new();
        container.add_scoped_validator::<EchoRequest, _, _>(|_| Ok(echo_rules()));
        let mut ctx = context(container, "");
        let calls = AtomicUsize::new(0);

        let (status, body) = run(&mut ctx, &calls).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(body["title"], "Validation error has occurred.");
        assert_eq!(body["status"], 400);
        assert_eq!(body["type"], "https://httpwg.org/specs/rfc9110.html#status.400");
        assert_eq!(body["detail"]["message"][0], "Message must not be empty");
    }

    #[tokio::test]
    async fn test_valid_payload_runs_handler_once() {
        let mut container = Container::new();
        container.add_scoped_validator::<EchoRequest, _, _>(|_| Ok(echo_rules()));
        let mut ctx = context(container, "hello");
        let calls = AtomicUsize::new(0);

        let (status, _) = run(&mut ctx, &calls).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_validator_is_403() {
        let mut ctx = context(Container::new(), "hello");
        let calls = AtomicUsize::new(0);

        let (status, body) = run(&mut ctx, &calls).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(body["title"], "Validation could not be performed.");
        assert_eq!(body["type"], "https://httpwg.org/specs/rfc9110.html#status.403");
        assert_eq!(body["detail"], "Could not find validator for EchoRequest");
    }

    #[tokio::test]
    async fn test_missing_argument_is_403() {
        let mut container = Container::new();
        container.add_scoped_validator::<EchoRequest, _, _>(|_| Ok(echo_rules()));
        let scope = Arc::new(Arc::new(container).create_scope());
        let mut ctx = FilterContext::new(
            Method::GET,
            "/api/echo",
            vec![Box::new(Query("hello".to_string()))],
            scope,
        );
        let calls = AtomicUsize::new(0);

        let (status, body) = run(&mut ctx, &calls).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "Could not find validator for EchoRequest");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_async_validator_fn() {
        let mut container = Container::new();
        container.add_scoped_validator::<EchoRequest, _, _>(|_| {
            Ok(validator_fn(|request: &EchoRequest| {
                if request.message.len() > 3 {
                    ValidationResult::from_failures([ValidationFailure::new("Message", "too long")])
                } else {
                    ValidationResult::valid()
                }
            }))
        });
        let mut ctx = context(container, "hello");
        let calls = AtomicUsize::new(0);

        let (status, body) = run(&mut ctx, &calls).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["Message"][0], "too long");
    }
}
