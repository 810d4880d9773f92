//! Handler functions and their type erasure.
//!
//! Any async function whose parameters are all [`Argument`]s and whose
//! output implements [`IntoResponse`] is a [`Handler`]. Binding and calling
//! are split so that endpoint filters run between them and see the bound
//! arguments.

use std::future::{ready, Future};
use std::sync::Arc;

use genesis_core::{BoxFuture, ProblemDetails};
use genesis_extract::response::problem_response;
use genesis_extract::{ExtractionContext, ExtractionError, IntoResponse, Response};
use genesis_middleware::{Argument, BoxedArgument, ValidationRequirement};
use http::StatusCode;

/// An endpoint function.
///
/// `Args` is the tuple of parameter types; it only disambiguates the
/// implementations and never has to be named.
pub trait Handler<Args>: Clone + Send + Sync + 'static {
    /// Validation requirements declared by the parameters, in order.
    fn requirements() -> Vec<ValidationRequirement>;

    /// Binds every parameter from the request.
    ///
    /// # Errors
    ///
    /// Returns the first parameter's extraction error.
    fn bind(ctx: &ExtractionContext) -> Result<Vec<BoxedArgument>, ExtractionError>;

    /// Calls the function with arguments produced by [`Handler::bind`].
    fn call(&self, arguments: Vec<BoxedArgument>) -> BoxFuture<'static, Response>;
}

fn arguments_lost() -> BoxFuture<'static, Response> {
    tracing::error!("handler arguments did not survive the filter chain");
    let problem = ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        .with_detail("Endpoint arguments were lost before the handler ran");
    Box::pin(ready(problem_response(&problem)))
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, R, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoResponse,
            $($arg: Argument,)*
        {
            fn requirements() -> Vec<ValidationRequirement> {
                let mut requirements = Vec::new();
                $(
                    if let Some(requirement) = $arg::validation_requirement() {
                        requirements.push(requirement);
                    }
                )*
                requirements
            }

            fn bind(ctx: &ExtractionContext) -> Result<Vec<BoxedArgument>, ExtractionError> {
                Ok(vec![$($arg::extract(ctx)?),*])
            }

            fn call(&self, arguments: Vec<BoxedArgument>) -> BoxFuture<'static, Response> {
                let mut arguments = arguments.into_iter();
                $(
                    let Some($arg) = arguments.next().and_then($arg::restore) else {
                        return arguments_lost();
                    };
                )*
                let fut = (self)($($arg),*);
                Box::pin(async move { fut.await.into_response() })
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);

type BindFn = fn(&ExtractionContext) -> Result<Vec<BoxedArgument>, ExtractionError>;
type CallFn = Arc<dyn Fn(Vec<BoxedArgument>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A [`Handler`] with its parameter types erased.
#[derive(Clone)]
pub struct BoxedHandler {
    bind: BindFn,
    call: CallFn,
    requirements: fn() -> Vec<ValidationRequirement>,
}

impl BoxedHandler {
    /// Erases a handler.
    pub fn new<H, Args>(handler: H) -> Self
    where
        H: Handler<Args>,
        Args: 'static,
    {
        Self {
            bind: H::bind,
            call: Arc::new(move |arguments| handler.call(arguments)),
            requirements: H::requirements,
        }
    }

    /// See [`Handler::bind`].
    ///
    /// # Errors
    ///
    /// Returns the first parameter's extraction error.
    pub fn bind(&self, ctx: &ExtractionContext) -> Result<Vec<BoxedArgument>, ExtractionError> {
        (self.bind)(ctx)
    }

    /// See [`Handler::call`].
    pub fn call(&self, arguments: Vec<BoxedArgument>) -> BoxFuture<'static, Response> {
        (self.call)(arguments)
    }

    /// See [`Handler::requirements`].
    #[must_use]
    pub fn requirements(&self) -> Vec<ValidationRequirement> {
        (self.requirements)()
    }
}

impl std::fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedHandler")
            .field("requirements", &self.requirements())
            .finish_non_exhaustive()
    }
}
