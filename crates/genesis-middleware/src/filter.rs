//! The endpoint filter trait and its continuation.
//!
//! A filter wraps a single endpoint. It may inspect the bound arguments,
//! short-circuit with its own response, or call [`Next::run`] to continue
//! with the remaining filters and finally the handler.
//!
//! ```
//! use genesis_middleware::filter_fn;
//! use genesis_extract::IntoResponse;
//! use http::StatusCode;
//!
//! let require_arguments = filter_fn("require-arguments", |ctx, next| {
//!     Box::pin(async move {
//!         if ctx.argument_count() == 0 {
//!             return StatusCode::BAD_REQUEST.into_response();
//!         }
//!         next.run(ctx).await
//!     })
//! });
//! # let _ = require_arguments;
//! ```

use genesis_core::BoxFuture;
use genesis_extract::Response;

use crate::FilterContext;

/// Runs around an endpoint's handler.
///
/// A filter either calls `next.run(ctx)` exactly once, or returns its own
/// response without calling it. In the latter case the handler is not
/// executed.
pub trait EndpointFilter: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the invocation.
    fn invoke<'a>(&'a self, ctx: &'a mut FilterContext, next: Next<'a>) -> BoxFuture<'a, Response>;
}

/// The rest of the filter chain.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

type Endpoint<'a> = Box<dyn FnOnce(&'a mut FilterContext) -> BoxFuture<'a, Response> + Send + 'a>;

enum NextInner<'a> {
    Chain {
        filter: &'a dyn EndpointFilter,
        next: Box<Next<'a>>,
    },
    Endpoint(Endpoint<'a>),
}

impl<'a> Next<'a> {
    pub(crate) fn chain(filter: &'a dyn EndpointFilter, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                filter,
                next: Box::new(next),
            },
        }
    }

    /// A continuation that invokes the endpoint itself.
    pub fn endpoint<F>(endpoint: F) -> Self
    where
        F: FnOnce(&'a mut FilterContext) -> BoxFuture<'a, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Endpoint(Box::new(endpoint)),
        }
    }

    /// Continues with the next filter, or the endpoint.
    pub fn run(self, ctx: &'a mut FilterContext) -> BoxFuture<'a, Response> {
        match self.inner {
            NextInner::Chain { filter, next } => filter.invoke(ctx, *next),
            NextInner::Endpoint(endpoint) => endpoint(ctx),
        }
    }
}

/// A filter backed by a closure.
pub struct FnFilter<F> {
    name: &'static str,
    func: F,
}

/// Creates a filter from a closure returning a boxed future.
pub fn filter_fn<F>(name: &'static str, func: F) -> FnFilter<F>
where
    F: for<'a> Fn(&'a mut FilterContext, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    FnFilter { name, func }
}

impl<F> EndpointFilter for FnFilter<F>
where
    F: for<'a> Fn(&'a mut FilterContext, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn invoke<'a>(&'a self, ctx: &'a mut FilterContext, next: Next<'a>) -> BoxFuture<'a, Response> {
        (self.func)(ctx, next)
    }
}
