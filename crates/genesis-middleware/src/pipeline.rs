//! Ordered filters attached to one endpoint.

use std::fmt;
use std::sync::Arc;

use genesis_core::BoxFuture;
use genesis_extract::Response;

use crate::{EndpointFilter, FilterContext, Next};

/// Filter attached to an endpoint.
pub type BoxedFilter = Arc<dyn EndpointFilter>;

/// The filters of one endpoint, outermost first.
///
/// Filters run in the order they were added; the first one added sees the
/// invocation first and the response last.
#[derive(Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<BoxedFilter>,
}

impl FilterPipeline {
    /// An empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter.
    pub fn push(&mut self, filter: BoxedFilter) {
        self.filters.push(filter);
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the pipeline has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.iter().map(|filter| filter.name())
    }

    /// Runs every filter and then `endpoint`.
    pub fn run<'a, F>(&'a self, ctx: &'a mut FilterContext, endpoint: F) -> BoxFuture<'a, Response>
    where
        F: FnOnce(&'a mut FilterContext) -> BoxFuture<'a, Response> + Send + 'a,
    {
        let next = self
            .filters
            .iter()
            .rev()
            .fold(Next::endpoint(endpoint), |next, filter| {
                Next::chain(filter.as_ref(), next)
            });
        next.run(ctx)
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
