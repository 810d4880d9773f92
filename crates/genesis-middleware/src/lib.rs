//! # Genesis Middleware
//!
//! Endpoint filters for Genesis.
//!
//! Each endpoint owns a [`FilterPipeline`]. When a request reaches the
//! endpoint its arguments are bound first, then the filters run in the
//! order they were added, and finally the handler receives the arguments.
//!
//! ```text
//! bind arguments → filter 1 → filter 2 → … → handler
//!                         ↑ any filter may answer early
//! ```
//!
//! [`ValidationFilter<T>`] is the filter this crate ships: it locates the
//! argument whose payload is a `T`, runs the registered `Validator<T>`,
//! and answers with a problem details body when the value is invalid or
//! cannot be validated.
//!
//! Handlers ask for a validation filter by wrapping a parameter in
//! [`Validate`], which reports a [`ValidationRequirement`] for the
//! extractor's payload type.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod argument;
mod context;
mod filter;
mod pipeline;
mod validation;

pub use argument::{
    Argument, BoxedArgument, ErasedArgument, TypedPayload, Validate, ValidationRequirement,
    ValidationRequirements,
};
pub use context::FilterContext;
pub use filter::{filter_fn, EndpointFilter, FnFilter, Next};
pub use pipeline::{BoxedFilter, FilterPipeline};
pub use validation::ValidationFilter;
