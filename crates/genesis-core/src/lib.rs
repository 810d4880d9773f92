//! # Genesis Core
//!
//! Foundational types shared by every Genesis crate:
//!
//! - [`GenesisError`] - Startup and lookup errors
//! - [`StatusRegistry`] - RFC 9110 reference URIs by status code
//! - [`ProblemDetails`] - Structured error bodies
//! - [`di`] - Dependency injection with transient, scoped and singleton lifetimes
//! - [`validator`] - The asynchronous validator contract

#![doc(html_root_url = "https://docs.rs/genesis-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod di;
mod error;
mod naming;
pub mod problem;
pub mod status;
pub mod validator;

pub use di::{Container, Lifetime, Scope};
pub use error::{GenesisError, GenesisResult};
pub use naming::short_type_name;
pub use problem::{ProblemDetail, ProblemDetails, PROBLEM_JSON_CONTENT_TYPE};
pub use status::{reference_uri, StatusEntry, StatusRegistry, KNOWN_STATUS_CODES};
pub use validator::{
    validator_fn, BoxFuture, FnValidator, ValidationFailure, ValidationResult, Validator,
};
