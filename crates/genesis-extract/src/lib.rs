//! # Genesis Extract
//!
//! Request extractors and response conversion for Genesis endpoints.
//!
//! Every handler argument implements [`FromRequest`]. Extractors that carry
//! request data expose it through [`FromRequest::payload`], which is what a
//! validation filter inspects when it looks for a value of a given type.
//!
//! | Extractor | Source | Payload |
//! |-----------|--------|---------|
//! | [`Path<T>`] | route parameters | `T` |
//! | [`Query<T>`] | query string | `T` |
//! | [`Json<T>`] | request body | `T` |
//! | [`Validatable<T>`] | path, body or query text | `T` |
//! | [`Inject<T>`] | request service scope | none |
//! | [`RawBody`], [`BodyString`], [`RawQuery`] | raw request parts | themselves |
//!
//! ## Example
//!
//! ```rust
//! use genesis_extract::{ExtractionContextBuilder, FromRequest, Query};
//! use http::Uri;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .uri(Uri::from_static("/api/greet?name=sample"))
//!     .build();
//!
//! let query = Query::<Greeting>::from_request(&ctx).unwrap();
//! assert_eq!(query.name, "sample");
//! assert!(query.payload().unwrap().is::<Greeting>());
//! ```
//!
//! ## Errors
//!
//! Extractors fail with [`ExtractionError`], which renders as a problem
//! details response:
//!
//! ```rust
//! use genesis_extract::{ExtractionError, ExtractionSource};
//!
//! let err = ExtractionError::missing(ExtractionSource::Query, "message");
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! assert_eq!(err.to_problem_details().status, 400);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod context;
mod error;
mod extractor;
mod inject;
mod json;
mod path;
mod query;
pub mod response;
mod validatable;

pub use body::{BodyString, RawBody};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionSource};
pub use extractor::FromRequest;
pub use inject::Inject;
pub use json::{Json, DEFAULT_MAX_BODY_SIZE};
pub use path::{path_param, Path};
pub use query::{Query, RawQuery};
pub use response::{IntoResponse, JsonResponse, NoContent, Response, ResponseBody};
pub use validatable::Validatable;

pub use genesis_router::Params;
