//! Attribute macros for Genesis endpoints.
//!
//! `#[endpoints]` goes on an inherent `impl` block and generates the type's
//! `MapAttributes` implementation from annotated methods, so the type can
//! be mapped with `App::map_endpoints` or `App::map_static_endpoints`.
//!
//! # Method attributes
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `#[get("t")]`, `#[post("t")]`, `#[put("t")]`, `#[patch("t")]`, `#[delete("t")]` | one verb on template `t` |
//! | `#[http(methods = ["GET", "DELETE"], path = "t")]` | several verbs on one template |
//! | `#[validate(Type)]` | validate the first argument of type `Type` |
//!
//! A method may carry several routing attributes. Methods without one are
//! left untouched. Methods taking `&self` are called on the resolved
//! instance; methods without a receiver are static.
//!
//! # Example
//!
//! ```rust,ignore
//! use genesis::prelude::*;
//!
//! struct SampleEndpoints {
//!     greeting: String,
//! }
//!
//! #[endpoints(route = "api")]
//! impl SampleEndpoints {
//!     #[patch("echo")]
//!     #[post("echo")]
//!     #[put("echo")]
//!     fn echo_content(Json(message): Json<String>) -> String {
//!         message
//!     }
//!
//!     #[http(methods = ["GET", "DELETE"], path = "echo")]
//!     fn echo_non_content(Query(q): Query<EchoQuery>) -> String {
//!         q.message
//!     }
//!
//!     #[get("greet")]
//!     #[validate(Person)]
//!     async fn greet(&self, Query(person): Query<Person>) -> String {
//!         format!("{} {}!", self.greeting, person.name)
//!     }
//! }
//! ```
//!
//! # Arguments
//!
//! - `route = "api"`: route root joined onto every method template
//! - `register`: the type also implements `Endpoints` and maps extra
//!   routes itself
//! - `crate = "path"`: where the server crate lives when it is not a direct
//!   dependency named `genesis_server`

mod endpoints;
mod parse;

use proc_macro::TokenStream;

/// Generates `MapAttributes` for an inherent impl block.
///
/// See the [crate documentation](crate) for the accepted attributes.
#[proc_macro_attribute]
pub fn endpoints(attr: TokenStream, item: TokenStream) -> TokenStream {
    endpoints::expand_endpoints(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
