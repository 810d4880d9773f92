//! # Genesis Server
//!
//! Hosting for Genesis applications.
//!
//! - [`App`] holds the service container and the routes. Routes are mapped
//!   one at a time with [`App::map_get`] and friends, or a whole endpoint
//!   type at once with [`App::map_endpoints`] / [`App::map_static_endpoints`].
//! - [`Handler`] turns async functions whose parameters are extractors into
//!   endpoints.
//! - [`Server`] runs an [`App`] on hyper with graceful shutdown.
//!
//! ## Request flow
//!
//! ```text
//! route lookup → new scope → bind arguments → filters → handler → response
//!      │                           │             │
//!      404 / 405                   400           400 / 403 from validation
//! ```
//!
//! ## Example
//!
//! ```rust
//! use genesis_extract::Query;
//! use genesis_server::App;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! let mut app = App::new();
//! app.map_get("/api/greet", |Query(g): Query<Greeting>| async move {
//!     format!("Hello {}!", g.name)
//! });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod endpoints;
mod error;
mod handler;
mod server;
mod shutdown;

pub use app::{App, RouteDescriptor, RouteHandle};
pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use endpoints::{EndpointServices, EndpointTable, Endpoints, MapAttributes, MethodBuilder};
pub use error::ServerError;
pub use handler::{BoxedHandler, Handler};
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
