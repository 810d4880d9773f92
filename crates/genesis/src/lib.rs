//! # Genesis
//!
//! Extensions for building HTTP APIs on an async host:
//!
//! - **attribute-mapped endpoints**: annotate an impl block with
//!   [`endpoints`] and map it with `App::map_endpoints` or
//!   `App::map_static_endpoints`
//! - **status metadata**: RFC 9110 reference URIs for problem details
//! - **validation**: a rule DSL ([`validation::RuleSet`]) and a validation
//!   endpoint filter that runs a registered [`core::Validator`] against a
//!   typed handler argument
//!
//! ## Example
//!
//! ```rust,ignore
//! use genesis::prelude::*;
//!
//! struct TodoEndpoints {
//!     store: Arc<TodoStore>,
//! }
//!
//! #[endpoints(route = "api/todos", crate = "genesis::server")]
//! impl TodoEndpoints {
//!     #[get]
//!     fn list(&self) -> Json<Vec<Todo>> {
//!         Json(self.store.all())
//!     }
//!
//!     #[post("complete")]
//!     #[validate(CompleteTodo)]
//!     fn complete(&self, Json(req): Json<CompleteTodo>) -> Option<Json<Todo>> {
//!         self.store.complete(req.id).map(Json)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().with_env_prefix("GENESIS").load()?;
//!     init_logging(&config.to_log_config())?;
//!
//!     let mut app = App::new();
//!     app.services_mut()
//!         .add_singleton_instance(TodoStore::default())
//!         .add_scoped_endpoints(|scope| Ok(TodoEndpoints { store: scope.resolve()? }))
//!         .add_scoped_validator::<CompleteTodo, _, _>(|_| Ok(validator_fn(check_complete)));
//!     app.map_endpoints::<TodoEndpoints>()?;
//!
//!     Server::new(app, config.to_server_config()).run().await?;
//!     Ok(())
//! }
//! ```

pub use genesis_config as config;
pub use genesis_core as core;
pub use genesis_extract as extract;
pub use genesis_middleware as middleware;
pub use genesis_router as router;
pub use genesis_server as server;
pub use genesis_telemetry as telemetry;
pub use genesis_validation as validation;

pub use genesis_macros::endpoints;

/// Common imports.
///
/// ```rust,ignore
/// use genesis::prelude::*;
/// ```
pub mod prelude {
    pub use genesis_core::{
        validator_fn, Container, GenesisError, GenesisResult, Lifetime, ProblemDetails, Scope,
        StatusRegistry, ValidationFailure, ValidationResult, Validator,
    };

    pub use genesis_extract::{
        FromRequest, Inject, IntoResponse, Json, NoContent, Path, Query, RawQuery, Response,
        Validatable,
    };

    pub use genesis_middleware::{filter_fn, EndpointFilter, FilterContext, Next, Validate};

    pub use genesis_router::{join_route_template, HttpVerb};

    pub use genesis_server::{
        App, EndpointServices, EndpointTable, Endpoints, MapAttributes, Server, ServerConfig,
        ShutdownSignal,
    };

    pub use genesis_validation::{primitive_rule_for, property, rule_for, Property, RuleSet};

    pub use genesis_config::{ConfigLoader, GenesisConfig};
    pub use genesis_telemetry::{init_logging, LogConfig};

    pub use genesis_macros::endpoints;
}
