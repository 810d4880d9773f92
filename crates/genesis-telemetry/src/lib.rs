//! # Genesis Telemetry
//!
//! Installs a `tracing` subscriber for Genesis applications: an
//! [`EnvFilter`](tracing_subscriber::EnvFilter) built from the configured
//! level, and a JSON or human-readable `fmt` layer.
//!
//! ```rust,no_run
//! use genesis_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! tracing::info!(routes = 3, "application mapped");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
