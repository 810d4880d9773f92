//! Configuration for Genesis applications.
//!
//! A [`GenesisConfig`] is assembled by [`ConfigLoader`] from defaults, an
//! optional TOML or JSON file and `GENESIS__SECTION__KEY` style environment
//! overrides, then converted into the settings the server and the logging
//! setup take:
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! request_timeout_secs = 30
//!
//! [logging]
//! level = "genesis_server=debug,info"
//! format = "pretty"
//! ```
//!
//! ```no_run
//! use genesis_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("genesis.toml")?
//!     .with_env_prefix("GENESIS")
//!     .load()?;
//!
//! genesis_telemetry::init_logging(&config.to_log_config())?;
//! let server_config = config.to_server_config();
//! # let _ = server_config;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod loader;

pub use config::{GenesisConfig, LogFormat, LoggingSection, ServerSection};
pub use error::ConfigError;
pub use loader::ConfigLoader;
