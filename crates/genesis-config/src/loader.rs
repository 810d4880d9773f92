//! Layered configuration loading.
//!
//! Layers apply in call order, then environment overrides, then validation:
//!
//! 1. defaults (or a preset)
//! 2. a TOML or JSON file, or an inline string
//! 3. variables named `PREFIX__SECTION__KEY`
//!
//! ```no_run
//! use genesis_config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_dotenv()
//!     .with_optional_file("genesis.toml")?
//!     .with_env_prefix("GENESIS")
//!     .load()?;
//! # Ok::<(), genesis_config::ConfigError>(())
//! ```

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, GenesisConfig, LogFormat};

/// Builder that assembles a [`GenesisConfig`] from several sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: GenesisConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Starts from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from [`GenesisConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = GenesisConfig::development();
        self
    }

    /// Starts from [`GenesisConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = GenesisConfig::production();
        self
    }

    /// Replaces the configuration with the contents of a file.
    ///
    /// The format follows the extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, malformed, or has another
    /// extension.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file) but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Fails if the file exists and cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with inline content in `format`
    /// (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Fails on malformed content or an unknown format.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Reads overrides from variables starting with `prefix` at load time.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file into the process environment if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies overrides and validates.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable override or an invalid final value.
    pub fn load(mut self) -> Result<GenesisConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            apply_overrides(&mut self.config, &prefix, env::vars())?;
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration as layered so far, skipping overrides and
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> GenesisConfig {
        self.config
    }
}

fn parse(content: &str, format: &str) -> Result<GenesisConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
    }
}

fn apply_overrides(
    config: &mut GenesisConfig,
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<(), ConfigError> {
    let marker = format!("{prefix}__");
    for (key, value) in vars {
        let Some(path) = key.strip_prefix(&marker) else {
            continue;
        };
        let parts: Vec<&str> = path.split("__").collect();
        apply_override(config, &key, &parts, &value)?;
    }
    Ok(())
}

fn apply_override(
    config: &mut GenesisConfig,
    key: &str,
    parts: &[&str],
    value: &str,
) -> Result<(), ConfigError> {
    match parts {
        ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
        ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
            config.server.shutdown_timeout_secs = parse_number(key, value)?;
        }
        ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
            config.server.request_timeout_secs = parse_number(key, value)?;
        }
        ["SERVER", "MAX_BODY_BYTES"] => config.server.max_body_bytes = parse_number(key, value)?,
        ["LOGGING", "ENABLED"] => {
            config.logging.enabled = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }
        ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
        ["LOGGING", "FORMAT"] => {
            config.logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => return Err(ConfigError::env_parse_error(key, "expected 'json' or 'pretty'")),
            };
        }
        _ => {}
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
