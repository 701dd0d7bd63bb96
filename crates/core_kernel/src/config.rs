//! Layered configuration loading
//!
//! Engine settings are resolved in three layers:
//! 1. Code defaults (`Default` impl of the section type)
//! 2. An optional configuration file (`config/liquidation.toml`, `.yaml`, ...)
//! 3. Environment variable overrides with the `LIQ__` prefix, e.g.
//!    `LIQ__RULES__TRAVEL__MAX_DISTANCE_KM=120`
//!
//! A `.env` file is honoured when present.

use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// Environment variable prefix for all engine settings
pub const ENV_PREFIX: &str = "LIQ";

/// Where configuration values are read from
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Base name of the optional configuration file, without extension
    pub file: Option<String>,
    /// Whether environment variables override file values
    pub use_environment: bool,
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self {
            file: Some("config/liquidation".to_string()),
            use_environment: true,
        }
    }
}

impl ConfigSource {
    /// A source that only yields code defaults
    pub fn defaults_only() -> Self {
        Self {
            file: None,
            use_environment: false,
        }
    }
}

/// Loads one named section of the engine configuration
///
/// Missing sections and missing keys fall back to `T::default()`, so section
/// types should carry `#[serde(default)]`.
///
/// # Errors
///
/// Returns `CoreError::Configuration` if a source is malformed or a value
/// cannot be deserialized into the section type.
pub fn load_section<T>(section: &str, source: &ConfigSource) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    if source.use_environment {
        dotenvy::dotenv().ok();
    }

    let mut builder = Config::builder();
    if let Some(ref file) = source.file {
        builder = builder.add_source(File::with_name(file).required(false));
    }
    if source.use_environment {
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );
    }

    let config = builder.build().map_err(configuration_error)?;

    match config.get::<T>(section) {
        Ok(value) => {
            tracing::debug!(section, "Loaded configuration section");
            Ok(value)
        }
        Err(ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(configuration_error(e)),
    }
}

fn configuration_error(error: ConfigError) -> CoreError {
    CoreError::Configuration(error.to_string())
}
