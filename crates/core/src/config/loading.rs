//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Legacy variable carrying the upstream endpoint base
const LEGACY_BASE_URL_VAR: &str = "POKEMON_BASE_API";

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `DEXTER_` and use double underscores
    /// for nested values. For example:
    /// - `DEXTER_UPSTREAM__BASE_URL=https://pokeapi.co/api/v2`
    /// - `DEXTER_CATALOG__BATCH_SIZE=50`
    pub fn from_file(path: &Path) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_file_with_env(path, &env)
    }

    /// Same as [`Config::from_file`] but reads overrides from the given map
    /// instead of the process environment (useful for testing)
    pub fn from_file_with_env(path: &Path, env: &HashMap<String, String>) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Upstream defaults
        let builder = set_config_default(
            builder,
            "upstream.entity_resource",
            default_entity_resource(),
        )?;
        let builder = set_config_default(
            builder,
            "upstream.timeout_secs",
            default_upstream_timeout_secs() as i64,
        )?;
        let builder = set_config_default(builder, "upstream.user_agent", default_user_agent())?;

        // Catalog defaults
        let builder =
            set_config_default(builder, "catalog.batch_size", default_batch_size() as i64)?;
        let builder = set_config_default(builder, "catalog.page_size", default_page_size() as i64)?;
        let builder = set_config_default(
            builder,
            "catalog.max_concurrent_joins",
            default_max_concurrent_joins() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "catalog.max_chain_depth",
            default_max_chain_depth() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "catalog.expected_total",
            default_expected_total() as i64,
        )?;

        // Server defaults
        let builder = set_config_default(builder, "server.host", default_server_host())?;
        let mut builder =
            set_config_default(builder, "server.port", default_server_port() as i64)?;

        // Add the config file if it exists
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with DEXTER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("DEXTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        // Support the legacy environment variable for the endpoint base
        if let Some(base_url) = env.get(LEGACY_BASE_URL_VAR) {
            builder = builder
                .set_override("upstream.base_url", base_url.as_str())
                .map_err(|e| Error::config(format!("Failed to set {LEGACY_BASE_URL_VAR}: {e}")))?;
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.dexter/config.toml or custom --config path)
    /// 3. Environment variables (DEXTER_*, then POKEMON_BASE_API)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
