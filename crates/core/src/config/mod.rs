//! Configuration module for the dexter catalog engine
//!
//! This module provides configuration structures and loading mechanisms.
//! Configuration can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.dexter/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".dexter").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream REST API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Catalog loading and view configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// REST server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the upstream REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Endpoint base, e.g. `https://pokeapi.co/api/v2`. Required.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path segment of the entity resource family
    #[serde(default = "default_entity_resource")]
    pub entity_resource: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl UpstreamConfig {
    /// The configured base URL without a trailing slash
    pub fn base_url(&self) -> Result<&str> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.trim_end_matches('/')),
            _ => Err(Error::config(
                "upstream.base_url is required. Set it in the config file, \
                 DEXTER_UPSTREAM__BASE_URL or POKEMON_BASE_API",
            )),
        }
    }
}

/// Configuration for incremental catalog loading and the catalog view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Index entries requested per batch; a shorter batch marks the catalog complete
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Items per page in the catalog view
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum per-entity joins in flight within one batch
    #[serde(default = "default_max_concurrent_joins")]
    pub max_concurrent_joins: usize,

    /// Depth guard for evolution chain traversal
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    /// Approximate catalog size, used for progress reporting only
    #[serde(default = "default_expected_total")]
    pub expected_total: usize,
}

/// Configuration for REST API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = disabled, ["*"] = all origins)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            entity_resource: default_entity_resource(),
            timeout_secs: default_upstream_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            page_size: default_page_size(),
            max_concurrent_joins: default_max_concurrent_joins(),
            max_chain_depth: default_max_chain_depth(),
            expected_total: default_expected_total(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Config {
    /// Validates the configuration
    ///
    /// A missing upstream base URL is fatal: nothing can be loaded without it.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.upstream.base_url()?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::config(format!(
                "upstream.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        if self.upstream.entity_resource.trim().is_empty() {
            return Err(Error::config(
                "upstream.entity_resource must not be empty".to_string(),
            ));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(Error::config(
                "upstream.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let positive = [
            ("catalog.batch_size", self.catalog.batch_size),
            ("catalog.page_size", self.catalog.page_size),
            (
                "catalog.max_concurrent_joins",
                self.catalog.max_concurrent_joins,
            ),
            ("catalog.max_chain_depth", self.catalog.max_chain_depth),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(Error::config(format!("{key} must be greater than 0")));
            }
        }

        Ok(())
    }

    /// Builds a config pointing at the given base URL with all other values defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            upstream: UpstreamConfig {
                base_url: Some(base_url.into()),
                ..UpstreamConfig::default()
            },
            ..Self::default()
        }
    }
}
