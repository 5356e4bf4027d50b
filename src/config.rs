//! Operator config file
//!
//! One TOML file holds the endpoint settings and the declared
//! `[[solr_configs]]` / `[[managed_schemas]]` blocks.

use anyhow::{Context, Result};
use reconcile::{ConfigurationStore, ManagedSchemaBlock, RetryConfig, SolrConfigBlock};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://127.0.0.1:8983/solr";

/// Where and how to reach Solr
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    /// Base URL including the `/solr` context path
    pub url: String,
    pub timeout_secs: u64,
    /// Attempts per request, including the first
    pub retries: u32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 30,
            retries: 3,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retries.max(1),
            ..RetryConfig::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolrSyncConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub solr_configs: Vec<SolrConfigBlock>,
    #[serde(default)]
    pub managed_schemas: Vec<ManagedSchemaBlock>,
}

impl SolrSyncConfig {
    /// ~/.config/solrsync/config.toml
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("solrsync").join("config.toml"))
    }

    /// The explicit path (tilde expanded) or the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => {
                let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => Self::default_path(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate every declared block and index them by core
    pub fn into_store(self) -> Result<(EndpointConfig, ConfigurationStore)> {
        let store = ConfigurationStore::new(self.managed_schemas, self.solr_configs);
        store.validate().context("Invalid declared configuration")?;
        Ok((self.endpoint, store))
    }
}

/// Load and validate the config named on the command line
pub fn load(ctx: &crate::Context) -> Result<(EndpointConfig, ConfigurationStore)> {
    let path = SolrSyncConfig::resolve_path(ctx.config.as_deref())?;
    log::debug!("Loading config from {}", path.display());
    SolrSyncConfig::load(&path)?.into_store()
}

/// Endpoint only; a missing config file means the default endpoint
pub fn load_endpoint(ctx: &crate::Context) -> Result<EndpointConfig> {
    let path = SolrSyncConfig::resolve_path(ctx.config.as_deref())?;
    if !path.exists() {
        return Ok(EndpointConfig::default());
    }
    Ok(SolrSyncConfig::load(&path)?.endpoint)
}
