//! Configuration system for arpconf.
//!
//! A TOML file lists named sources and the pool defaults they share.
//!
//! ```toml
//! [defaults.pool]
//! size = 16
//!
//! [sources.sales]
//! type = "IBMDB2V11ARP"
//! host = "db.example.com"
//! port = "50000"
//! database = "SALES"
//! username = "reporting"
//! password = "..."
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};
use crate::params::ConnectionParameters;
use crate::source::SourceConfig;
use crate::variant;

/// Root configuration structure. Read-only; sources are persisted through
/// [`crate::wire`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Defaults applied to every source unless overridden.
    pub defaults: GlobalDefaults,

    /// Configured sources keyed by name.
    pub sources: HashMap<String, SourceEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalDefaults {
    pub pool: PoolConfig,
}

/// Connection pool sizing shared by all sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum open connections per pool (default: 16).
    pub size: usize,
    /// Seconds between idle eviction sweeps; 0 disables the sweeper (default: 30).
    pub eviction_interval_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 16,
            eviction_interval_secs: 30,
        }
    }
}

/// One `[sources.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Source type id, e.g. `IBMDB2V11ARP`.
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(flatten)]
    pub params: ConnectionParameters,
    #[serde(default)]
    pub pool: Option<PoolConfig>,
    /// Extra driver connection properties.
    #[serde(default)]
    pub properties: Option<HashMap<String, String>>,
}

impl ConnectorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConnectorError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ConnectorError::Config(format!("failed to parse config: {e}")))
    }

    /// Load from default locations (env var, cwd, user config dir, or defaults).
    ///
    /// Search order:
    /// 1. `ARPCONF_CONFIG` environment variable
    /// 2. `./arpconf.toml` (current directory)
    /// 3. `~/.config/arpconf/config.toml` (user config dir)
    /// 4. Built-in defaults
    pub fn load_default() -> Self {
        if let Ok(path) = std::env::var("ARPCONF_CONFIG") {
            match Self::from_file(&path) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "loaded config from ARPCONF_CONFIG");
                    return cfg;
                }
                Err(e) => tracing::warn!(path = %path, error = %e, "ignoring ARPCONF_CONFIG"),
            }
        }

        if let Ok(cfg) = Self::from_file("arpconf.toml") {
            tracing::info!("loaded config from ./arpconf.toml");
            return cfg;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("arpconf").join("config.toml");
            if let Ok(cfg) = Self::from_file(&user_config) {
                tracing::info!(path = %user_config.display(), "loaded config from user config dir");
                return cfg;
            }
        }

        tracing::debug!("no config file found, using defaults");
        Self::default()
    }

    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a named source against its variant and the pool defaults.
    pub fn source(&self, name: &str) -> Result<SourceConfig> {
        let entry = self
            .sources
            .get(name)
            .ok_or_else(|| ConnectorError::Config(format!("unknown source {name}")))?;
        let variant = variant::lookup(&entry.source_type).ok_or_else(|| {
            ConnectorError::Config(format!(
                "source {name} has unknown type {}",
                entry.source_type
            ))
        })?;
        let pool = entry
            .pool
            .clone()
            .unwrap_or_else(|| self.defaults.pool.clone());
        let mut source = SourceConfig::new(variant, entry.params.clone()).with_pool_config(pool);
        if let Some(properties) = &entry.properties {
            source = source.with_properties(properties.clone());
        }
        Ok(source)
    }
}
