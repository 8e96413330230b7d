//! A configured source: one variant plus its connection parameters.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PoolConfig;
use crate::data_source::{DataSourceFactory, DataSourceSpec};
use crate::dialect::{Dialect, DialectRegistry};
use crate::driver::DriverRegistry;
use crate::error::Result;
use crate::params::ConnectionParameters;
use crate::plugin::{CredentialsService, OptionManager, PluginConfig, PluginConfigBuilder};
use crate::variant::{Variant, DB2_V11};

#[derive(Debug, Clone)]
pub struct SourceConfig {
    variant: &'static Variant,
    params: ConnectionParameters,
    pool: PoolConfig,
    properties: Option<HashMap<String, String>>,
    dialects: Arc<DialectRegistry>,
    drivers: Arc<DriverRegistry>,
}

impl SourceConfig {
    /// Uses the process-wide dialect and driver registries.
    pub fn new(variant: &'static Variant, params: ConnectionParameters) -> Self {
        Self {
            variant,
            params,
            pool: PoolConfig::default(),
            properties: None,
            dialects: DialectRegistry::global(),
            drivers: DriverRegistry::global(),
        }
    }

    pub fn db2_v11(params: ConnectionParameters) -> Self {
        Self::new(&DB2_V11, params)
    }

    pub fn with_pool_config(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_dialect_registry(mut self, dialects: Arc<DialectRegistry>) -> Self {
        self.dialects = dialects;
        self
    }

    pub fn with_driver_registry(mut self, drivers: Arc<DriverRegistry>) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn pool_config(&self) -> &PoolConfig {
        &self.pool
    }

    pub fn properties(&self) -> Option<&HashMap<String, String>> {
        self.properties.as_ref()
    }

    pub fn to_connection_address(&self) -> Result<String> {
        self.params.to_connection_address(self.variant.scheme)
    }

    pub fn dialect(&self) -> Result<Arc<dyn Dialect>> {
        Ok(self.variant.dialect_in(&self.dialects)?)
    }

    /// Validate and copy out everything a data source factory needs.
    pub fn data_source_spec(&self) -> Result<DataSourceSpec> {
        let address = self.to_connection_address()?;
        Ok(DataSourceSpec {
            driver: self.variant.driver.to_string(),
            address,
            username: self.params.username.clone().unwrap_or_default(),
            password: self.params.password.clone().unwrap_or_else(|| "".into()),
            properties: self.properties.clone(),
            commit_mode: self.variant.commit_mode,
            max_idle_conns: self.params.max_idle_conns,
            idle_time_sec: self.params.idle_time_sec,
            pool: self.pool.clone(),
        })
    }

    pub fn data_source_factory(&self) -> Result<DataSourceFactory> {
        Ok(DataSourceFactory::new(
            self.data_source_spec()?,
            self.drivers.clone(),
        ))
    }

    /// Assemble the engine-facing configuration. Opens no connections.
    ///
    /// `credentials` and `options` are accepted for variants that resolve
    /// secrets or read runtime overrides; DB2 uses the configured username
    /// and password as given and applies no overrides. A variant that does
    /// consult them must do so here, before the factory is bound.
    pub fn build_plugin_config(
        &self,
        builder: PluginConfigBuilder,
        _credentials: &dyn CredentialsService,
        _options: &dyn OptionManager,
    ) -> Result<PluginConfig> {
        let dialect = self.dialect()?;
        let factory = self.data_source_factory()?;
        tracing::debug!(
            source_type = self.variant.id(),
            dialect = dialect.name(),
            fetch_size = self.params.fetch_size,
            external_query = self.params.enable_external_query,
            "assembling plugin config"
        );
        builder
            .with_source_type(self.variant.source_type)
            .with_dialect(dialect)
            .with_data_source_factory(factory)
            .with_show_only_connection_database(false)
            .with_fetch_size(self.params.fetch_size)
            .with_allow_external_query(self.params.enable_external_query)
            .build()
    }
}
