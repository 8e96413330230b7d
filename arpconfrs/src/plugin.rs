//! The configuration object handed to the host engine.

use std::sync::Arc;

use crate::data_source::DataSourceFactory;
use crate::dialect::Dialect;
use crate::error::{ConnectorError, Result};
use crate::params::DEFAULT_FETCH_SIZE;
use crate::secret::SensitiveString;
use crate::variant::SourceType;

/// Host-side credential lookup.
pub trait CredentialsService: Send + Sync {
    /// Resolve a stored credential reference to the secret it points at.
    fn lookup(&self, reference: &str) -> Result<Option<SensitiveString>>;
}

/// Credentials service that knows nothing; every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentials;

impl CredentialsService for NoCredentials {
    fn lookup(&self, _reference: &str) -> Result<Option<SensitiveString>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
}

/// Host-side runtime options.
pub trait OptionManager: Send + Sync {
    fn option(&self, name: &str) -> Option<OptionValue>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOptions;

impl OptionManager for NoOptions {
    fn option(&self, _name: &str) -> Option<OptionValue> {
        None
    }
}

/// Immutable per-activation bundle: dialect, data source factory and the
/// behavioral flags the engine consults when planning against this source.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    source_name: Option<String>,
    source_type: Option<SourceType>,
    dialect: Arc<dyn Dialect>,
    data_source_factory: DataSourceFactory,
    fetch_size: u32,
    allow_external_query: bool,
    show_only_connection_database: bool,
}

impl PluginConfig {
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::default()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn source_type(&self) -> Option<&SourceType> {
        self.source_type.as_ref()
    }

    pub fn dialect(&self) -> &Arc<dyn Dialect> {
        &self.dialect
    }

    pub fn data_source_factory(&self) -> &DataSourceFactory {
        &self.data_source_factory
    }

    pub fn fetch_size(&self) -> u32 {
        self.fetch_size
    }

    pub fn allow_external_query(&self) -> bool {
        self.allow_external_query
    }

    /// When true the engine lists only the configured database during
    /// introspection.
    pub fn show_only_connection_database(&self) -> bool {
        self.show_only_connection_database
    }
}

#[derive(Debug, Default)]
pub struct PluginConfigBuilder {
    source_name: Option<String>,
    source_type: Option<SourceType>,
    dialect: Option<Arc<dyn Dialect>>,
    data_source_factory: Option<DataSourceFactory>,
    fetch_size: Option<u32>,
    allow_external_query: bool,
    show_only_connection_database: bool,
}

impl PluginConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn with_data_source_factory(mut self, factory: DataSourceFactory) -> Self {
        self.data_source_factory = Some(factory);
        self
    }

    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = Some(fetch_size);
        self
    }

    pub fn with_allow_external_query(mut self, allow: bool) -> Self {
        self.allow_external_query = allow;
        self
    }

    pub fn with_show_only_connection_database(mut self, only: bool) -> Self {
        self.show_only_connection_database = only;
        self
    }

    pub fn build(self) -> Result<PluginConfig> {
        let dialect = self
            .dialect
            .ok_or_else(|| ConnectorError::Config("plugin config requires a dialect".into()))?;
        let data_source_factory = self.data_source_factory.ok_or_else(|| {
            ConnectorError::Config("plugin config requires a data source factory".into())
        })?;
        Ok(PluginConfig {
            source_name: self.source_name,
            source_type: self.source_type,
            dialect,
            data_source_factory,
            fetch_size: self.fetch_size.unwrap_or(DEFAULT_FETCH_SIZE),
            allow_external_query: self.allow_external_query,
            show_only_connection_database: self.show_only_connection_database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_dialect_and_factory() {
        let err = PluginConfigBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("requires a dialect"));
    }

    #[test]
    fn noop_collaborators() {
        assert!(NoCredentials.lookup("anything").unwrap().is_none());
        assert!(NoOptions.option("store.jdbc.fetch_size").is_none());
    }
}
