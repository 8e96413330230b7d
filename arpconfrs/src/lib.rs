pub mod address;
pub mod config;
pub mod data_source;
pub mod dialect;
pub mod display;
pub mod driver;
pub mod error;
pub mod fields;
pub mod params;
pub mod plugin;
pub mod secret;
pub mod source;
pub mod variant;
pub mod wire;

pub use config::{ConnectorConfig, PoolConfig};
pub use data_source::{
    CommitMode, DataSourceFactory, DataSourceSpec, PooledConnection, PooledDataSource,
};
pub use dialect::{Dialect, DialectRegistry};
pub use driver::{Driver, DriverConnection, DriverRegistry};
pub use error::{ConnectorError, DialectLoadError, Result, ValidationError};
pub use params::ConnectionParameters;
pub use plugin::{CredentialsService, OptionManager, PluginConfig, PluginConfigBuilder};
pub use secret::SensitiveString;
pub use source::SourceConfig;
pub use variant::{Variant, DB2_V11};
