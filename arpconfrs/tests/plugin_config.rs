//! Assembly of the engine-facing plugin configuration.

mod common;

use std::sync::Arc;

use arpconf::plugin::{NoCredentials, NoOptions};
use arpconf::{ConnectorError, DialectRegistry, PluginConfigBuilder, SourceConfig};

use common::{sales_params, sales_source, FakeDriver};

#[test]
fn flags_follow_parameters() {
    let driver = FakeDriver::accepting("p");
    let source = SourceConfig::db2_v11(sales_params().with_fetch_size(2000).with_external_query(true))
        .with_driver_registry(driver.registry());

    let config = source
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    assert_eq!(config.fetch_size(), 2000);
    assert!(config.allow_external_query());
    assert!(!config.show_only_connection_database());
    assert_eq!(config.source_type().map(|t| t.label), Some("IBM DB2 v11"));
}

#[test]
fn external_query_defaults_off() {
    let driver = FakeDriver::accepting("p");
    let config = sales_source(&driver)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    assert!(!config.allow_external_query());
    assert_eq!(config.fetch_size(), 500);
}

#[test]
fn show_only_connection_database_is_always_cleared() {
    let driver = FakeDriver::accepting("p");
    let builder = PluginConfigBuilder::new()
        .with_source_name("sales")
        .with_show_only_connection_database(true);
    let config = sales_source(&driver)
        .build_plugin_config(builder, &NoCredentials, &NoOptions)
        .unwrap();
    assert!(!config.show_only_connection_database());
    assert_eq!(config.source_name(), Some("sales"));
}

#[test]
fn building_opens_no_connections() {
    let driver = FakeDriver::accepting("p");
    let _config = sales_source(&driver)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    assert_eq!(driver.connects(), 0);
    assert_eq!(driver.rejected(), 0);
}

#[test]
fn wrong_password_is_not_noticed_until_a_pool_is_built() {
    let driver = FakeDriver::accepting("other");
    assert!(sales_source(&driver)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .is_ok());
}

#[test]
fn sources_share_one_dialect_instance() {
    let registry = Arc::new(DialectRegistry::builtin());
    let a = SourceConfig::db2_v11(sales_params())
        .with_dialect_registry(registry.clone())
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    let mut other = sales_params();
    other.database = Some("HR".into());
    let b = SourceConfig::db2_v11(other)
        .with_dialect_registry(registry)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();

    assert!(Arc::ptr_eq(a.dialect(), b.dialect()));
    assert_ne!(
        a.data_source_factory().spec().address,
        b.data_source_factory().spec().address
    );
}

#[test]
fn global_registry_is_used_by_default() {
    let a = SourceConfig::db2_v11(sales_params())
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    let b = SourceConfig::db2_v11(sales_params())
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();
    assert!(Arc::ptr_eq(a.dialect(), b.dialect()));
}

#[test]
fn invalid_parameters_fail_assembly() {
    let mut params = sales_params();
    params.username = Some("   ".into());
    let err = SourceConfig::db2_v11(params)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap_err();
    assert!(matches!(err, ConnectorError::Validation(_)));
    assert_eq!(err.field(), Some("username"));
}

#[test]
fn unloadable_dialect_fails_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let err = SourceConfig::db2_v11(sales_params())
        .with_dialect_registry(Arc::new(DialectRegistry::with_root(dir.path())))
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap_err();
    assert!(matches!(err, ConnectorError::DialectLoad(_)));
}

#[tokio::test]
async fn factory_from_plugin_config_connects() {
    let driver = FakeDriver::accepting("p");
    let config = sales_source(&driver)
        .build_plugin_config(PluginConfigBuilder::new(), &NoCredentials, &NoOptions)
        .unwrap();

    let ds = config.data_source_factory().new_data_source().await.unwrap();
    assert_eq!(ds.address(), "jdbc:db2://db.example.com:50000/SALES");
    assert_eq!(driver.connects(), 1);
}
