//! Address derivation, required-field validation and metadata impact.

use arpconf::fields::{self, FIELDS};
use arpconf::{ConnectionParameters, ConnectorError, SourceConfig, DB2_V11};

fn params() -> ConnectionParameters {
    ConnectionParameters::new("db.example.com", "50000", "SALES", "u", "p")
}

#[test]
fn address_from_complete_parameters() {
    let source = SourceConfig::db2_v11(params());
    assert_eq!(
        source.to_connection_address().unwrap(),
        "jdbc:db2://db.example.com:50000/SALES"
    );
}

#[test]
fn address_is_deterministic() {
    let p = params();
    let first = p.to_connection_address(DB2_V11.scheme).unwrap();
    for _ in 0..5 {
        assert_eq!(p.to_connection_address(DB2_V11.scheme).unwrap(), first);
    }
}

#[test]
fn values_are_used_verbatim() {
    let p = ConnectionParameters::new("DB-Host.local", "60000", "My_DB", "u", "p");
    assert_eq!(
        p.to_connection_address("jdbc:db2").unwrap(),
        "jdbc:db2://DB-Host.local:60000/My_DB"
    );
}

#[test]
fn each_missing_required_field_is_named() {
    for name in ["host", "port", "database", "username", "password"] {
        let mut p = params();
        match name {
            "host" => p.host = None,
            "port" => p.port = None,
            "database" => p.database = None,
            "username" => p.username = None,
            _ => p.password = None,
        }
        let err = p.to_connection_address("jdbc:db2").unwrap_err();
        assert_eq!(err.field(), Some(name), "field {name}");
        assert!(matches!(err, ConnectorError::Validation(_)));
    }
}

#[test]
fn blank_values_count_as_missing() {
    let p = ConnectionParameters::new("db.example.com", "  ", "SALES", "u", "p");
    assert_eq!(p.validate().unwrap_err().to_string(), "Missing port");

    let p = ConnectionParameters::new("db.example.com", "50000", "SALES", "u", "");
    let err = p.to_connection_address("jdbc:db2").unwrap_err();
    assert_eq!(err.field(), Some("password"));
}

#[test]
fn first_missing_field_in_declaration_order_wins() {
    let p = ConnectionParameters {
        username: Some("u".into()),
        ..Default::default()
    };
    assert_eq!(p.validate().unwrap_err().to_string(), "Missing host");
}

#[test]
fn validation_fails_before_any_factory_exists() {
    let mut p = params();
    p.database = None;
    let err = SourceConfig::db2_v11(p).data_source_factory().unwrap_err();
    assert_eq!(err.field(), Some("database"));
}

#[test]
fn metadata_impacting_fields() {
    let impacting: Vec<&str> = FIELDS
        .iter()
        .filter(|f| f.metadata_impacting)
        .map(|f| f.name)
        .collect();
    assert_eq!(impacting, vec!["host", "port", "database", "username", "password"]);
}

#[test]
fn changing_pool_tuning_does_not_require_refresh() {
    let old = params();
    let new = params()
        .with_fetch_size(1000)
        .with_external_query(true)
        .with_max_idle_conns(2)
        .with_idle_time_sec(5);
    assert!(!fields::requires_metadata_refresh(&old, &new));
    assert!(fields::metadata_impacting_changes(&old, &new).is_empty());
}

#[test]
fn changing_database_requires_refresh() {
    let old = params();
    let mut new = params();
    new.database = Some("HR".into());
    assert!(fields::requires_metadata_refresh(&old, &new));
    let changed: Vec<&str> = fields::metadata_impacting_changes(&old, &new)
        .iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(changed, vec!["database"]);
}

#[test]
fn changing_password_requires_refresh() {
    let old = params();
    let new = ConnectionParameters::new("db.example.com", "50000", "SALES", "u", "rotated");
    assert!(fields::requires_metadata_refresh(&old, &new));
}

#[test]
fn defaults_apply_to_optional_fields() {
    let p = params();
    assert_eq!(p.fetch_size, 500);
    assert!(!p.enable_external_query);
    assert_eq!(p.max_idle_conns, 8);
    assert_eq!(p.idle_time_sec, 60);
}
