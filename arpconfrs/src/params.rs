//! User-supplied connection parameters and their validation.

use serde::Deserialize;

use crate::address::connection_address;
use crate::error::{Result, ValidationError};
use crate::fields::{self, FieldDescriptor};
use crate::secret::SensitiveString;

pub const DEFAULT_FETCH_SIZE: u32 = 500;
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 8;
pub const DEFAULT_IDLE_TIME_SEC: u32 = 60;

/// Connection settings for one configured source.
///
/// Required text fields are optional at the type level because persisted
/// configurations may be incomplete; [`ConnectionParameters::validate`] is
/// the gate before anything connects.
///
/// Deserialize only: serde output would carry the redacted password. Persist
/// through [`crate::wire`] instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionParameters {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SensitiveString>,
    #[serde(default = "default_fetch_size", alias = "fetchSize")]
    pub fetch_size: u32,
    #[serde(default, alias = "enableExternalQuery")]
    pub enable_external_query: bool,
    #[serde(default = "default_max_idle_conns", alias = "maxIdleConns")]
    pub max_idle_conns: u32,
    #[serde(default = "default_idle_time_sec", alias = "idleTimeSec")]
    pub idle_time_sec: u32,
}

fn default_fetch_size() -> u32 {
    DEFAULT_FETCH_SIZE
}

fn default_max_idle_conns() -> u32 {
    DEFAULT_MAX_IDLE_CONNS
}

fn default_idle_time_sec() -> u32 {
    DEFAULT_IDLE_TIME_SEC
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            database: None,
            username: None,
            password: None,
            fetch_size: DEFAULT_FETCH_SIZE,
            enable_external_query: false,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            idle_time_sec: DEFAULT_IDLE_TIME_SEC,
        }
    }
}

/// Borrowed view of a single field, keyed through the field schema.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Secret(Option<&'a SensitiveString>),
    Int(u32),
    Bool(bool),
}

impl FieldValue<'_> {
    /// Null, empty and whitespace-only all count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(v) => v.map_or(true, |s| s.trim().is_empty()),
            FieldValue::Secret(v) => v.map_or(true, |s| s.is_blank()),
            FieldValue::Int(_) | FieldValue::Bool(_) => false,
        }
    }
}

impl ConnectionParameters {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SensitiveString>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port.into()),
            database: Some(database.into()),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    pub fn with_external_query(mut self, enabled: bool) -> Self {
        self.enable_external_query = enabled;
        self
    }

    pub fn with_max_idle_conns(mut self, max_idle_conns: u32) -> Self {
        self.max_idle_conns = max_idle_conns;
        self
    }

    pub fn with_idle_time_sec(mut self, idle_time_sec: u32) -> Self {
        self.idle_time_sec = idle_time_sec;
        self
    }

    /// Look up a field's current value by descriptor.
    ///
    /// # Panics
    ///
    /// If `field` is not one of [`fields::FIELDS`].
    pub fn value(&self, field: &FieldDescriptor) -> FieldValue<'_> {
        match field.name {
            "host" => FieldValue::Text(self.host.as_deref()),
            "port" => FieldValue::Text(self.port.as_deref()),
            "database" => FieldValue::Text(self.database.as_deref()),
            "username" => FieldValue::Text(self.username.as_deref()),
            "password" => FieldValue::Secret(self.password.as_ref()),
            "fetch_size" => FieldValue::Int(self.fetch_size),
            "enable_external_query" => FieldValue::Bool(self.enable_external_query),
            "max_idle_conns" => FieldValue::Int(self.max_idle_conns),
            "idle_time_sec" => FieldValue::Int(self.idle_time_sec),
            other => unreachable!("no connection field named {other}"),
        }
    }

    pub(crate) fn set_text(&mut self, field: &FieldDescriptor, value: String) {
        let slot = match field.name {
            "host" => &mut self.host,
            "port" => &mut self.port,
            "database" => &mut self.database,
            "username" => &mut self.username,
            _ => return,
        };
        *slot = Some(value);
    }

    pub(crate) fn set_secret(&mut self, field: &FieldDescriptor, value: SensitiveString) {
        if field.name == "password" {
            self.password = Some(value);
        }
    }

    pub(crate) fn set_int(&mut self, field: &FieldDescriptor, value: u32) {
        match field.name {
            "fetch_size" => self.fetch_size = value,
            "max_idle_conns" => self.max_idle_conns = value,
            "idle_time_sec" => self.idle_time_sec = value,
            _ => {}
        }
    }

    pub(crate) fn set_bool(&mut self, field: &FieldDescriptor, value: bool) {
        if field.name == "enable_external_query" {
            self.enable_external_query = value;
        }
    }

    /// Reject the first required field (in tag order) that is null or blank.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for field in fields::required_fields() {
            if self.value(field).is_blank() {
                return Err(ValidationError::MissingField {
                    field: field.name,
                    label: field.label,
                });
            }
        }
        Ok(())
    }

    /// Build the destination address for `scheme`.
    ///
    /// Credentials are checked too even though they are not part of the
    /// address: connecting without them is pointless.
    pub fn to_connection_address(&self, scheme: &str) -> Result<String> {
        self.validate()?;
        Ok(connection_address(
            scheme,
            self.host.as_deref().unwrap_or_default(),
            self.port.as_deref().unwrap_or_default(),
            self.database.as_deref().unwrap_or_default(),
        ))
    }
}
