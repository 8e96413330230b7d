//! Declarative field schema for connection parameters.
//!
//! One table drives validation, the persisted wire form, the display view and
//! metadata-impact checks, so per-field rules live in exactly one place.

use crate::params::{
    ConnectionParameters, FieldValue, DEFAULT_FETCH_SIZE, DEFAULT_IDLE_TIME_SEC,
    DEFAULT_MAX_IDLE_CONNS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Int { default: u32 },
    Bool { default: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Property name used in config files and display payloads.
    pub name: &'static str,
    /// Stable wire tag. Never renumber or reuse.
    pub tag: u32,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Changing an impacting field invalidates cached dataset metadata.
    pub metadata_impacting: bool,
}

impl FieldDescriptor {
    pub fn is_secret(&self) -> bool {
        matches!(self.kind, FieldKind::Secret)
    }
}

pub const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "host",
        tag: 1,
        label: "Database Server",
        kind: FieldKind::Text,
        required: true,
        metadata_impacting: true,
    },
    FieldDescriptor {
        name: "port",
        tag: 2,
        label: "Database Port",
        kind: FieldKind::Text,
        required: true,
        metadata_impacting: true,
    },
    FieldDescriptor {
        name: "database",
        tag: 3,
        label: "Database",
        kind: FieldKind::Text,
        required: true,
        metadata_impacting: true,
    },
    FieldDescriptor {
        name: "username",
        tag: 4,
        label: "Username",
        kind: FieldKind::Text,
        required: true,
        metadata_impacting: true,
    },
    FieldDescriptor {
        name: "password",
        tag: 5,
        label: "Password",
        kind: FieldKind::Secret,
        required: true,
        metadata_impacting: true,
    },
    FieldDescriptor {
        name: "fetch_size",
        tag: 6,
        label: "Record fetch size",
        kind: FieldKind::Int {
            default: DEFAULT_FETCH_SIZE,
        },
        required: false,
        metadata_impacting: false,
    },
    FieldDescriptor {
        name: "enable_external_query",
        tag: 7,
        label: "Grant External Query access",
        kind: FieldKind::Bool { default: false },
        required: false,
        metadata_impacting: false,
    },
    FieldDescriptor {
        name: "max_idle_conns",
        tag: 8,
        label: "Maximum idle connections",
        kind: FieldKind::Int {
            default: DEFAULT_MAX_IDLE_CONNS,
        },
        required: false,
        metadata_impacting: false,
    },
    FieldDescriptor {
        name: "idle_time_sec",
        tag: 9,
        label: "Connection idle time (s)",
        kind: FieldKind::Int {
            default: DEFAULT_IDLE_TIME_SEC,
        },
        required: false,
        metadata_impacting: false,
    },
];

pub fn by_name(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.name == name)
}

pub fn by_tag(tag: u32) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.tag == tag)
}

pub fn required_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter().filter(|f| f.required)
}

/// Impacting fields whose value differs between `old` and `new`.
pub fn metadata_impacting_changes(
    old: &ConnectionParameters,
    new: &ConnectionParameters,
) -> Vec<&'static FieldDescriptor> {
    FIELDS
        .iter()
        .filter(|f| f.metadata_impacting)
        .filter(|f| !same_value(&old.value(f), &new.value(f)))
        .collect()
}

/// True when switching from `old` to `new` must drop cached table metadata.
pub fn requires_metadata_refresh(old: &ConnectionParameters, new: &ConnectionParameters) -> bool {
    !metadata_impacting_changes(old, new).is_empty()
}

fn same_value(a: &FieldValue<'_>, b: &FieldValue<'_>) -> bool {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
        (FieldValue::Secret(a), FieldValue::Secret(b)) => {
            a.map(|s| s.expose_secret()) == b.map(|s| s.expose_secret())
        }
        (FieldValue::Int(a), FieldValue::Int(b)) => a == b,
        (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
        _ => false,
    }
}
