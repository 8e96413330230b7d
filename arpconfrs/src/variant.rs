//! Static description of each supported database variant.

use std::sync::Arc;

use crate::data_source::CommitMode;
use crate::dialect::{ArpDefinition, Db2Dialect, Dialect, DialectRegistry};
use crate::error::DialectLoadError;

/// Source type metadata surfaced to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceType {
    pub value: &'static str,
    pub label: &'static str,
    pub ui_config: &'static str,
    pub external_query_supported: bool,
}

#[derive(Debug)]
pub struct Variant {
    pub source_type: SourceType,
    /// Identity the driver is registered under.
    pub driver: &'static str,
    pub scheme: &'static str,
    /// Resource path of the dialect definition.
    pub dialect_path: &'static str,
    pub commit_mode: CommitMode,
    pub construct_dialect: fn(ArpDefinition) -> Arc<dyn Dialect>,
}

impl Variant {
    pub fn id(&self) -> &'static str {
        self.source_type.value
    }

    pub fn dialect_in(
        &self,
        registry: &DialectRegistry,
    ) -> std::result::Result<Arc<dyn Dialect>, DialectLoadError> {
        registry.get_or_load(self.id(), self.dialect_path, self.construct_dialect)
    }

    /// This variant's dialect from the process-wide registry.
    pub fn dialect_singleton(&self) -> std::result::Result<Arc<dyn Dialect>, DialectLoadError> {
        self.dialect_in(&DialectRegistry::global())
    }
}

fn db2_dialect(definition: ArpDefinition) -> Arc<dyn Dialect> {
    Arc::new(Db2Dialect::new(definition))
}

pub static DB2_V11: Variant = Variant {
    source_type: SourceType {
        value: "IBMDB2V11ARP",
        label: "IBM DB2 v11",
        ui_config: "IBMDB2V11ARP-layout.json",
        external_query_supported: true,
    },
    driver: "com.ibm.db2.jcc.DB2Driver",
    scheme: "jdbc:db2",
    dialect_path: "arp/implementation/db2v11-arp.yaml",
    commit_mode: CommitMode::DriverSpecified,
    construct_dialect: db2_dialect,
};

pub static VARIANTS: &[&Variant] = &[&DB2_V11];

pub fn lookup(id: &str) -> Option<&'static Variant> {
    VARIANTS.iter().copied().find(|v| v.id() == id)
}
