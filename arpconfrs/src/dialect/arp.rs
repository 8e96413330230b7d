//! Baseline dialect: everything answered from the definition file.

use super::{ArpDefinition, Dialect};

#[derive(Debug, Clone)]
pub struct ArpDialect {
    definition: ArpDefinition,
}

impl ArpDialect {
    pub fn new(definition: ArpDefinition) -> Self {
        Self { definition }
    }
}

impl Dialect for ArpDialect {
    fn definition(&self) -> &ArpDefinition {
        &self.definition
    }
}
