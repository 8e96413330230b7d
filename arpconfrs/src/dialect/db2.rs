//! IBM DB2 dialect.

use super::{ArpDefinition, ArpDialect, Dialect};

const BIT_DATA_SUFFIX: &str = "FOR BIT DATA";

#[derive(Debug, Clone)]
pub struct Db2Dialect {
    base: ArpDialect,
}

impl Db2Dialect {
    pub fn new(definition: ArpDefinition) -> Self {
        Self {
            base: ArpDialect::new(definition),
        }
    }
}

impl Dialect for Db2Dialect {
    fn definition(&self) -> &ArpDefinition {
        self.base.definition()
    }

    /// Character columns declared `FOR BIT DATA` hold raw bytes.
    fn map_source_type(
        &self,
        source: &str,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Option<&str> {
        let trimmed = source.trim();
        if trimmed.to_ascii_uppercase().ends_with(BIT_DATA_SUFFIX) {
            return Some("varbinary");
        }
        self.base.map_source_type(trimmed, precision, scale)
    }

    /// DB2 before 11.1 has no boolean literal; use a tautology instead.
    fn render_bool(&self, value: bool) -> String {
        if self.definition().syntax.allows_boolean_literal {
            return self.base.render_bool(value);
        }
        let predicate = if value { "1 = 1" } else { "1 = 0" };
        predicate.to_string()
    }
}
