//! Declarative dialect definition, deserialized from YAML.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArpDefinition {
    pub metadata: DialectMetadata,
    #[serde(default)]
    pub syntax: SyntaxConfig,
    #[serde(default)]
    pub data_types: DataTypes,
    #[serde(default)]
    pub relational_algebra: RelationalAlgebra,
    #[serde(default)]
    pub expressions: Expressions,
}

impl ArpDefinition {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialectMetadata {
    pub name: String,
    pub apiname: String,
    #[serde(default = "default_spec_version")]
    pub spec_version: String,
}

fn default_spec_version() -> String {
    "1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub identifier_quote: String,
    pub identifier_length_limit: Option<usize>,
    pub allows_boolean_literal: bool,
    pub supports_catalogs: bool,
    pub supports_schemas: bool,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            identifier_quote: "\"".to_string(),
            identifier_length_limit: None,
            allows_boolean_literal: true,
            supports_catalogs: false,
            supports_schemas: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DataTypes {
    pub mappings: Vec<TypeMapping>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeMapping {
    pub source: SourceType,
    pub target: TargetType,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceType {
    pub name: String,
    #[serde(default)]
    pub max_precision: Option<u32>,
    #[serde(default)]
    pub max_scale: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetType {
    pub name: String,
}

/// `enable: bool` toggle used throughout the relational section.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Toggle {
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RelationalAlgebra {
    pub aggregation: Aggregation,
    pub except: Toggle,
    pub project: Toggle,
    pub join: JoinConfig,
    pub sort: SortConfig,
    pub union: Toggle,
    pub union_all: Toggle,
    pub values: Toggle,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Aggregation {
    pub enable: bool,
    pub group_by_ordinal: bool,
    pub distinct: bool,
    pub functions: Vec<OperatorSpec>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JoinConfig {
    pub enable: bool,
    pub cross: Toggle,
    pub inner: Toggle,
    pub left: Toggle,
    pub right: Toggle,
    pub full: Toggle,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SortConfig {
    pub enable: bool,
    pub order_by: Toggle,
    pub fetch_offset: FetchOffset,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchOffset {
    pub offset_fetch: Option<FormatToggle>,
    pub offset_only: Option<FormatToggle>,
    pub fetch_only: Option<FormatToggle>,
}

/// A clause template; `{0}` and `{1}` are positional placeholders.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormatToggle {
    #[serde(default)]
    pub enable: bool,
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Expressions {
    pub subqueries: Subqueries,
    pub supports_case: bool,
    pub supports_over: bool,
    pub operators: Vec<OperatorSpec>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Subqueries {
    pub enable: bool,
    pub correlated: bool,
    pub scalar: bool,
    pub in_clause: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorSpec {
    pub names: Vec<String>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Signature {
    #[serde(rename = "return")]
    pub return_type: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub rewrite: Option<String>,
}

impl OperatorSpec {
    /// First signature of `name` whose argument types match `args`
    /// (case-insensitive on both).
    pub fn find(&self, name: &str, args: &[&str]) -> Option<&Signature> {
        if !self.names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return None;
        }
        self.signatures.iter().find(|sig| {
            sig.args.len() == args.len()
                && sig
                    .args
                    .iter()
                    .zip(args)
                    .all(|(want, got)| want.eq_ignore_ascii_case(got))
        })
    }
}
