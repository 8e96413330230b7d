//! Dialect descriptors: how one database variant differs from baseline SQL.
//!
//! A dialect wraps an [`ArpDefinition`] loaded from YAML. The trait's default
//! methods answer capability questions straight from the definition; variant
//! types override the few places where their database needs special handling.

pub mod definition;
pub mod registry;

mod arp;
mod db2;

pub use arp::ArpDialect;
pub use db2::Db2Dialect;
pub use definition::ArpDefinition;
pub use registry::{load_dialect, DialectRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Aggregate,
    Except,
    Project,
    Join,
    Sort,
    Union,
    UnionAll,
    Values,
}

pub trait Dialect: Send + Sync + std::fmt::Debug {
    fn definition(&self) -> &ArpDefinition;

    fn name(&self) -> &str {
        &self.definition().metadata.name
    }

    fn quote_ident(&self, ident: &str) -> String {
        let quote = &self.definition().syntax.identifier_quote;
        if quote.is_empty() {
            return ident.to_string();
        }
        let escaped = ident.replace(quote.as_str(), &quote.repeat(2));
        format!("{quote}{escaped}{quote}")
    }

    fn identifier_length_limit(&self) -> Option<usize> {
        self.definition().syntax.identifier_length_limit
    }

    /// Engine type name for a source column type, if the dialect knows it.
    /// Precision and scale must fit within the mapping's bounds when both
    /// sides specify them.
    fn map_source_type(
        &self,
        source: &str,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Option<&str> {
        let within = |value: Option<u32>, max: Option<u32>| match (value, max) {
            (Some(v), Some(m)) => v <= m,
            _ => true,
        };
        self.definition()
            .data_types
            .mappings
            .iter()
            .find(|m| {
                m.source.name.eq_ignore_ascii_case(source.trim())
                    && within(precision, m.source.max_precision)
                    && within(scale, m.source.max_scale)
            })
            .map(|m| m.target.name.as_str())
    }

    fn supports_operator(&self, name: &str, args: &[&str]) -> bool {
        self.definition()
            .expressions
            .operators
            .iter()
            .any(|op| op.find(name, args).is_some())
    }

    fn supports_aggregate(&self, name: &str, args: &[&str]) -> bool {
        let agg = &self.definition().relational_algebra.aggregation;
        agg.enable && agg.functions.iter().any(|f| f.find(name, args).is_some())
    }

    fn supports_join(&self, kind: JoinKind) -> bool {
        let join = &self.definition().relational_algebra.join;
        join.enable
            && match kind {
                JoinKind::Cross => join.cross.enable,
                JoinKind::Inner => join.inner.enable,
                JoinKind::Left => join.left.enable,
                JoinKind::Right => join.right.enable,
                JoinKind::Full => join.full.enable,
            }
    }

    fn supports(&self, op: RelationalOp) -> bool {
        let ra = &self.definition().relational_algebra;
        match op {
            RelationalOp::Aggregate => ra.aggregation.enable,
            RelationalOp::Except => ra.except.enable,
            RelationalOp::Project => ra.project.enable,
            RelationalOp::Join => ra.join.enable,
            RelationalOp::Sort => ra.sort.enable,
            RelationalOp::Union => ra.union.enable,
            RelationalOp::UnionAll => ra.union_all.enable,
            RelationalOp::Values => ra.values.enable,
        }
    }

    fn render_bool(&self, value: bool) -> String {
        let literal = if value { "TRUE" } else { "FALSE" };
        literal.to_string()
    }

    /// Render a row-limiting clause, or `None` when the definition cannot
    /// express this combination and the engine must apply it itself.
    fn render_fetch_offset(&self, offset: Option<u64>, fetch: Option<u64>) -> Option<String> {
        let formats = &self.definition().relational_algebra.sort.fetch_offset;
        let (template, args) = match (offset, fetch) {
            (None, None) => return Some(String::new()),
            (Some(o), Some(f)) => (formats.offset_fetch.as_ref(), [o, f]),
            (Some(o), None) => (formats.offset_only.as_ref(), [o, 0]),
            (None, Some(f)) => (formats.fetch_only.as_ref(), [f, 0]),
        };
        let template = template.filter(|t| t.enable)?;
        Some(
            template
                .format
                .replace("{0}", &args[0].to_string())
                .replace("{1}", &args[1].to_string()),
        )
    }
}
