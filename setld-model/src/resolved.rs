//! The fully resolved, sequenced, emitter-ordered output of a link.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::row::Row;
use crate::Sequence;

/// One scheduled action: its qualified identifier and assigned position in
/// an execution ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub action: String,
    pub condition: Option<String>,
    pub sequence: Sequence,
}

/// The final output of the linking core.
///
/// Every table maps to its deterministically ordered row list, all references
/// are dereferenced to qualified identifiers, and the forward and rollback
/// execution orderings are carried both as explicit placement lists and as
/// the synthesized `ExecuteSequence` / `RollbackSequence` tables. The model
/// is produced once per link and never mutated afterward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedPackageModel {
    tables: BTreeMap<String, Vec<Row>>,
    forward: Vec<Placement>,
    rollback: Vec<Placement>,
}

impl ResolvedPackageModel {
    pub fn new(
        tables: BTreeMap<String, Vec<Row>>,
        forward: Vec<Placement>,
        rollback: Vec<Placement>,
    ) -> Self {
        Self {
            tables,
            forward,
            rollback,
        }
    }

    /// Rows of one table, in emitter order. Empty for unknown tables.
    pub fn table(&self, name: &str) -> &[Row] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &[Row])> {
        self.tables
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    /// Forward execution ordering, ascending by sequence.
    pub fn forward_order(&self) -> &[Placement] {
        &self.forward
    }

    /// Rollback execution ordering: first entry is the first action undone.
    pub fn rollback_order(&self) -> &[Placement] {
        &self.rollback
    }

    /// Canonical tab-separated dump of every table, one row per line, in the
    /// form `Table:QualifiedId\tvalue\tvalue...`. Two models are equal
    /// exactly when their renderings are byte-identical.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, rows) in &self.tables {
            for row in rows {
                let _ = write!(out, "{}:{}", name, row.qualified_id());
                for value in &row.values {
                    let _ = write!(out, "\t{value}");
                }
                out.push('\n');
            }
        }
        out
    }
}
