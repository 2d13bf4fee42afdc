//! Sections: the immutable row bundles contributed by modules.

use setld_result::Result;

use crate::action::CustomAction;
use crate::row::Row;
use crate::schema::TableSchema;

/// One module's contributed rows, actions, and schema metadata for one
/// compilation unit.
///
/// Sections are read-only inputs to the link: the merger consumes a fully
/// materialized snapshot, never a partial or streaming one. The `module` name
/// must be unique across the sections of one link invocation; it establishes
/// the canonical merge order that makes output independent of the order
/// sections were supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub module: String,
    pub schemas: Vec<TableSchema>,
    pub rows: Vec<Row>,
    pub actions: Vec<CustomAction>,
}

impl Section {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_action(mut self, action: CustomAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Capability interface for modules that contribute compiled sections.
///
/// The linker gathers sections from a registered provider list once per
/// invocation; the resolution and scheduling logic never needs to know which
/// module produced a row.
pub trait SectionSource {
    /// Stable module name, used for canonical ordering and diagnostics.
    fn name(&self) -> &str;

    /// Materialize this module's section for one compilation unit.
    fn section(&self) -> Result<Section>;
}
