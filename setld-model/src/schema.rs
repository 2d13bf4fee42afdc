//! Table schemas: named, ordered, typed columns with declared references.

use setld_result::{Error, Result};

use crate::row::Row;
use crate::value::Value;

/// The kind of data a column holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    /// An identifier that must resolve to a row of the named table.
    Reference { table: String },
}

/// One column of a table schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
            nullable: false,
        }
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Int,
            nullable: false,
        }
    }

    pub fn reference(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Reference {
                table: table.into(),
            },
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A named table schema with ordered columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Structural validation of a row against this schema: column arity,
    /// value kinds, and nullability. Reference semantics are checked later by
    /// the resolver.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        if row.values.len() != self.columns.len() {
            return Err(Error::SchemaViolation(format!(
                "row {}:{} has {} values but table '{}' declares {} columns",
                row.table,
                row.id,
                row.values.len(),
                self.name,
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter().zip(&row.values) {
            if value.is_null() {
                if !column.nullable {
                    return Err(Error::SchemaViolation(format!(
                        "row {}:{} column '{}' is null but not nullable",
                        row.table, row.id, column.name
                    )));
                }
                continue;
            }
            let ok = match column.kind {
                ColumnKind::Text => matches!(value, Value::Text(_)),
                ColumnKind::Int => matches!(value, Value::Int(_)),
                ColumnKind::Reference { .. } => matches!(value, Value::Id(_)),
            };
            if !ok {
                return Err(Error::SchemaViolation(format!(
                    "row {}:{} column '{}' holds a value of the wrong kind",
                    row.table, row.id, column.name
                )));
            }
        }
        Ok(())
    }

    /// Iterate the reference columns of this schema as
    /// `(column index, column, target table)`.
    pub fn reference_columns(&self) -> impl Iterator<Item = (usize, &ColumnDef, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, column)| match &column.kind {
                ColumnKind::Reference { table } => Some((idx, column, table.as_str())),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_schema() -> TableSchema {
        TableSchema::new(
            "FileShare",
            vec![
                ColumnDef::text("Name"),
                ColumnDef::text("Description").nullable(),
                ColumnDef::reference("Directory", "Directory"),
            ],
        )
    }

    #[test]
    fn validates_matching_row() {
        let schema = share_schema();
        let row = Row::new(
            "FileShare",
            "ExampleShare",
            vec![
                Value::from("example"),
                Value::Null,
                Value::Id("INSTALLFOLDER".into()),
            ],
        );
        assert!(schema.validate_row(&row).is_ok());
    }

    #[test]
    fn rejects_arity_and_kind_mismatches() {
        let schema = share_schema();

        let short = Row::new("FileShare", "ExampleShare", vec![Value::from("example")]);
        assert!(matches!(
            schema.validate_row(&short),
            Err(Error::SchemaViolation(_))
        ));

        let wrong_kind = Row::new(
            "FileShare",
            "ExampleShare",
            vec![
                Value::from("example"),
                Value::Null,
                Value::from("not-a-reference"),
            ],
        );
        assert!(matches!(
            schema.validate_row(&wrong_kind),
            Err(Error::SchemaViolation(_))
        ));
    }

    #[test]
    fn reference_columns_report_targets() {
        let schema = share_schema();
        let refs: Vec<_> = schema.reference_columns().collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, 2);
        assert_eq!(refs[0].2, "Directory");
    }
}
