//! Standard table names and schemas owned by the linking core.
//!
//! Extension modules may re-declare these schemas verbatim (the merger
//! accepts identical redefinitions) but may not contribute rows directly to
//! the reserved tables: `CustomAction` and the two sequence tables are
//! synthesized by the pipeline itself.

use crate::schema::{ColumnDef, TableSchema};

pub const BINARY: &str = "Binary";
pub const DIRECTORY: &str = "Directory";
pub const FILE: &str = "File";
pub const CUSTOM_ACTION: &str = "CustomAction";
pub const EXECUTE_SEQUENCE: &str = "ExecuteSequence";
pub const ROLLBACK_SEQUENCE: &str = "RollbackSequence";

/// Tables whose rows are produced by the pipeline, never by a section.
pub const RESERVED_TABLES: [&str; 3] = [CUSTOM_ACTION, EXECUTE_SEQUENCE, ROLLBACK_SEQUENCE];

/// Column names of the action source and constraint pseudo-columns used in
/// diagnostics for symbols that live outside ordinary reference columns.
pub const ACTION_SOURCE_COLUMN: &str = "Source";
pub const ACTION_CONSTRAINT_COLUMN: &str = "Constraint";

/// The schemas every link invocation starts from.
pub fn standard_schemas() -> Vec<TableSchema> {
    vec![
        TableSchema::new(BINARY, vec![ColumnDef::text("Data")]),
        TableSchema::new(
            DIRECTORY,
            vec![
                ColumnDef::reference("Parent", DIRECTORY).nullable(),
                ColumnDef::text("Name"),
            ],
        ),
        TableSchema::new(
            FILE,
            vec![
                ColumnDef::reference("Directory", DIRECTORY),
                ColumnDef::text("Name"),
            ],
        ),
    ]
}
