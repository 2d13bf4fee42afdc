//! Bundle prerequisite-search descriptors.
//!
//! These rows are evaluated by a runtime search evaluator at install time,
//! not at link time: they flow through the pipeline as pass-through tables,
//! untouched apart from reference resolution.

use setld_model::{ColumnDef, Row, Section, SectionSource, TableSchema, Value};
use setld_result::Result;

pub const FILE_SEARCH: &str = "FileSearch";
pub const REGISTRY_SEARCH: &str = "RegistrySearch";
pub const PRODUCT_SEARCH: &str = "ProductSearch";

/// One prerequisite search, assigning its result to a named variable.
#[derive(Clone, Debug)]
pub enum PrereqSearch {
    File {
        id: String,
        variable: String,
        path: String,
    },
    Registry {
        id: String,
        variable: String,
        root: String,
        key: String,
        value: String,
    },
    Product {
        id: String,
        variable: String,
        upgrade_code: String,
        condition: Option<String>,
    },
}

/// Contributes prerequisite-search descriptor rows and nothing else.
#[derive(Clone, Debug, Default)]
pub struct PrereqSearchModule {
    pub searches: Vec<PrereqSearch>,
}

impl PrereqSearchModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: PrereqSearch) -> Self {
        self.searches.push(search);
        self
    }
}

impl SectionSource for PrereqSearchModule {
    fn name(&self) -> &str {
        "util.search"
    }

    fn section(&self) -> Result<Section> {
        let mut section = Section::new(self.name())
            .with_schema(TableSchema::new(
                FILE_SEARCH,
                vec![ColumnDef::text("Variable"), ColumnDef::text("Path")],
            ))
            .with_schema(TableSchema::new(
                REGISTRY_SEARCH,
                vec![
                    ColumnDef::text("Variable"),
                    ColumnDef::text("Root"),
                    ColumnDef::text("Key"),
                    ColumnDef::text("Value"),
                ],
            ))
            .with_schema(TableSchema::new(
                PRODUCT_SEARCH,
                vec![
                    ColumnDef::text("Variable"),
                    ColumnDef::text("UpgradeCode"),
                    ColumnDef::text("Condition").nullable(),
                ],
            ));

        for search in &self.searches {
            let row = match search {
                PrereqSearch::File { id, variable, path } => Row::new(
                    FILE_SEARCH,
                    id.clone(),
                    vec![Value::Text(variable.clone()), Value::Text(path.clone())],
                ),
                PrereqSearch::Registry {
                    id,
                    variable,
                    root,
                    key,
                    value,
                } => Row::new(
                    REGISTRY_SEARCH,
                    id.clone(),
                    vec![
                        Value::Text(variable.clone()),
                        Value::Text(root.clone()),
                        Value::Text(key.clone()),
                        Value::Text(value.clone()),
                    ],
                ),
                PrereqSearch::Product {
                    id,
                    variable,
                    upgrade_code,
                    condition,
                } => Row::new(
                    PRODUCT_SEARCH,
                    id.clone(),
                    vec![
                        Value::Text(variable.clone()),
                        Value::Text(upgrade_code.clone()),
                        match condition {
                            Some(text) => Value::Text(text.clone()),
                            None => Value::Null,
                        },
                    ],
                ),
            };
            section = section.with_row(row);
        }

        Ok(section)
    }
}
