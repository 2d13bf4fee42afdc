//! Section merging: one candidate row set plus a duplicate-identifier report.

use rustc_hash::FxHashMap;
use setld_model::{CustomAction, Platform, Row, Section, TableSchema, standard};
use setld_result::{Error, Report};

/// A row annotated with the module that contributed it.
#[derive(Clone, Debug)]
pub struct MergedRow {
    pub module: String,
    pub row: Row,
}

/// An action annotated with its module and canonical declaration index.
///
/// The declaration index is assigned after sections are sorted by module
/// name, so it is a pure function of the section set and serves as the
/// deterministic tie-break during scheduling.
#[derive(Clone, Debug)]
pub struct MergedAction {
    pub module: String,
    pub decl: usize,
    pub action: CustomAction,
}

/// The merged candidate model consumed by the resolver.
#[derive(Debug, Default)]
pub struct MergedModel {
    pub schemas: FxHashMap<String, TableSchema>,
    pub rows: Vec<MergedRow>,
    pub actions: Vec<MergedAction>,
}

#[derive(Default)]
struct Occupancy {
    plain: Option<String>,
    variants: FxHashMap<Platform, String>,
    default_variant: Option<String>,
}

impl Occupancy {
    fn first_module(&self) -> Option<&str> {
        self.plain
            .as_deref()
            .or_else(|| self.variants.values().next().map(String::as_str))
    }
}

/// Merge an unordered collection of sections into one candidate row set.
///
/// Sections are sorted canonically by module name first, so the merged model
/// (and everything derived from it) is independent of the order sections were
/// supplied. Every detectable error is pushed into `report`; rows are never
/// silently dropped from the merged row list.
pub fn merge_sections(sections: &[Section], report: &mut Report) -> MergedModel {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by(|a, b| a.module.cmp(&b.module));

    for pair in ordered.windows(2) {
        if pair[0].module == pair[1].module {
            report.push(Error::SchemaViolation(format!(
                "two sections share the module name '{}'",
                pair[0].module
            )));
        }
    }

    let mut model = MergedModel::default();
    for schema in standard::standard_schemas() {
        model.schemas.insert(schema.name.clone(), schema);
    }

    // Schemas first so every row, whichever section contributed it, is
    // validated against the full merged schema set.
    for section in &ordered {
        for schema in &section.schemas {
            if standard::RESERVED_TABLES.contains(&schema.name.as_str()) {
                report.push(Error::SchemaViolation(format!(
                    "module '{}' redefines the reserved table '{}'",
                    section.module, schema.name
                )));
                continue;
            }
            match model.schemas.get(&schema.name) {
                None => {
                    model.schemas.insert(schema.name.clone(), schema.clone());
                }
                Some(existing) if existing == schema => {}
                Some(_) => report.push(Error::SchemaViolation(format!(
                    "module '{}' redefines table '{}' with a conflicting schema",
                    section.module, schema.name
                ))),
            }
        }
    }

    let mut occupancy: FxHashMap<(String, String), Occupancy> = FxHashMap::default();
    let mut decl = 0usize;

    for section in &ordered {
        tracing::debug!(
            module = %section.module,
            rows = section.rows.len(),
            actions = section.actions.len(),
            "merging section"
        );

        for row in &section.rows {
            if standard::RESERVED_TABLES.contains(&row.table.as_str()) {
                report.push(Error::SchemaViolation(format!(
                    "module '{}' contributes a row to the reserved table '{}'",
                    section.module, row.table
                )));
            } else {
                match model.schemas.get(&row.table) {
                    None => report.push(Error::SchemaViolation(format!(
                        "row {}:{} belongs to a table no module declared",
                        row.table, row.id
                    ))),
                    Some(schema) => {
                        if let Err(error) = schema.validate_row(row) {
                            report.push(error);
                        }
                    }
                }
                if row.default_variant && row.arch.is_none() {
                    report.push(Error::SchemaViolation(format!(
                        "row {}:{} is marked default but is not an architecture variant",
                        row.table, row.id
                    )));
                }
                check_occupancy(&mut occupancy, &section.module, row, report);
            }

            model.rows.push(MergedRow {
                module: section.module.clone(),
                row: row.clone(),
            });
        }

        for action in &section.actions {
            let key = (standard::CUSTOM_ACTION.to_string(), action.id.clone());
            let slot = occupancy.entry(key).or_default();
            match &slot.plain {
                Some(first) => report.push(Error::DuplicateIdentifier {
                    table: standard::CUSTOM_ACTION.into(),
                    id: action.id.clone(),
                    first: first.clone(),
                    second: section.module.clone(),
                }),
                None => slot.plain = Some(section.module.clone()),
            }

            model.actions.push(MergedAction {
                module: section.module.clone(),
                decl,
                action: action.clone(),
            });
            decl += 1;
        }
    }

    tracing::debug!(
        tables = model.schemas.len(),
        rows = model.rows.len(),
        actions = model.actions.len(),
        "merge complete"
    );
    model
}

fn check_occupancy(
    occupancy: &mut FxHashMap<(String, String), Occupancy>,
    module: &str,
    row: &Row,
    report: &mut Report,
) {
    let key = (row.table.clone(), row.id.clone());
    let slot = occupancy.entry(key).or_default();

    match row.arch {
        None => {
            if let Some(first) = slot.first_module() {
                report.push(Error::DuplicateIdentifier {
                    table: row.table.clone(),
                    id: row.id.clone(),
                    first: first.to_string(),
                    second: module.to_string(),
                });
            } else {
                slot.plain = Some(module.to_string());
            }
        }
        Some(platform) => {
            if let Some(first) = &slot.plain {
                report.push(Error::DuplicateIdentifier {
                    table: row.table.clone(),
                    id: row.id.clone(),
                    first: first.clone(),
                    second: module.to_string(),
                });
            } else if let Some(first) = slot.variants.get(&platform) {
                report.push(Error::DuplicateIdentifier {
                    table: row.table.clone(),
                    id: row.id.clone(),
                    first: first.clone(),
                    second: module.to_string(),
                });
            } else {
                slot.variants.insert(platform, module.to_string());
            }
            if row.default_variant {
                if slot.default_variant.is_some() {
                    report.push(Error::SchemaViolation(format!(
                        "row {}:{} has more than one variant marked default",
                        row.table, row.id
                    )));
                } else {
                    slot.default_variant = Some(module.to_string());
                }
            }
        }
    }
}
