//! Table emission: a pure projection of the resolved, sequenced model.
//!
//! The emitter groups rows by table, orders each table by qualified primary
//! key (or by the scheduler-assigned position for the sequence tables), and
//! synthesizes the `CustomAction` and sequence tables from the bound actions.
//! It makes no decisions and has no failure modes of its own, which is what
//! pins down the output-determinism guarantee at the final boundary.

use std::collections::BTreeMap;

use setld_model::{Placement, ResolvedPackageModel, Row, Value, standard};

use crate::resolve::Resolution;
use crate::schedule::Schedule;

/// Project the resolution and schedule into the final package model.
pub fn emit(resolution: &Resolution, schedule: &Schedule) -> ResolvedPackageModel {
    let mut tables: BTreeMap<String, Vec<Row>> = BTreeMap::new();

    for row in &resolution.rows {
        tables.entry(row.table.clone()).or_default().push(row.clone());
    }

    for bound in &resolution.actions {
        let mut row = Row::new(
            standard::CUSTOM_ACTION,
            bound.action.id.clone(),
            vec![
                Value::Int(bound.action.flags.bits() as i64),
                Value::Id(bound.source_qualified.clone()),
                Value::Text(bound.action.entry_point.clone()),
                condition_value(&bound.action.condition),
            ],
        );
        row = row.with_arch(bound.platform);
        tables
            .entry(standard::CUSTOM_ACTION.to_string())
            .or_default()
            .push(row);
    }

    for rows in tables.values_mut() {
        rows.sort_by(|a, b| a.qualified_id().cmp(&b.qualified_id()));
    }

    tables.insert(
        standard::EXECUTE_SEQUENCE.to_string(),
        sequence_rows(standard::EXECUTE_SEQUENCE, &schedule.forward),
    );
    tables.insert(
        standard::ROLLBACK_SEQUENCE.to_string(),
        sequence_rows(standard::ROLLBACK_SEQUENCE, &schedule.rollback),
    );

    ResolvedPackageModel::new(tables, schedule.forward.clone(), schedule.rollback.clone())
}

fn sequence_rows(table: &str, placements: &[Placement]) -> Vec<Row> {
    placements
        .iter()
        .map(|placement| {
            Row::new(
                table,
                placement.action.clone(),
                vec![
                    condition_value(&placement.condition),
                    Value::Int(placement.sequence as i64),
                ],
            )
        })
        .collect()
}

fn condition_value(condition: &Option<String>) -> Value {
    match condition {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}
