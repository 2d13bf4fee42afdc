//! Cross-section symbol resolution.
//!
//! Resolution is a bounded fixed-point pass: binding an action registers its
//! platform-qualified identity as a new symbol, which may satisfy references
//! that could not resolve on an earlier pass. Exiting the loop with pending
//! references remaining is reported as an error, never treated as success.

use rustc_hash::{FxHashMap, FxHashSet};
use setld_model::{CustomAction, OrderTarget, Platform, Row, SequencingConstraint, Value, standard};
use setld_result::{Error, Report};

use crate::merge::MergedModel;
use crate::options::LinkOptions;
use crate::symbols::{Lookup, SymbolTable};

/// An action whose architecture binding and binary source have resolved.
#[derive(Clone, Debug)]
pub struct BoundAction {
    pub module: String,
    pub decl: usize,
    pub action: CustomAction,
    /// The platform chosen by the action's binding policy for this build.
    pub platform: Platform,
    /// Fully qualified identifier of the resolved binary source.
    pub source_qualified: String,
}

impl BoundAction {
    /// The emitted identifier of the action, carrying its platform qualifier.
    pub fn qualified_id(&self) -> String {
        format!("{}_{}", self.action.id, self.platform.suffix())
    }
}

/// The resolved model handed to the scheduler and emitter.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved rows: reference columns rewritten to qualified identifiers,
    /// architecture variants that no resolution selected dropped.
    pub rows: Vec<Row>,
    /// Bound actions in canonical declaration order.
    pub actions: Vec<BoundAction>,
}

struct PendingRef {
    row_idx: usize,
    col_idx: usize,
    column: String,
    target_table: String,
    target_id: String,
}

/// Resolve every reference column and action binding in the merged model.
///
/// All detectable errors are pushed into `report`; the returned resolution is
/// only meaningful when the report stays empty.
pub fn resolve(model: &MergedModel, options: &LinkOptions, report: &mut Report) -> Resolution {
    validate_action_wiring(model, report);

    let mut symbols = SymbolTable::new();
    for merged in &model.rows {
        match merged.row.arch {
            None => symbols.insert_plain(&merged.row.table, &merged.row.id),
            Some(platform) => symbols.insert_variant(
                &merged.row.table,
                &merged.row.id,
                platform,
                merged.row.default_variant,
            ),
        }
    }

    let mut rows: Vec<Row> = model.rows.iter().map(|m| m.row.clone()).collect();
    let mut pending = collect_pending(model, &rows);

    let mut bound: Vec<Option<BoundAction>> = (0..model.actions.len()).map(|_| None).collect();
    let mut unbound: Vec<usize> = (0..model.actions.len()).collect();
    let mut used: FxHashSet<(String, String, Platform)> = FxHashSet::default();

    let mut pass = 0usize;
    loop {
        pass += 1;
        let mut progress = false;

        pending.retain(|p| {
            let target = match symbols.lookup(&p.target_table, &p.target_id, None) {
                Lookup::Resolved(target) => Some((target.qualified_id.clone(), target.arch)),
                _ => None,
            };
            let Some((qualified, arch)) = target else {
                return true;
            };
            if let Some(arch) = arch {
                used.insert((p.target_table.clone(), p.target_id.clone(), arch));
            }
            rows[p.row_idx].values[p.col_idx] = Value::Id(qualified);
            progress = true;
            false
        });

        unbound.retain(|&idx| {
            let merged = &model.actions[idx];
            let platform = merged.action.binding.bound_platform(options.platform);
            let target = match symbols.lookup(standard::BINARY, &merged.action.source, Some(platform))
            {
                Lookup::Resolved(target) => Some((target.qualified_id.clone(), target.arch)),
                _ => None,
            };
            let Some((source_qualified, source_arch)) = target else {
                return true;
            };
            if let Some(arch) = source_arch {
                used.insert((
                    standard::BINARY.to_string(),
                    merged.action.source.clone(),
                    arch,
                ));
            }
            symbols.insert_variant(standard::CUSTOM_ACTION, &merged.action.id, platform, false);
            tracing::trace!(action = %merged.action.id, %platform, "bound action");
            bound[idx] = Some(BoundAction {
                module: merged.module.clone(),
                decl: merged.decl,
                action: merged.action.clone(),
                platform,
                source_qualified,
            });
            progress = true;
            false
        });

        tracing::debug!(
            pass,
            unbound = unbound.len(),
            pending = pending.len(),
            "resolution pass complete"
        );

        if (unbound.is_empty() && pending.is_empty())
            || !progress
            || pass >= options.max_resolve_passes
        {
            break;
        }
    }

    for idx in unbound {
        let merged = &model.actions[idx];
        report.push(Error::UnresolvedSymbol {
            table: standard::CUSTOM_ACTION.into(),
            row: merged.action.id.clone(),
            column: standard::ACTION_SOURCE_COLUMN.into(),
            target_table: standard::BINARY.into(),
            target: merged.action.source.clone(),
        });
    }
    for p in pending {
        let row = &rows[p.row_idx];
        let error = match symbols.lookup(&p.target_table, &p.target_id, None) {
            Lookup::Ambiguous => Error::AmbiguousSymbol {
                table: row.table.clone(),
                row: row.id.clone(),
                column: p.column,
                target_table: p.target_table,
                target: p.target_id,
            },
            _ => Error::UnresolvedSymbol {
                table: row.table.clone(),
                row: row.id.clone(),
                column: p.column,
                target_table: p.target_table,
                target: p.target_id,
            },
        };
        report.push(error);
    }

    // Architecture variants are alternatives, not content: only the variants
    // some resolution actually selected appear in the output.
    let rows = rows
        .into_iter()
        .filter(|row| match row.arch {
            None => true,
            Some(arch) => used.contains(&(row.table.clone(), row.id.clone(), arch)),
        })
        .collect();

    Resolution {
        rows,
        actions: bound.into_iter().flatten().collect(),
    }
}

fn collect_pending(model: &MergedModel, rows: &[Row]) -> Vec<PendingRef> {
    let mut pending = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let Some(schema) = model.schemas.get(&row.table) else {
            continue;
        };
        for (col_idx, column, target_table) in schema.reference_columns() {
            let Some(value) = row.values.get(col_idx) else {
                continue;
            };
            if let Some(target_id) = value.as_id() {
                pending.push(PendingRef {
                    row_idx,
                    col_idx,
                    column: column.name.clone(),
                    target_table: target_table.to_string(),
                    target_id: target_id.to_string(),
                });
            }
        }
    }
    pending
}

/// Structural checks on rollback pairing and constraint targets. These are
/// stable facts about the merged action set, so they run once, before the
/// fixed-point loop.
fn validate_action_wiring(model: &MergedModel, report: &mut Report) {
    let mut by_id: FxHashMap<&str, &CustomAction> = FxHashMap::default();
    for merged in &model.actions {
        by_id.entry(merged.action.id.as_str()).or_insert(&merged.action);
    }

    let mut claimed: FxHashMap<&str, &str> = FxHashMap::default();
    for merged in &model.actions {
        let action = &merged.action;

        if action.flags.is_rollback() {
            if !action.constraints.is_empty() {
                report.push(Error::SchemaViolation(format!(
                    "rollback action '{}' declares ordering constraints; its placement is \
                     derived from its forward pair",
                    action.id
                )));
            }
            if action.rollback.is_some() {
                report.push(Error::SchemaViolation(format!(
                    "rollback action '{}' cannot itself pair a rollback action",
                    action.id
                )));
            }
            continue;
        }

        if let Some(rollback_id) = &action.rollback {
            match by_id.get(rollback_id.as_str()) {
                None => report.push(Error::SchemaViolation(format!(
                    "action '{}' pairs rollback action '{}', which does not exist",
                    action.id, rollback_id
                ))),
                Some(rollback) => {
                    if !rollback.flags.is_rollback() {
                        report.push(Error::SchemaViolation(format!(
                            "action '{}' pairs '{}', which is not flagged as a rollback action",
                            action.id, rollback_id
                        )));
                    }
                    if rollback.binding != action.binding {
                        report.push(Error::SchemaViolation(format!(
                            "rollback action '{}' declares a different architecture-binding \
                             policy than its forward action '{}'",
                            rollback_id, action.id
                        )));
                    }
                    if let Some(first) = claimed.insert(rollback_id.as_str(), action.id.as_str()) {
                        report.push(Error::SchemaViolation(format!(
                            "rollback action '{}' is paired by both '{}' and '{}'",
                            rollback_id, first, action.id
                        )));
                    }
                }
            }
        }

        for constraint in &action.constraints {
            let target = match constraint {
                SequencingConstraint::Before(OrderTarget::Action(id))
                | SequencingConstraint::After(OrderTarget::Action(id)) => id,
                _ => continue,
            };
            match by_id.get(target.as_str()) {
                None => report.push(Error::UnresolvedSymbol {
                    table: standard::CUSTOM_ACTION.into(),
                    row: action.id.clone(),
                    column: standard::ACTION_CONSTRAINT_COLUMN.into(),
                    target_table: standard::CUSTOM_ACTION.into(),
                    target: target.clone(),
                }),
                Some(other) if other.flags.is_rollback() => {
                    report.push(Error::SchemaViolation(format!(
                        "action '{}' orders itself against rollback action '{}'",
                        action.id, target
                    )));
                }
                Some(_) => {}
            }
        }
    }

    for merged in &model.actions {
        if merged.action.flags.is_rollback() && !claimed.contains_key(merged.action.id.as_str()) {
            report.push(Error::SchemaViolation(format!(
                "rollback action '{}' has no forward pair",
                merged.action.id
            )));
        }
    }
}
