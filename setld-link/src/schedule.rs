//! Deterministic sequence assignment for custom actions.
//!
//! The scheduler numbers forward actions topologically within the numeric
//! ranges bounded by the anchors that constrain them, breaking ties by
//! canonical declaration order and then identifier so output is reproducible
//! independent of module load order. Rollback placement is a second, explicit
//! ordering derived from the forward one: among all paired actions, the last
//! forward action run is the first one undone.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use setld_model::{Anchor, OrderTarget, Placement, Sequence, SequencingConstraint};
use setld_result::{Error, Result};

use crate::graph::{ConstraintGraph, ConstraintGraphBuilder, Node};
use crate::options::LinkOptions;
use crate::resolve::{BoundAction, Resolution};

/// The assigned forward and rollback execution orderings.
#[derive(Debug, Default)]
pub struct Schedule {
    /// Forward placements, ascending by sequence.
    pub forward: Vec<Placement>,
    /// Rollback-execution ordering: the first entry is the first action
    /// undone.
    pub rollback: Vec<Placement>,
}

/// Assign sequence positions to every forward action and derive the rollback
/// ordering. Fails fast on the first cycle or anchor overflow.
pub fn schedule(resolution: &Resolution, options: &LinkOptions) -> Result<Schedule> {
    let forwards: Vec<&BoundAction> = resolution
        .actions
        .iter()
        .filter(|a| !a.action.flags.is_rollback())
        .collect();
    let by_id: FxHashMap<&str, &BoundAction> = resolution
        .actions
        .iter()
        .map(|a| (a.action.id.as_str(), a))
        .collect();

    let graph = build_graph(&forwards, options)?;
    let upper_bounds = upper_bounds(&graph, options);
    let forward = number_forward(&graph, &forwards, &upper_bounds, options)?;
    let rollback = derive_rollback(&forward, &by_id)?;

    tracing::debug!(
        forward = forward.len(),
        rollback = rollback.len(),
        "schedule assigned"
    );
    Ok(Schedule { forward, rollback })
}

fn build_graph(forwards: &[&BoundAction], options: &LinkOptions) -> Result<ConstraintGraph> {
    let mut builder = ConstraintGraphBuilder::new();

    let anchors = options.anchors.ordered();
    for (anchor, _) in anchors {
        builder.add_node(Node::Anchor(*anchor));
    }
    for pair in anchors.windows(2) {
        builder.add_edge(Node::Anchor(pair[0].0), Node::Anchor(pair[1].0));
    }

    for bound in forwards {
        let node = Node::Action(bound.action.id.clone());
        builder.add_node(node.clone());

        let mut anchor_constrained = false;
        for constraint in &bound.action.constraints {
            match constraint {
                SequencingConstraint::Before(OrderTarget::Action(other)) => {
                    builder.add_edge(node.clone(), Node::Action(other.clone()));
                }
                SequencingConstraint::After(OrderTarget::Action(other)) => {
                    builder.add_edge(Node::Action(other.clone()), node.clone());
                }
                SequencingConstraint::Before(OrderTarget::Anchor(anchor)) => {
                    builder.add_edge(node.clone(), Node::Anchor(*anchor));
                    anchor_constrained = true;
                }
                SequencingConstraint::After(OrderTarget::Anchor(anchor)) => {
                    builder.add_edge(Node::Anchor(*anchor), node.clone());
                    anchor_constrained = true;
                }
            }
        }

        // Implicit boundary defaults: immediate dispatchers run between cost
        // finalization and the install transaction; deferred work runs inside
        // the transaction.
        if !anchor_constrained {
            let (lower, upper) = if bound.action.flags.is_immediate() {
                (Anchor::CostFinalize, Anchor::InstallInitialize)
            } else {
                (Anchor::InstallInitialize, Anchor::InstallFinalize)
            };
            builder.add_edge(Node::Anchor(lower), node.clone());
            builder.add_edge(node, Node::Anchor(upper));
        }
    }

    builder.finish()
}

/// For every node, the nearest anchor it must precede, if any.
fn upper_bounds(
    graph: &ConstraintGraph,
    options: &LinkOptions,
) -> Vec<Option<(Anchor, Sequence)>> {
    let mut bounds: Vec<Option<(Anchor, Sequence)>> = vec![None; graph.node_count()];
    // Ascending anchor order, so the first bound recorded is the nearest.
    for (anchor, position) in options.anchors.ordered() {
        let anchor_idx = (0..graph.node_count())
            .find(|&idx| matches!(graph.node(idx), Node::Anchor(a) if a == anchor));
        let Some(anchor_idx) = anchor_idx else {
            continue;
        };
        let reaching = graph.reaching(anchor_idx);
        for (idx, can_reach) in reaching.iter().enumerate() {
            if *can_reach && idx != anchor_idx && bounds[idx].is_none() {
                bounds[idx] = Some((*anchor, *position));
            }
        }
    }
    bounds
}

/// Ready-set key: anchors in position order ahead of actions in declaration
/// order, which fixes the numbering independent of hash iteration.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum ReadyKey {
    Anchor(Sequence, usize),
    Action(usize, String, usize),
}

fn number_forward(
    graph: &ConstraintGraph,
    forwards: &[&BoundAction],
    upper_bounds: &[Option<(Anchor, Sequence)>],
    options: &LinkOptions,
) -> Result<Vec<Placement>> {
    let by_id: FxHashMap<&str, &BoundAction> = forwards
        .iter()
        .map(|bound| (bound.action.id.as_str(), *bound))
        .collect();

    let ready_key = |idx: usize| -> Result<ReadyKey> {
        match graph.node(idx) {
            Node::Anchor(anchor) => Ok(ReadyKey::Anchor(options.anchors.position(*anchor), idx)),
            Node::Action(id) => {
                let bound = by_id.get(id.as_str()).ok_or_else(|| {
                    Error::Internal(format!("graph names unknown action '{id}'"))
                })?;
                Ok(ReadyKey::Action(bound.decl, id.clone(), idx))
            }
        }
    };

    let mut degrees = graph.in_degrees();
    let mut ready: BTreeSet<ReadyKey> = BTreeSet::new();
    for (idx, &degree) in degrees.iter().enumerate() {
        if degree == 0 {
            ready.insert(ready_key(idx)?);
        }
    }

    let mut placements = Vec::with_capacity(forwards.len());
    let mut counter: Sequence = 0;
    let mut last_anchor = "start";
    let mut processed = 0usize;

    while let Some(key) = ready.pop_first() {
        let idx = match key {
            ReadyKey::Anchor(_, idx) | ReadyKey::Action(_, _, idx) => idx,
        };
        processed += 1;

        match graph.node(idx) {
            Node::Anchor(anchor) => {
                counter = counter.max(options.anchors.position(*anchor));
                last_anchor = anchor.name();
                tracing::trace!(anchor = %anchor, position = counter, "passed anchor");
            }
            Node::Action(id) => {
                let bound = by_id.get(id.as_str()).ok_or_else(|| {
                    Error::Internal(format!("graph names unknown action '{id}'"))
                })?;
                let sequence = counter + 1;
                if let Some((upper, position)) = upper_bounds[idx] {
                    if sequence >= position {
                        return Err(Error::AnchorOverflow {
                            lower: last_anchor.to_string(),
                            upper: upper.name().to_string(),
                            action: id.clone(),
                        });
                    }
                }
                tracing::trace!(action = %id, sequence, "placed action");
                placements.push(Placement {
                    action: bound.qualified_id(),
                    condition: bound.action.condition.clone(),
                    sequence,
                });
                counter = sequence;
            }
        }

        for &next in graph.successors(idx) {
            degrees[next] -= 1;
            if degrees[next] == 0 {
                ready.insert(ready_key(next)?);
            }
        }
    }

    if processed != graph.node_count() {
        return Err(Error::Internal(
            "constraint graph changed under the scheduler".into(),
        ));
    }
    Ok(placements)
}

/// Stack-unwind semantics over the forward ordering: walk the paired forward
/// actions from last to first and number their rollback partners 1..n.
fn derive_rollback(
    forward: &[Placement],
    by_id: &FxHashMap<&str, &BoundAction>,
) -> Result<Vec<Placement>> {
    // Placement ids are qualified; recover the pairs from the bound actions.
    let by_qualified: FxHashMap<String, &BoundAction> = by_id
        .values()
        .map(|bound| (bound.qualified_id(), *bound))
        .collect();

    let mut rollback = Vec::new();
    let mut next: Sequence = 1;
    for placement in forward.iter().rev() {
        let Some(bound) = by_qualified.get(&placement.action) else {
            return Err(Error::Internal(format!(
                "forward placement '{}' has no bound action",
                placement.action
            )));
        };
        let Some(rollback_id) = &bound.action.rollback else {
            continue;
        };
        let Some(partner) = by_id.get(rollback_id.as_str()) else {
            return Err(Error::Internal(format!(
                "rollback action '{rollback_id}' was not bound"
            )));
        };
        rollback.push(Placement {
            action: partner.qualified_id(),
            condition: partner.action.condition.clone(),
            sequence: next,
        });
        next += 1;
    }
    Ok(rollback)
}
