//! The directed ordering-constraint graph.
//!
//! Nodes are forward action identifiers plus the fixed anchors; edges are the
//! declared before/after constraints and the anchor chain. The builder
//! validates acyclicity in `finish`, so a [`ConstraintGraph`] is a DAG by
//! construction.

use rustc_hash::FxHashMap;
use setld_model::Anchor;
use setld_result::{Error, Result};

/// A node of the constraint graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Anchor(Anchor),
    Action(String),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Anchor(anchor) => anchor.name(),
            Node::Action(id) => id,
        }
    }
}

/// Builder over nodes and edges; `finish` rejects cyclic graphs.
#[derive(Debug, Default)]
pub struct ConstraintGraphBuilder {
    nodes: Vec<Node>,
    index: FxHashMap<Node, usize>,
    edges: Vec<Vec<usize>>,
}

impl ConstraintGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if absent, returning its index. Insertion order is the
    /// canonical order, which keeps cycle reports deterministic.
    pub fn add_node(&mut self, node: Node) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.clone(), idx);
        self.nodes.push(node);
        self.edges.push(Vec::new());
        idx
    }

    /// Add a `from` runs-before `to` edge, creating missing nodes.
    pub fn add_edge(&mut self, from: Node, to: Node) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        if !self.edges[from].contains(&to) {
            self.edges[from].push(to);
        }
    }

    /// Validate acyclicity and seal the graph. A cycle aborts immediately:
    /// scheduling decisions are meaningless once the graph is known to be
    /// inconsistent.
    pub fn finish(self) -> Result<ConstraintGraph> {
        let graph = ConstraintGraph {
            nodes: self.nodes,
            edges: self.edges,
        };
        if let Some(cycle) = graph.find_cycle() {
            return Err(Error::ConflictingOrderingConstraint {
                cycle: cycle
                    .into_iter()
                    .map(|idx| graph.nodes[idx].name().to_string())
                    .collect(),
            });
        }
        Ok(graph)
    }
}

/// A validated, acyclic ordering-constraint graph.
#[derive(Debug)]
pub struct ConstraintGraph {
    nodes: Vec<Node>,
    edges: Vec<Vec<usize>>,
}

impl ConstraintGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.edges[idx]
    }

    /// Predecessor-count per node, for Kahn's algorithm.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for targets in &self.edges {
            for &target in targets {
                degrees[target] += 1;
            }
        }
        degrees
    }

    /// First cycle found by depth-first search in canonical node order,
    /// returned as a closed walk (first node repeated at the end).
    fn find_cycle(&self) -> Option<Vec<usize>> {
        const WHITE: u8 = 0;
        const GRAY: u8 = 1;
        const BLACK: u8 = 2;

        let n = self.nodes.len();
        let mut state = vec![WHITE; n];
        for start in 0..n {
            if state[start] != WHITE {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            state[start] = GRAY;
            while let Some(last) = stack.len().checked_sub(1) {
                let (node, child) = stack[last];
                if child < self.edges[node].len() {
                    stack[last].1 += 1;
                    let next = self.edges[node][child];
                    match state[next] {
                        WHITE => {
                            state[next] = GRAY;
                            stack.push((next, 0));
                        }
                        GRAY => {
                            let pos = stack
                                .iter()
                                .position(|&(v, _)| v == next)
                                .unwrap_or(0);
                            let mut cycle: Vec<usize> =
                                stack[pos..].iter().map(|&(v, _)| v).collect();
                            cycle.push(next);
                            return Some(cycle);
                        }
                        _ => {}
                    }
                } else {
                    state[node] = BLACK;
                    stack.pop();
                }
            }
        }
        None
    }

    /// Nodes reachable from `start` following edges forward.
    pub fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(node) = stack.pop() {
            for &next in &self.edges[node] {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen
    }

    /// Nodes that can reach `target` following edges forward.
    pub fn reaching(&self, target: usize) -> Vec<bool> {
        let mut reverse: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (from, targets) in self.edges.iter().enumerate() {
            for &to in targets {
                reverse[to].push(from);
            }
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![target];
        seen[target] = true;
        while let Some(node) = stack.pop() {
            for &prev in &reverse[node] {
                if !seen[prev] {
                    seen[prev] = true;
                    stack.push(prev);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: &str) -> Node {
        Node::Action(id.to_string())
    }

    #[test]
    fn acyclic_graph_finishes() {
        let mut builder = ConstraintGraphBuilder::new();
        builder.add_edge(action("a"), action("b"));
        builder.add_edge(action("b"), action("c"));
        let graph = builder.finish().unwrap();
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn cycle_is_reported_with_every_participant() {
        let mut builder = ConstraintGraphBuilder::new();
        builder.add_edge(action("a"), action("b"));
        builder.add_edge(action("b"), action("c"));
        builder.add_edge(action("c"), action("a"));
        match builder.finish() {
            Err(Error::ConflictingOrderingConstraint { cycle }) => {
                for id in ["a", "b", "c"] {
                    assert!(cycle.iter().any(|n| n == id), "cycle missing '{id}'");
                }
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn reachability_follows_edge_direction() {
        let mut builder = ConstraintGraphBuilder::new();
        let a = builder.add_node(action("a"));
        let c = builder.add_node(action("c"));
        builder.add_edge(action("a"), action("b"));
        builder.add_edge(action("b"), action("c"));
        let graph = builder.finish().unwrap();

        let forward = graph.reachable_from(a);
        assert!(forward[c]);
        let backward = graph.reaching(a);
        assert!(!backward[c]);
    }
}
