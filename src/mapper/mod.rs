//! Enumeration of the ways a DAG's substructure can be abstracted behind variables.
//!
//! The [`DagMapper`] produces two things:
//!
//! 1. the *source subgraphs*: one subgraph per node, made of the node and the descendants
//!    within a depth limit, listed from the leaves up to the root;
//! 2. for a subgraph and a variable budget, every legal *placement of variables* inside it.
//!
//! Placing a variable on a node cuts off everything that is only reachable through that
//! node, so no further variable can be placed below it. For the graph
//!
//! ```text
//!     ---a
//!    |  / \
//!    |  b-c
//!    |  | |
//!     --d e
//! ```
//!
//! the placement `[c]` makes `e` unreachable, while `d` is still reachable through `a -> d`.
pub mod mapping;

pub use mapping::*;

use crate::dag::{Dag, DagNode, Subgraph};
use crate::error::{Error, Result};

use std::collections::{BTreeMap, BTreeSet};

/// Enumerates source subgraphs and variable placements for one [`Dag`].
#[derive(Debug, Clone)]
pub struct DagMapper<'g, N: DagNode> {
    dag: &'g Dag<N>,
    // minimum distance from each node reachable from the root to each of its descendants
    successors: BTreeMap<N, BTreeMap<N, usize>>,
}

impl<'g, N: DagNode> DagMapper<'g, N> {
    pub fn new(dag: &'g Dag<N>) -> Self {
        let successors = dag
            .post_order(dag.root())
            .into_iter()
            .map(|node| {
                let distances = dag.distances_from(&node);
                (node, distances)
            })
            .collect();

        DagMapper { dag, successors }
    }

    pub fn dag(&self) -> &'g Dag<N> {
        self.dag
    }

    /// For every node reachable from the root, the minimum distance to each proper descendant.
    /// Leaves map to an empty table.
    pub fn successors(&self) -> &BTreeMap<N, BTreeMap<N, usize>> {
        &self.successors
    }

    /// One subgraph per node reachable from the root: the node plus every descendant at
    /// distance `<= max_depth` (`None` is unbounded).
    ///
    /// Subgraphs are returned leaves first, so any node's subgraph comes after the subgraphs
    /// of all its descendants.
    pub fn source_subgraphs(&self, max_depth: Option<usize>) -> Vec<Subgraph<N>> {
        self.dag
            .post_order(self.dag.root())
            .into_iter()
            .map(|node| {
                let mut nodes = BTreeSet::from([node.clone()]);
                if let Some(distances) = self.successors.get(&node) {
                    nodes.extend(
                        distances
                            .iter()
                            .filter(|(_, d)| max_depth.map_or(true, |max| **d <= max))
                            .map(|(n, _)| n.clone()),
                    );
                }
                Subgraph::new(node, nodes)
            })
            .collect()
    }

    /// Every combination of at most `budget` variable positions below `start`.
    ///
    /// Variables are drawn from `candidates` (the whole graph when `None`), never include
    /// `start`, and each one must be reachable from `start` without passing through the
    /// others. Combinations are returned sorted, so permutations of the same set collapse.
    pub fn variable_mappings(
        &self,
        start: &N,
        budget: usize,
        candidates: Option<&BTreeSet<N>>,
    ) -> Result<BTreeSet<Vec<N>>> {
        if budget == 0 {
            return Err(Error::invalid("incorrect number of variables to assign"));
        }
        if !self.dag.contains(start) {
            return Err(Error::invalid(format!(
                "the start node {start:?} does not belong to the graph"
            )));
        }

        let mut available: BTreeSet<N> = match candidates {
            Some(candidates) => candidates.clone(),
            None => self.dag.nodes().cloned().collect(),
        };
        available.remove(start);

        let start_children = self.dag.children(start);
        let mut solutions = BTreeSet::new();
        // canonical combinations whose extensions have already been scheduled
        let mut expanded = BTreeSet::new();

        // (nodes that may still hold a variable, variables placed so far in pick order)
        let mut frontier = vec![(self.selectable_nodes(start, &available), Vec::new())];

        while let Some((selectable, placed)) = frontier.pop() {
            if placed.len() >= budget {
                continue;
            }

            for node in selectable.iter() {
                let mut remaining = selectable.clone();
                remaining.remove(node);
                let next = self.selectable_nodes(start, &remaining);

                let mut combination: Vec<N> = placed.clone();
                combination.push(node.clone());
                let mut canonical = combination.clone();
                canonical.sort();
                solutions.insert(canonical.clone());

                // Only a variable placed directly under `start` can be followed by more
                // variables; placing one deeper ends the combination.
                if next.is_empty() || !start_children.contains(node) {
                    continue;
                }
                if expanded.insert(canonical) {
                    frontier.push((next, combination));
                }
            }
        }

        Ok(solutions)
    }

    /// All mappings with up to `budget` variables (`None` means as many as there are nodes)
    /// over every source subgraph of depth `max_depth`, leaves first.
    pub fn all_variable_mappings(
        &self,
        budget: Option<usize>,
        max_depth: Option<usize>,
    ) -> Result<Vec<Mapping<'g, N>>> {
        let budget = budget.unwrap_or(self.dag.len());
        let mut mappings = Vec::new();

        for subgraph in self.source_subgraphs(max_depth) {
            let combinations =
                self.variable_mappings(&subgraph.root, budget, Some(&subgraph.nodes))?;
            for variables in combinations {
                mappings.push(Mapping::new(self.dag, subgraph.clone(), variables));
            }
        }

        tracing::trace!(count = mappings.len(), "generated variable mappings");
        Ok(mappings)
    }

    /// Nodes of `available` reachable from the children of `start` through `available` only.
    fn selectable_nodes(&self, start: &N, available: &BTreeSet<N>) -> BTreeSet<N> {
        let mut reachable = BTreeSet::new();
        let mut frontier: Vec<&N> = self.dag.children(start).iter().collect();

        while let Some(node) = frontier.pop() {
            if !available.contains(node) || reachable.contains(node) {
                continue;
            }
            reachable.insert(node.clone());
            frontier.extend(self.dag.children(node));
        }

        reachable
    }
}
