//! Rooted directed acyclic graphs stored as ordered adjacency lists.
//!
//! A [`Dag`] is immutable once constructed. Construction checks the invariants every other
//! module relies on: the root is a node, every child is itself a node, and there is no
//! directed cycle.
//!
//! ```text
//!        a
//!       / \
//!       b c
//!       | |
//!       d e
//! ```
//!
//! ```rust
//! use alignment_hypergraphs::dag::Dag;
//!
//! let dag = Dag::new("a", [
//!     ("a", vec!["b", "c"]),
//!     ("b", vec!["d"]),
//!     ("c", vec!["e"]),
//!     ("d", vec![]),
//!     ("e", vec![]),
//! ]).unwrap();
//!
//! assert_eq!(dag.children(&"a"), &["b", "c"]);
//! assert_eq!(dag.post_order(dag.root()), vec!["d", "b", "e", "c", "a"]);
//! ```
pub mod subgraph;

pub use subgraph::*;

use crate::error::{Error, Result};

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds required of DAG node identifiers.
pub trait DagNode: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> DagNode for T {}

/// A rooted DAG.
///
/// Children are kept in the order they were supplied; that order is observable through
/// [`Dag::children`], [`Dag::post_order`] and the s-expression rendering of mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dag<N: DagNode> {
    root: N,
    links: BTreeMap<N, Vec<N>>,
    edge_labels: BTreeMap<String, BTreeSet<(N, N)>>,
    labels_by_edge: BTreeMap<(N, N), BTreeSet<String>>,
}

impl<N: DagNode> Dag<N> {
    /// Build a DAG from a root and an adjacency mapping `node -> children`.
    ///
    /// Every child must also appear as a key (leaves map to an empty list).
    pub fn new<I, C>(root: N, links: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        C: IntoIterator<Item = N>,
    {
        let mut map = BTreeMap::new();
        for (node, children) in links {
            let children: Vec<N> = children.into_iter().collect();
            if map.insert(node.clone(), children).is_some() {
                return Err(Error::invalid(format!(
                    "node {node:?} has two adjacency entries"
                )));
            }
        }

        if !map.contains_key(&root) {
            return Err(Error::invalid(format!(
                "the root {root:?} does not belong to the graph"
            )));
        }

        for (node, children) in map.iter() {
            let mut seen = BTreeSet::new();
            for child in children {
                if !map.contains_key(child) {
                    return Err(Error::invalid(format!(
                        "child {child:?} of {node:?} has no adjacency entry"
                    )));
                }
                if !seen.insert(child) {
                    return Err(Error::invalid(format!(
                        "child {child:?} listed twice under {node:?}"
                    )));
                }
            }
        }

        if !is_acyclic(&map) {
            return Err(Error::invalid("the graph contains a directed cycle"));
        }

        Ok(Dag {
            root,
            links: map,
            edge_labels: BTreeMap::new(),
            labels_by_edge: BTreeMap::new(),
        })
    }

    /// Build a DAG from `(from, to)` pairs. Nodes without outgoing edges are added as leaves.
    pub fn from_pairs(root: N, pairs: impl IntoIterator<Item = (N, N)>) -> Result<Self> {
        let mut links: BTreeMap<N, Vec<N>> = BTreeMap::new();
        links.entry(root.clone()).or_default();
        for (from, to) in pairs {
            links.entry(to.clone()).or_default();
            links.entry(from).or_default().push(to);
        }
        Self::new(root, links)
    }

    /// Attach edge labels, given as `label -> set of (from, to)` edges.
    ///
    /// Fails if a labelled edge is not an edge of the graph.
    pub fn with_edge_labels<I, L, E>(mut self, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, E)>,
        L: Into<String>,
        E: IntoIterator<Item = (N, N)>,
    {
        for (label, edges) in labels {
            let label = label.into();
            for (from, to) in edges {
                if !self.children(&from).contains(&to) {
                    return Err(Error::invalid(format!(
                        "labelled edge {from:?} -> {to:?} is not in the graph"
                    )));
                }
                self.labels_by_edge
                    .entry((from.clone(), to.clone()))
                    .or_default()
                    .insert(label.clone());
                self.edge_labels
                    .entry(label.clone())
                    .or_default()
                    .insert((from, to));
            }
        }
        Ok(self)
    }

    pub fn root(&self) -> &N {
        &self.root
    }

    /// Number of nodes (keys of the adjacency mapping).
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.links.contains_key(node)
    }

    /// All nodes, in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.links.keys()
    }

    /// Children of `node` in insertion order. Unknown nodes have no children.
    pub fn children(&self, node: &N) -> &[N] {
        self.links.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_leaf(&self, node: &N) -> bool {
        self.children(node).is_empty()
    }

    /// Every edge `(from, to)`, grouped by source node in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.links
            .iter()
            .flat_map(|(from, children)| children.iter().map(move |to| (from, to)))
    }

    /// The label -> edges mapping supplied with [`Dag::with_edge_labels`].
    pub fn edge_labels(&self) -> &BTreeMap<String, BTreeSet<(N, N)>> {
        &self.edge_labels
    }

    /// Labels attached to the edge `from -> to`.
    pub fn labels_of(&self, from: &N, to: &N) -> impl Iterator<Item = &str> {
        self.labels_by_edge
            .get(&(from.clone(), to.clone()))
            .into_iter()
            .flat_map(|labels| labels.iter().map(String::as_str))
    }

    /// Proper descendants of `node`.
    pub fn descendants(&self, node: &N) -> BTreeSet<N> {
        self.distances_from(node).into_keys().collect()
    }

    /// Minimum edge distance from `node` to each of its proper descendants (breadth-first).
    pub fn distances_from(&self, node: &N) -> BTreeMap<N, usize> {
        let mut distances = BTreeMap::new();
        let mut frontier: VecDeque<(&N, usize)> =
            self.children(node).iter().map(|c| (c, 1)).collect();

        while let Some((current, depth)) = frontier.pop_front() {
            if distances.contains_key(current) {
                continue;
            }
            distances.insert(current.clone(), depth);
            frontier.extend(self.children(current).iter().map(|c| (c, depth + 1)));
        }

        distances
    }

    /// Nodes reachable from `start` (inclusive) in depth-first post-order: every node appears
    /// after all of its descendants, so the result runs from the leaves up to `start`.
    pub fn post_order(&self, start: &N) -> Vec<N> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }

        let mut visited = BTreeSet::new();
        visited.insert(start.clone());
        // (node, index of the next child to visit)
        let mut stack: Vec<(&N, usize)> = vec![(start, 0)];

        while let Some((node, next)) = stack.pop() {
            let children = self.children(node);
            if next < children.len() {
                stack.push((node, next + 1));
                let child = &children[next];
                if visited.insert(child.clone()) {
                    stack.push((child, 0));
                }
            } else {
                order.push(node.clone());
            }
        }

        order
    }
}

/// Kahn's algorithm: the graph is acyclic iff every node can be removed in topological order.
fn is_acyclic<N: DagNode>(links: &BTreeMap<N, Vec<N>>) -> bool {
    let mut indegree: BTreeMap<&N, usize> = links.keys().map(|n| (n, 0)).collect();
    for child in links.values().flatten() {
        if let Some(d) = indegree.get_mut(child) {
            *d += 1;
        }
    }

    let mut frontier: Vec<&N> = indegree
        .iter()
        .filter_map(|(n, d)| (*d == 0).then_some(*n))
        .collect();

    let mut visited = 0;
    while let Some(node) = frontier.pop() {
        visited += 1;
        for child in links.get(node).into_iter().flatten() {
            if let Some(d) = indegree.get_mut(child) {
                *d -= 1;
                if *d == 0 {
                    frontier.push(child);
                }
            }
        }
    }

    visited == links.len()
}
