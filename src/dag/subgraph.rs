use super::{Dag, DagNode};

use std::collections::BTreeSet;

/// A node-induced subgraph of a [`Dag`].
///
/// Only the root and the node set are stored; edges are those of the owning DAG restricted to
/// `nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subgraph<N: Ord> {
    pub root: N,
    pub nodes: BTreeSet<N>,
}

impl<N: DagNode> Subgraph<N> {
    pub fn new(root: N, nodes: BTreeSet<N>) -> Self {
        Subgraph { root, nodes }
    }

    /// The subgraph made of `root` alone.
    pub fn singleton(root: N) -> Self {
        let nodes = BTreeSet::from([root.clone()]);
        Subgraph { root, nodes }
    }

    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges of `dag` with both endpoints in this subgraph.
    pub fn edges<'a>(&'a self, dag: &'a Dag<N>) -> impl Iterator<Item = (&'a N, &'a N)> + 'a {
        self.nodes.iter().flat_map(move |from| {
            dag.children(from)
                .iter()
                .filter(move |to| self.nodes.contains(*to))
                .map(move |to| (from, to))
        })
    }
}
