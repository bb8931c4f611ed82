use crate::dag::{Dag, DagNode, Subgraph};

use std::collections::BTreeSet;
use std::fmt;

/// A [`Subgraph`] together with the nodes chosen as variable positions.
///
/// Everything reachable from the subgraph root only through a variable is abstracted away; the
/// rest is the mapping's *content*, which is what structural cost functions compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping<'g, N: DagNode> {
    pub graph: &'g Dag<N>,
    pub subgraph: Subgraph<N>,
    pub variables: Vec<N>,
}

impl<'g, N: DagNode> Mapping<'g, N> {
    pub fn new(graph: &'g Dag<N>, subgraph: Subgraph<N>, variables: Vec<N>) -> Self {
        Mapping {
            graph,
            subgraph,
            variables,
        }
    }

    pub fn root(&self) -> &N {
        &self.subgraph.root
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Index of `node` among the variables, if it is one.
    pub fn variable_index(&self, node: &N) -> Option<usize> {
        self.variables.iter().position(|v| v == node)
    }

    /// Subgraph nodes reachable from the root without entering a variable. Variables are not
    /// part of the content.
    pub fn content(&self) -> BTreeSet<N> {
        let mut content = BTreeSet::new();
        let mut frontier = vec![self.root()];

        while let Some(node) = frontier.pop() {
            if content.contains(node)
                || !self.subgraph.contains(node)
                || self.variable_index(node).is_some()
            {
                continue;
            }
            content.insert(node.clone());
            frontier.extend(self.graph.children(node));
        }

        content
    }

    /// Edges of the graph with both endpoints in [`Mapping::content`].
    pub fn content_edges(&self) -> Vec<(N, N)> {
        let content = &self.content();
        content
            .iter()
            .flat_map(|from| {
                self.graph
                    .children(from)
                    .iter()
                    .filter(move |to| content.contains(*to))
                    .map(move |to| (from.clone(), to.clone()))
            })
            .collect()
    }
}

/// Renders the mapping as an s-expression. Variables print as `?x<i>`, followed by `|<node>`
/// when the abstracted node has children:
///
/// ```text
///        a
///       / \
///       b c          ( a ?x0|b ( c e ) )   with variables [b]
///       | |
///       d e
/// ```
impl<N: DagNode + fmt::Display> fmt::Display for Mapping<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root())
    }
}

impl<N: DagNode + fmt::Display> Mapping<'_, N> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, node: &N) -> fmt::Result {
        if let Some(index) = self.variable_index(node) {
            write!(f, "?x{index}")?;
            if !self.graph.is_leaf(node) {
                write!(f, "|{node}")?;
            }
            return Ok(());
        }

        if self.graph.is_leaf(node) {
            return write!(f, "{node}");
        }

        write!(f, "( {node} ")?;
        for child in self
            .graph
            .children(node)
            .iter()
            .filter(|c| self.subgraph.contains(c))
        {
            self.write_node(f, child)?;
            write!(f, " ")?;
        }
        write!(f, ")")
    }
}
