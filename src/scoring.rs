//! Cost functions used to weigh node alignments and structural alignments.
//!
//! The comparator only needs the [`Scorer`] capability. [`LabelDistance`] is a small
//! reference scorer over node labels; closures can be used directly through [`FnScorer`].
use crate::dag::{Dag, DagNode};
use crate::mapper::Mapping;

use std::collections::BTreeSet;

/// A node inside a particular DAG.
#[derive(Debug)]
pub struct NodeRef<'g, N: DagNode> {
    pub dag: &'g Dag<N>,
    pub node: &'g N,
}

impl<N: DagNode> Clone for NodeRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: DagNode> Copy for NodeRef<'_, N> {}

impl<'g, N: DagNode> NodeRef<'g, N> {
    pub fn new(dag: &'g Dag<N>, node: &'g N) -> Self {
        NodeRef { dag, node }
    }

    /// The node together with all of its descendants.
    pub fn closure(&self) -> BTreeSet<N> {
        let mut nodes = self.dag.descendants(self.node);
        nodes.insert(self.node.clone());
        nodes
    }
}

/// Weighs candidate alignments. Higher is better.
pub trait Scorer<N: DagNode> {
    /// Weight of aligning node `a` with node `b`.
    fn node_cost(&self, a: NodeRef<'_, N>, b: NodeRef<'_, N>) -> f64;

    /// Weight of aligning the structure of mapping `a` with that of mapping `b`.
    fn structural_cost(&self, a: &Mapping<'_, N>, b: &Mapping<'_, N>) -> f64;
}

impl<N: DagNode, S: Scorer<N> + ?Sized> Scorer<N> for &S {
    fn node_cost(&self, a: NodeRef<'_, N>, b: NodeRef<'_, N>) -> f64 {
        (**self).node_cost(a, b)
    }

    fn structural_cost(&self, a: &Mapping<'_, N>, b: &Mapping<'_, N>) -> f64 {
        (**self).structural_cost(a, b)
    }
}

/// A [`Scorer`] made of two closures.
pub struct FnScorer<F, G> {
    node: F,
    structure: G,
}

impl<F, G> FnScorer<F, G> {
    pub fn new<N>(node: F, structure: G) -> Self
    where
        N: DagNode,
        F: Fn(NodeRef<'_, N>, NodeRef<'_, N>) -> f64,
        G: Fn(&Mapping<'_, N>, &Mapping<'_, N>) -> f64,
    {
        FnScorer { node, structure }
    }
}

impl<N, F, G> Scorer<N> for FnScorer<F, G>
where
    N: DagNode,
    F: Fn(NodeRef<'_, N>, NodeRef<'_, N>) -> f64,
    G: Fn(&Mapping<'_, N>, &Mapping<'_, N>) -> f64,
{
    fn node_cost(&self, a: NodeRef<'_, N>, b: NodeRef<'_, N>) -> f64 {
        (self.node)(a, b)
    }

    fn structural_cost(&self, a: &Mapping<'_, N>, b: &Mapping<'_, N>) -> f64 {
        (self.structure)(a, b)
    }
}

/// Compares labels by the alphabetical distance of their first letters.
///
/// For two collections of labels the similarity is
///
/// ```text
/// 1 - (|len(xs) - len(ys)| * span + sum(dist(x, y))) / (max(len(xs), len(ys)) * span)
/// ```
///
/// where both sides are sorted case-insensitively and zipped. Edges are compared the same way,
/// with the mean distance of their endpoints, or `span` when their edge labels differ.
/// Both costs add the node similarity to the edge similarity, so they lie in `[0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelDistance {
    span: usize,
}

impl Default for LabelDistance {
    fn default() -> Self {
        LabelDistance { span: 25 }
    }
}

impl LabelDistance {
    /// A scorer where labels further apart than `span` letters are maximally different.
    pub fn with_span(span: usize) -> Self {
        LabelDistance { span: span.max(1) }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn label_distance(&self, a: &str, b: &str) -> f64 {
        let first = |s: &str| {
            s.chars()
                .next()
                .map(|c| c.to_lowercase().next().unwrap_or(c))
        };
        let distance = match (first(a), first(b)) {
            (Some(x), Some(y)) => (x as u32).abs_diff(y as u32) as usize,
            (None, None) => 0,
            _ => self.span,
        };
        distance.min(self.span) as f64
    }

    fn similarity<T>(&self, xs: &[T], ys: &[T], dist: impl Fn(&T, &T) -> f64) -> f64 {
        let longest = xs.len().max(ys.len());
        if longest == 0 {
            return 0.0;
        }

        let span = self.span as f64;
        let gap = xs.len().abs_diff(ys.len()) as f64 * span;
        let total: f64 = xs.iter().zip(ys).map(|(x, y)| dist(x, y)).sum();
        1.0 - (gap + total) / (longest as f64 * span)
    }

    fn compare<N>(&self, a: &Dag<N>, xs: &BTreeSet<N>, b: &Dag<N>, ys: &BTreeSet<N>) -> f64
    where
        N: DagNode + AsRef<str>,
    {
        let sorted_nodes = |nodes: &BTreeSet<N>| {
            let mut nodes: Vec<N> = nodes.iter().cloned().collect();
            nodes.sort_by_cached_key(|n| n.as_ref().to_lowercase());
            nodes
        };
        let sorted_edges = |dag: &Dag<N>, nodes: &BTreeSet<N>| {
            let mut edges: Vec<(N, N)> = nodes
                .iter()
                .flat_map(|from| {
                    dag.children(from)
                        .iter()
                        .filter(move |to| nodes.contains(*to))
                        .map(move |to| (from.clone(), to.clone()))
                })
                .collect();
            edges.sort_by_cached_key(|(from, to)| {
                (from.as_ref().to_lowercase(), to.as_ref().to_lowercase())
            });
            edges
        };

        let nodes = self.similarity(&sorted_nodes(xs), &sorted_nodes(ys), |x, y| {
            self.label_distance(x.as_ref(), y.as_ref())
        });

        let edges = self.similarity(&sorted_edges(a, xs), &sorted_edges(b, ys), |x, y| {
            let labels_x: Vec<&str> = a.labels_of(&x.0, &x.1).collect();
            let labels_y: Vec<&str> = b.labels_of(&y.0, &y.1).collect();
            if labels_x != labels_y {
                return self.span as f64;
            }
            (self.label_distance(x.0.as_ref(), y.0.as_ref())
                + self.label_distance(x.1.as_ref(), y.1.as_ref()))
                / 2.0
        });

        nodes + edges
    }
}

impl<N: DagNode + AsRef<str>> Scorer<N> for LabelDistance {
    /// Compares the sub-DAGs rooted at `a` and `b`.
    fn node_cost(&self, a: NodeRef<'_, N>, b: NodeRef<'_, N>) -> f64 {
        self.compare(a.dag, &a.closure(), b.dag, &b.closure())
    }

    /// Compares the parts of both mappings that are not abstracted behind variables.
    fn structural_cost(&self, a: &Mapping<'_, N>, b: &Mapping<'_, N>) -> f64 {
        self.compare(a.graph, &a.content(), b.graph, &b.content())
    }
}
