//! Construction of the alignment hypergraph of two DAGs.
//!
//! Every pair of nodes `(a, b)` becomes a hypergraph node weighted by how well `a` aligns with
//! `b`. Every pair of variable mappings with the same number of variables becomes a hyperedge
//!
//! ```text
//!     (root_a, root_b) -> [(x_a0, x_b0), (x_a1, x_b1), ...]
//! ```
//!
//! which reads: "aligning `root_a` with `root_b` this way requires aligning the variables
//! pairwise". The hyperedge label carries both subgraphs and the structural weight of the
//! match. A derivation of `(root_a, root_b)` is then a complete alignment of the two DAGs.
use crate::config::AlignConfig;
use crate::dag::{Dag, DagNode, Subgraph};
use crate::error::Result;
use crate::hypergraph::{Hypergraph, Weighted};
use crate::mapper::{DagMapper, Mapping};
use crate::scoring::{NodeRef, Scorer};
use crate::trace::{BuildEvent, BuildTrace, NoopTrace};

use std::collections::BTreeMap;

/// Label of an alignment hyperedge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentLabel<N: Ord> {
    /// The matched subgraphs of the left and right DAG.
    pub subgraphs: (Subgraph<N>, Subgraph<N>),
    pub weight: f64,
}

impl<N: Ord> Weighted<f64> for AlignmentLabel<N> {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Nodes are pairs `(left, right)` weighted by the scorer's node cost.
pub type AlignmentHypergraph<N> = Hypergraph<(N, N), AlignmentLabel<N>, f64>;

/// Builds the alignment hypergraph of two DAGs with a given [`Scorer`].
pub struct DagComparator<'g, N: DagNode, S> {
    left: &'g Dag<N>,
    right: &'g Dag<N>,
    scorer: S,
    trace: Option<&'g dyn BuildTrace<N>>,
}

impl<'g, N: DagNode, S: Scorer<N>> DagComparator<'g, N, S> {
    pub fn new(left: &'g Dag<N>, right: &'g Dag<N>, scorer: S) -> Self {
        DagComparator {
            left,
            right,
            scorer,
            trace: None,
        }
    }

    /// Report build progress to `trace`.
    pub fn with_trace(mut self, trace: &'g dyn BuildTrace<N>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Build with at most `budget` variables per mapping (`None` is unbounded).
    pub fn build(&self, budget: Option<usize>) -> Result<AlignmentHypergraph<N>> {
        let config = AlignConfig {
            variable_budget: budget,
            ..AlignConfig::default()
        };
        self.build_with(&config)
    }

    /// Build the hypergraph. The input DAGs are never modified, so building twice yields
    /// identical hypergraphs.
    pub fn build_with(&self, config: &AlignConfig) -> Result<AlignmentHypergraph<N>> {
        config.validate()?;
        let trace = self.trace.unwrap_or(&NoopTrace);
        let mut hypergraph = Hypergraph::new(config.insert_mode);

        for a in self.left.nodes() {
            for b in self.right.nodes() {
                let weight = self
                    .scorer
                    .node_cost(NodeRef::new(self.left, a), NodeRef::new(self.right, b));
                hypergraph.add_node((a.clone(), b.clone()), weight)?;
                trace.on_event(BuildEvent::NodeScored {
                    left: a,
                    right: b,
                    weight,
                });
            }
        }

        let left = DagMapper::new(self.left)
            .all_variable_mappings(config.variable_budget, config.max_depth)?;
        let right = DagMapper::new(self.right)
            .all_variable_mappings(config.variable_budget, config.max_depth)?;
        trace.on_event(BuildEvent::MappingsGenerated {
            left: left.len(),
            right: right.len(),
        });

        for (variables, (lefts, rights)) in bucket_by_variables(&left, &right) {
            trace.on_event(BuildEvent::Bucket {
                variables,
                left: lefts.len(),
                right: rights.len(),
            });
            for m1 in lefts.iter() {
                for m2 in rights.iter() {
                    self.add_alignment(&mut hypergraph, m1, m2, trace)?;
                }
            }
        }

        tracing::debug!(
            nodes = hypergraph.node_count(),
            hyperedges = hypergraph.edge_count(),
            "built alignment hypergraph"
        );
        Ok(hypergraph)
    }

    fn add_alignment(
        &self,
        hypergraph: &mut AlignmentHypergraph<N>,
        m1: &Mapping<'_, N>,
        m2: &Mapping<'_, N>,
        trace: &dyn BuildTrace<N>,
    ) -> Result<()> {
        let head = (m1.root().clone(), m2.root().clone());
        let tail: Vec<(N, N)> = m1
            .variables
            .iter()
            .cloned()
            .zip(m2.variables.iter().cloned())
            .collect();
        let weight = self.scorer.structural_cost(m1, m2);

        // a repeated (head, tail) keeps the heavier label, ties keep the first
        if hypergraph.contains_hyperedge(&head, &tail) {
            let existing = hypergraph.hyperedge_label(&head, &tail)?.weight;
            if weight > existing {
                let label = AlignmentLabel {
                    subgraphs: (m1.subgraph.clone(), m2.subgraph.clone()),
                    weight,
                };
                hypergraph.update_hyperedge_label(&head, &tail, label)?;
            }
            trace.on_event(BuildEvent::Duplicate {
                left: m1,
                right: m2,
                kept: existing.max(weight),
                discarded: existing.min(weight),
            });
            return Ok(());
        }

        let label = AlignmentLabel {
            subgraphs: (m1.subgraph.clone(), m2.subgraph.clone()),
            weight,
        };
        hypergraph.add_hyperedge(head, tail, label)?;
        trace.on_event(BuildEvent::HyperedgeAdded {
            left: m1,
            right: m2,
            weight,
        });
        Ok(())
    }
}

type Bucket<'m, 'g, N> = (Vec<&'m Mapping<'g, N>>, Vec<&'m Mapping<'g, N>>);

/// Group both sides' mappings by variable count, keeping only counts present on both sides.
fn bucket_by_variables<'m, 'g, N: DagNode>(
    left: &'m [Mapping<'g, N>],
    right: &'m [Mapping<'g, N>],
) -> BTreeMap<usize, Bucket<'m, 'g, N>> {
    let mut buckets: BTreeMap<usize, Bucket<'m, 'g, N>> = BTreeMap::new();
    for m in left {
        buckets.entry(m.num_variables()).or_default().0.push(m);
    }
    for m in right {
        buckets.entry(m.num_variables()).or_default().1.push(m);
    }
    buckets.retain(|_, (l, r)| !l.is_empty() && !r.is_empty());
    buckets
}

/// Build the alignment hypergraph of `left` and `right` with at most `budget` variables per
/// mapping.
pub fn build<N: DagNode, S: Scorer<N>>(
    left: &Dag<N>,
    right: &Dag<N>,
    scorer: S,
    budget: Option<usize>,
) -> Result<AlignmentHypergraph<N>> {
    DagComparator::new(left, right, scorer).build(budget)
}
