//! Lazy enumeration of derivations of a hypergraph node in best-first order.
//!
//! A *derivation* of a node picks one of its outgoing hyperedges and, recursively, a derivation
//! of every node in that hyperedge's tail. A node heading no hyperedge is derived by itself.
//! The score of a derivation is the sum of the weights of the hyperedges it uses plus the
//! weights of the nodes at its leaves.
//!
//! [`Derivations`] produces the derivations of a start node one at a time, in non-increasing
//! score order, without materializing the (possibly exponential) set of all of them. It is the
//! lazy k-best algorithm of Huang and Chiang: every node keeps the derivations found so far and
//! a heap of candidates, and a candidate's neighbours are only explored once it has been
//! emitted. All work runs on an explicit stack, so deep hypergraphs do not recurse.
//!
//! Derivations with equal scores come out in the order their candidates were queued: first by
//! hyperedge insertion order, then by the position of the advanced subderivation.
mod state;

use state::{Found, NodeState};

use crate::error::{Error, Result};
use crate::hypergraph::{EdgeId, Hypergraph, NodeId, Weighted};
use crate::trace::{EnumerationEvent, EnumerationTrace, NoopTrace};

use num_traits::{Float, ToPrimitive};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

/// One way of deriving a node: a hyperedge with the best scores of its tail, or the node alone.
#[derive(Debug, Clone)]
struct Transition<W> {
    edge: Option<EdgeId>,
    tail: Vec<NodeId>,
    weight: W,
    score: W,
}

/// An owned derivation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation<K, W = f64> {
    pub head: K,
    /// The hyperedge used, `None` for a node derived by itself.
    pub edge: Option<EdgeId>,
    /// Weight of the hyperedge, or of the node itself at a leaf.
    pub weight: W,
    /// Total score of this subtree.
    pub score: W,
    /// Derivations of the hyperedge's tail, in tail order.
    pub children: Vec<Derivation<K, W>>,
}

impl<K, W> Derivation<K, W> {
    pub fn is_leaf(&self) -> bool {
        self.edge.is_none()
    }

    /// Number of hyperedges used by this derivation.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(d) = stack.pop() {
            size += usize::from(d.edge.is_some());
            stack.extend(d.children.iter());
        }
        size
    }
}

/// Enumerates the derivations of a start node, best first.
pub struct Derivations<'h, K, L, W = f64> {
    graph: &'h Hypergraph<K, L, W>,
    start: NodeId,
    // sorted transitions of every node reachable from `start`
    transitions: Vec<Option<Vec<Transition<W>>>>,
    states: Vec<NodeState<W>>,
    emitted: usize,
    trace: Option<&'h dyn EnumerationTrace<K>>,
}

/// Enumerate the derivations of `start` in `graph`.
pub fn enumerate<'h, K, L, W>(
    graph: &'h Hypergraph<K, L, W>,
    start: &K,
) -> Result<Derivations<'h, K, L, W>>
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<W>,
    W: Float + Debug,
{
    Derivations::new(graph, start)
}

impl<'h, K, L, W> Derivations<'h, K, L, W>
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<W>,
    W: Float + Debug,
{
    /// Prepare the enumeration of the derivations of `start`.
    ///
    /// Fails with [`Error::InvalidArgument`] if `start` heads no hyperedge, or if a directed
    /// cycle is reachable from it.
    pub fn new(graph: &'h Hypergraph<K, L, W>, start: &K) -> Result<Self> {
        Self::with_trace_opt(graph, start, None)
    }

    /// Like [`Derivations::new`], reporting progress to `trace`.
    pub fn with_trace(
        graph: &'h Hypergraph<K, L, W>,
        start: &K,
        trace: &'h dyn EnumerationTrace<K>,
    ) -> Result<Self> {
        Self::with_trace_opt(graph, start, Some(trace))
    }

    fn with_trace_opt(
        graph: &'h Hypergraph<K, L, W>,
        start: &K,
        trace: Option<&'h dyn EnumerationTrace<K>>,
    ) -> Result<Self> {
        let start_id = graph
            .node_id(start)
            .ok_or_else(|| Error::invalid(format!("the start node {start:?} is not a node")))?;
        if graph.outgoing_of(start_id).is_empty() {
            return Err(Error::invalid(format!(
                "the start node {start:?} heads no hyperedge"
            )));
        }

        let mut derivations = Derivations {
            graph,
            start: start_id,
            transitions: vec![None; graph.node_count()],
            states: (0..graph.node_count()).map(|_| NodeState::new()).collect(),
            emitted: 0,
            trace,
        };
        derivations.cache_transitions()?;
        Ok(derivations)
    }

    /// Score of the best derivation.
    pub fn best_score(&self) -> W {
        self.transitions_of(self.start)[0].score
    }

    /// Number of derivations returned so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// The next best derivation as an owned tree, or [`Error::Exhausted`].
    pub fn next_derivation(&mut self) -> Result<Derivation<K, W>> {
        let view = self.next_view()?;
        Ok(view.to_derivation())
    }

    /// The next best derivation, borrowed from the enumerator's caches. The view is
    /// invalidated by the next advance.
    pub fn next_view(&mut self) -> Result<DerivationView<'_, 'h, K, L, W>> {
        let (start, rank) = (self.start, self.emitted);
        if !self.resolve(start, rank) {
            return Err(Error::Exhausted);
        }
        self.emitted += 1;
        Ok(DerivationView {
            derivations: self,
            node: start,
            rank,
        })
    }

    fn trace(&self) -> &dyn EnumerationTrace<K> {
        self.trace.unwrap_or(&NoopTrace)
    }

    fn transitions_of(&self, node: NodeId) -> &[Transition<W>] {
        self.transitions[node.0].as_deref().unwrap_or(&[])
    }

    fn found(&self, node: NodeId, rank: usize) -> &Found<W> {
        &self.states[node.0].found[rank]
    }

    /// Sort the transitions of every node reachable from `start`, children before parents.
    fn cache_transitions(&mut self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        struct Frame {
            node: NodeId,
            successors: Vec<NodeId>,
            next: usize,
        }

        let graph = self.graph;
        let frame = |node: NodeId| Frame {
            node,
            successors: graph
                .outgoing_of(node)
                .iter()
                .flat_map(|&e| graph.edge(e).tail.iter().copied())
                .collect(),
            next: 0,
        };

        let mut marks = vec![Mark::Unvisited; graph.node_count()];
        marks[self.start.0] = Mark::OnStack;
        let mut stack = vec![frame(self.start)];

        while let Some(top) = stack.last_mut() {
            let Some(&successor) = top.successors.get(top.next) else {
                let node = top.node;
                stack.pop();
                marks[node.0] = Mark::Done;
                self.sort_transitions(node);
                continue;
            };
            top.next += 1;

            match marks[successor.0] {
                Mark::Unvisited => {
                    marks[successor.0] = Mark::OnStack;
                    stack.push(frame(successor));
                }
                Mark::OnStack => {
                    return Err(Error::invalid(format!(
                        "the hypergraph has a cycle through {:?}",
                        graph.key(successor)
                    )));
                }
                Mark::Done => {}
            }
        }

        Ok(())
    }

    fn sort_transitions(&mut self, node: NodeId) {
        let graph = self.graph;
        let outgoing = graph.outgoing_of(node);

        let mut transitions: Vec<Transition<W>> = if outgoing.is_empty() {
            let weight = graph.weight_of(node);
            vec![Transition {
                edge: None,
                tail: vec![],
                weight,
                score: weight,
            }]
        } else {
            outgoing
                .iter()
                .map(|&e| {
                    let tail = graph.edge(e).tail.clone();
                    let weight = graph.label(e).weight();
                    let score = tail
                        .iter()
                        .fold(weight, |acc, t| acc + self.transitions_of(*t)[0].score);
                    Transition {
                        edge: Some(e),
                        tail,
                        weight,
                        score,
                    }
                })
                .collect()
        };

        // stable: equal scores keep hyperedge insertion order
        transitions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        self.trace().on_event(EnumerationEvent::TransitionsCached {
            node: graph.key(node),
            transitions: transitions.len(),
            best: as_f64(transitions[0].score),
        });
        self.transitions[node.0] = Some(transitions);
    }

    /// A tail node of `node` whose best derivation is not computed yet.
    fn unresolved_tail(&self, node: NodeId) -> Option<NodeId> {
        self.transitions_of(node)
            .iter()
            .flat_map(|t| t.tail.iter().copied())
            .find(|&t| !self.is_settled(t, 0))
    }

    /// Queue the best candidate of every transition of `node`.
    fn init_state(&mut self, node: NodeId) {
        let graph = self.graph;
        let trace = self.trace.unwrap_or(&NoopTrace);
        let Self {
            transitions,
            states,
            ..
        } = self;
        let state = &mut states[node.0];

        for (index, transition) in transitions[node.0].iter().flatten().enumerate() {
            let ranks = vec![0; transition.tail.len()];
            trace.on_event(EnumerationEvent::CandidateQueued {
                node: graph.key(node),
                edge: transition.edge,
                ranks: &ranks,
                score: as_f64(transition.score),
            });
            state.push(index, ranks, transition.score);
        }
        state.initialized = true;
    }

    /// Compute derivations of `node` up to `rank`. Returns whether that rank exists.
    fn resolve(&mut self, node: NodeId, rank: usize) -> bool {
        let mut requests = vec![(node, rank)];

        while let Some(&(node, rank)) = requests.last() {
            // a node's first candidates refer to the best derivation of every tail node
            if !self.states[node.0].initialized {
                match self.unresolved_tail(node) {
                    Some(tail) => requests.push((tail, 0)),
                    None => self.init_state(node),
                }
                continue;
            }

            let state = &self.states[node.0];
            if state.found.len() > rank || state.exhausted {
                requests.pop();
                continue;
            }

            // Before the next pop, queue the neighbours of the last derivation found. Each
            // neighbour advances one subderivation, which has to be computed first.
            if let Some(last) = state.pending {
                let found = &state.found[last];
                let tail = &self.transitions_of(node)[found.transition].tail;
                let missing = tail
                    .iter()
                    .zip(found.ranks.iter())
                    .map(|(&t, &r)| (t, r + 1))
                    .find(|&(t, r)| !self.is_settled(t, r));

                match missing {
                    Some(request) => requests.push(request),
                    None => self.queue_neighbours(node, last),
                }
                continue;
            }

            let state = &mut self.states[node.0];
            match state.pop() {
                Some(candidate) => {
                    let rank = state.found.len();
                    let score = candidate.score;
                    state.found.push(Found {
                        transition: candidate.transition,
                        ranks: candidate.ranks,
                        score,
                    });
                    state.pending = Some(rank);
                    self.trace().on_event(EnumerationEvent::DerivationFound {
                        node: self.graph.key(node),
                        rank,
                        score: as_f64(score),
                    });
                }
                None => {
                    state.exhausted = true;
                    self.trace().on_event(EnumerationEvent::Exhausted {
                        node: self.graph.key(node),
                        rank,
                    });
                }
            }
        }

        self.states[node.0].found.len() > rank
    }

    /// Whether derivation `rank` of `node` is known to exist or known not to.
    fn is_settled(&self, node: NodeId, rank: usize) -> bool {
        let state = &self.states[node.0];
        state.found.len() > rank || state.exhausted
    }

    /// Queue every neighbour of the `last` derivation of `node` whose subderivations exist.
    fn queue_neighbours(&mut self, node: NodeId, last: usize) {
        let found = self.found(node, last);
        let transition = &self.transitions_of(node)[found.transition];

        let mut neighbours: Vec<(Vec<usize>, W)> = vec![];
        for (i, &child) in transition.tail.iter().enumerate() {
            let mut ranks = found.ranks.clone();
            ranks[i] += 1;
            if self.states[child.0].found.len() <= ranks[i] {
                continue;
            }

            let score = transition
                .tail
                .iter()
                .zip(ranks.iter())
                .fold(transition.weight, |acc, (&t, &r)| acc + self.found(t, r).score);
            neighbours.push((ranks, score));
        }
        let (index, edge) = (found.transition, transition.edge);

        let graph = self.graph;
        let trace = self.trace.unwrap_or(&NoopTrace);
        let state = &mut self.states[node.0];
        for (ranks, score) in neighbours {
            if state.is_queued(index, &ranks) {
                continue;
            }
            trace.on_event(EnumerationEvent::CandidateQueued {
                node: graph.key(node),
                edge,
                ranks: &ranks,
                score: as_f64(score),
            });
            state.push(index, ranks, score);
        }
        state.pending = None;
    }
}

fn as_f64<W: Float>(weight: W) -> f64 {
    ToPrimitive::to_f64(&weight).unwrap_or(f64::NAN)
}

impl<K, L, W> Iterator for Derivations<'_, K, L, W>
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<W>,
    W: Float + Debug,
{
    type Item = Derivation<K, W>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_derivation().ok()
    }
}

/// A derivation borrowed from a [`Derivations`] enumerator.
pub struct DerivationView<'a, 'h, K, L, W = f64> {
    derivations: &'a Derivations<'h, K, L, W>,
    node: NodeId,
    rank: usize,
}

impl<K, L, W> Clone for DerivationView<'_, '_, K, L, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, L, W> Copy for DerivationView<'_, '_, K, L, W> {}

impl<'a, 'h, K, L, W> DerivationView<'a, 'h, K, L, W>
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<W>,
    W: Float + Debug,
{
    fn found(&self) -> &'a Found<W> {
        self.derivations.found(self.node, self.rank)
    }

    fn transition(&self) -> &'a Transition<W> {
        &self.derivations.transitions_of(self.node)[self.found().transition]
    }

    pub fn head(&self) -> &'h K {
        self.derivations.graph.key(self.node)
    }

    pub fn edge(&self) -> Option<EdgeId> {
        self.transition().edge
    }

    /// Label of the hyperedge used, `None` at a leaf.
    pub fn label(&self) -> Option<&'h L> {
        let graph = self.derivations.graph;
        self.edge().map(|e| graph.label(e))
    }

    pub fn weight(&self) -> W {
        self.transition().weight
    }

    pub fn score(&self) -> W {
        self.found().score
    }

    /// Rank of this subderivation among the derivations of its head, best first.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn children(&self) -> impl Iterator<Item = DerivationView<'a, 'h, K, L, W>> + 'a {
        let derivations = self.derivations;
        self.transition()
            .tail
            .iter()
            .zip(self.found().ranks.iter())
            .map(move |(&node, &rank)| DerivationView {
                derivations,
                node,
                rank,
            })
    }

    /// Copy the whole tree out of the enumerator.
    pub fn to_derivation(&self) -> Derivation<K, W> {
        self.owned(build_subtrees(self.children().collect()))
    }

    fn owned(&self, children: Vec<Derivation<K, W>>) -> Derivation<K, W> {
        Derivation {
            head: self.head().clone(),
            edge: self.edge(),
            weight: self.weight(),
            score: self.score(),
            children,
        }
    }
}

/// Owned copies of `roots` and everything below them, in the order given.
fn build_subtrees<K, L, W>(
    roots: Vec<DerivationView<'_, '_, K, L, W>>,
) -> Vec<Derivation<K, W>>
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<W>,
    W: Float + Debug,
{
    // (view, children already built)
    let mut stack: Vec<_> = roots.into_iter().rev().map(|v| (v, false)).collect();
    let mut built: Vec<Derivation<K, W>> = vec![];

    while let Some((view, expanded)) = stack.pop() {
        if !expanded {
            stack.push((view, true));
            let children: Vec<_> = view.children().collect();
            stack.extend(children.into_iter().rev().map(|c| (c, false)));
            continue;
        }

        let arity = view.transition().tail.len();
        let children = built.split_off(built.len() - arity);
        built.push(view.owned(children));
    }

    built
}
