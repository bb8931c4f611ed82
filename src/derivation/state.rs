//! Per-node bookkeeping of the lazy k-best enumeration.
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// A derivation of a node that has been found: which transition it uses and the rank of the
/// subderivation chosen for each tail node.
#[derive(Debug, Clone)]
pub(super) struct Found<W> {
    pub transition: usize,
    pub ranks: Vec<usize>,
    pub score: W,
}

/// A queued derivation. Higher scores come first, then earlier insertions.
#[derive(Debug, Clone)]
pub(super) struct Candidate<W> {
    pub score: W,
    sequence: u64,
    pub transition: usize,
    pub ranks: Vec<usize>,
}

impl<W: Float> Ord for Candidate<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<W: Float> PartialOrd for Candidate<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: Float> PartialEq for Candidate<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: Float> Eq for Candidate<W> {}

#[derive(Debug)]
pub(super) struct NodeState<W> {
    /// Derivations found so far, best first.
    pub found: Vec<Found<W>>,
    candidates: BinaryHeap<Candidate<W>>,
    queued: HashSet<(usize, Vec<usize>)>,
    sequence: u64,
    /// Index into `found` whose neighbours are not queued yet.
    pub pending: Option<usize>,
    /// No derivation beyond `found` exists.
    pub exhausted: bool,
    /// The best candidate of every transition has been queued.
    pub initialized: bool,
}

impl<W: Float> NodeState<W> {
    pub fn new() -> Self {
        NodeState {
            found: vec![],
            candidates: BinaryHeap::new(),
            queued: HashSet::new(),
            sequence: 0,
            pending: None,
            exhausted: false,
            initialized: false,
        }
    }

    pub fn is_queued(&self, transition: usize, ranks: &[usize]) -> bool {
        self.queued.contains(&(transition, ranks.to_vec()))
    }

    pub fn push(&mut self, transition: usize, ranks: Vec<usize>, score: W) {
        if !self.queued.insert((transition, ranks.clone())) {
            return;
        }
        self.candidates.push(Candidate {
            score,
            sequence: self.sequence,
            transition,
            ranks,
        });
        self.sequence += 1;
    }

    pub fn pop(&mut self) -> Option<Candidate<W>> {
        self.candidates.pop()
    }
}
