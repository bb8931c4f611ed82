//! Observation hooks for hypergraph construction and derivation enumeration.
//!
//! Both the comparator and the enumerator accept an optional trace. Events are plain values
//! borrowed from the running algorithm; implementations must not assume they outlive the call.
//! [`LogTrace`] forwards every event to `tracing` at debug level.
use crate::dag::DagNode;
use crate::hypergraph::EdgeId;
use crate::mapper::Mapping;

use std::fmt::{Debug, Display};

/// Events emitted while the comparator builds an alignment hypergraph.
#[derive(Debug)]
pub enum BuildEvent<'a, N: DagNode> {
    /// A node pair was added with its alignment weight.
    NodeScored { left: &'a N, right: &'a N, weight: f64 },
    /// Variable mappings were generated on both sides.
    MappingsGenerated { left: usize, right: usize },
    /// Mappings with `variables` variables are about to be paired.
    Bucket {
        variables: usize,
        left: usize,
        right: usize,
    },
    /// A new hyperedge joined the two mappings.
    HyperedgeAdded {
        left: &'a Mapping<'a, N>,
        right: &'a Mapping<'a, N>,
        weight: f64,
    },
    /// An existing hyperedge was reached again from a different pair of subgraphs.
    Duplicate {
        left: &'a Mapping<'a, N>,
        right: &'a Mapping<'a, N>,
        kept: f64,
        discarded: f64,
    },
}

/// Events emitted by the derivation enumerator.
#[derive(Debug)]
pub enum EnumerationEvent<'a, K> {
    /// The sorted transitions of `node` were computed.
    TransitionsCached {
        node: &'a K,
        transitions: usize,
        best: f64,
    },
    /// A candidate derivation of `node` was queued.
    CandidateQueued {
        node: &'a K,
        edge: Option<EdgeId>,
        ranks: &'a [usize],
        score: f64,
    },
    /// The `rank`-th best derivation of `node` was found.
    DerivationFound {
        node: &'a K,
        rank: usize,
        score: f64,
    },
    /// `node` has no derivation of rank `rank`.
    Exhausted { node: &'a K, rank: usize },
}

pub trait BuildTrace<N: DagNode> {
    fn on_event(&self, _event: BuildEvent<'_, N>) {}
}

pub trait EnumerationTrace<K> {
    fn on_event(&self, _event: EnumerationEvent<'_, K>) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl<N: DagNode> BuildTrace<N> for NoopTrace {}

impl<K> EnumerationTrace<K> for NoopTrace {}

/// Logs every event with `tracing::debug!`. Mappings are rendered as s-expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl<N: DagNode + Display> BuildTrace<N> for LogTrace {
    fn on_event(&self, event: BuildEvent<'_, N>) {
        match event {
            BuildEvent::NodeScored {
                left,
                right,
                weight,
            } => tracing::debug!(%left, %right, weight, "node pair"),
            BuildEvent::MappingsGenerated { left, right } => {
                tracing::debug!(left, right, "variable mappings generated")
            }
            BuildEvent::Bucket {
                variables,
                left,
                right,
            } => tracing::debug!(variables, left, right, "pairing mappings"),
            BuildEvent::HyperedgeAdded {
                left,
                right,
                weight,
            } => tracing::debug!(%left, %right, weight, "hyperedge"),
            BuildEvent::Duplicate {
                left,
                right,
                kept,
                discarded,
            } => tracing::debug!(%left, %right, kept, discarded, "duplicate hyperedge"),
        }
    }
}

impl<K: Debug> EnumerationTrace<K> for LogTrace {
    fn on_event(&self, event: EnumerationEvent<'_, K>) {
        match event {
            EnumerationEvent::TransitionsCached {
                node,
                transitions,
                best,
            } => tracing::debug!(?node, transitions, best, "transitions"),
            EnumerationEvent::CandidateQueued {
                node,
                edge,
                ranks,
                score,
            } => tracing::debug!(?node, ?edge, ?ranks, score, "candidate"),
            EnumerationEvent::DerivationFound { node, rank, score } => {
                tracing::debug!(?node, rank, score, "derivation")
            }
            EnumerationEvent::Exhausted { node, rank } => {
                tracing::debug!(?node, rank, "exhausted")
            }
        }
    }
}
