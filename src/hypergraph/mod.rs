//! A grow-only hypergraph with weighted nodes and labelled, directed hyperedges.
//!
//! Nodes are opaque keys (any `K: Clone + Eq + Hash`) carrying a scalar weight. A hyperedge
//! connects a *head* node to an ordered *tail* of nodes and carries a label. Nodes and
//! hyperedges are addressed internally by dense [`NodeId`]s and [`EdgeId`]s, assigned in
//! insertion order.
//!
//! ```rust
//! use alignment_hypergraphs::hypergraph::Hypergraph;
//!
//! let mut h: Hypergraph<&str, &str> = Hypergraph::strict();
//! h.add_node("a", 1.0).unwrap();
//! h.add_node("b", 2.0).unwrap();
//! h.add_node("c", 3.0).unwrap();
//! h.add_hyperedge("a", vec!["b", "c"], "abc").unwrap();
//!
//! assert_eq!(h.node_weight(&"b").unwrap(), 2.0);
//! assert_eq!(*h.hyperedge_label(&"a", &["b", "c"]).unwrap(), "abc");
//! assert!(h.add_hyperedge("a", vec!["z"], "az").is_err());
//! ```
#[cfg(feature = "serde")]
pub mod persist;

use crate::error::{Error, Result};

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub usize);

/// The incidence of a hyperedge: a head node and an ordered tail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hyperedge {
    pub head: NodeId,
    pub tail: Vec<NodeId>,
}

/// A hyperedge spelled out with node keys instead of ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HyperedgeKey<K> {
    pub head: K,
    pub tail: Vec<K>,
}

/// What happens when an existing node or hyperedge is inserted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InsertMode {
    /// Re-insertion fails with [`Error::DuplicateKey`].
    #[default]
    Strict,
    /// Re-insertion overwrites the stored weight or label.
    Merge,
}

/// Labels that carry a scalar weight.
pub trait Weighted<W> {
    fn weight(&self) -> W;
}

impl Weighted<f64> for f64 {
    fn weight(&self) -> f64 {
        *self
    }
}

impl Weighted<f32> for f32 {
    fn weight(&self) -> f32 {
        *self
    }
}

/// A hypergraph with nodes keyed by `K`, node weights `W` and hyperedge labels `L`.
#[derive(Debug, Clone)]
pub struct Hypergraph<K, L, W = f64> {
    mode: InsertMode,

    /// Node keys and weights, indexed by [`NodeId`].
    keys: Vec<K>,
    weights: Vec<W>,

    /// Hyperedge incidence and labels, indexed by [`EdgeId`].
    adjacency: Vec<Hyperedge>,
    labels: Vec<L>,

    // every hyperedge a node participates in, and the ones it heads
    incidence: Vec<Vec<EdgeId>>,
    outgoing: Vec<Vec<EdgeId>>,

    node_index: HashMap<K, NodeId>,
    edge_index: HashMap<Hyperedge, EdgeId>,
}

impl<K, L, W> Default for Hypergraph<K, L, W> {
    fn default() -> Self {
        Hypergraph::new(InsertMode::default())
    }
}

impl<K, L, W> Hypergraph<K, L, W> {
    /// The empty hypergraph with the given insertion policy.
    pub fn new(mode: InsertMode) -> Self {
        Hypergraph {
            mode,
            keys: vec![],
            weights: vec![],
            adjacency: vec![],
            labels: vec![],
            incidence: vec![],
            outgoing: vec![],
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
        }
    }

    /// An empty hypergraph rejecting re-insertions.
    pub fn strict() -> Self {
        Self::new(InsertMode::Strict)
    }

    /// An empty hypergraph where re-insertions overwrite.
    pub fn merge() -> Self {
        Self::new(InsertMode::Merge)
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Key of the node `id`. Panics if `id` is out of range.
    pub fn key(&self, id: NodeId) -> &K {
        &self.keys[id.0]
    }

    /// Incidence of the hyperedge `id`. Panics if `id` is out of range.
    pub fn edge(&self, id: EdgeId) -> &Hyperedge {
        &self.adjacency[id.0]
    }

    /// Label of the hyperedge `id`. Panics if `id` is out of range.
    pub fn label(&self, id: EdgeId) -> &L {
        &self.labels[id.0]
    }

    /// Hyperedges headed by the node `id`, in insertion order.
    pub fn outgoing_of(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id.0]
    }

    /// Node keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    /// Hyperedges in insertion order.
    pub fn hyperedges(&self) -> impl Iterator<Item = (EdgeId, &Hyperedge, &L)> {
        self.adjacency
            .iter()
            .zip(self.labels.iter())
            .enumerate()
            .map(|(i, (edge, label))| (EdgeId(i), edge, label))
    }
}

impl<K: Clone + Eq + Hash + Debug, L, W: Copy> Hypergraph<K, L, W> {
    pub fn node_id(&self, key: &K) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    pub fn contains_node(&self, key: &K) -> bool {
        self.node_index.contains_key(key)
    }

    /// Weight of the node `id`. Panics if `id` is out of range.
    pub fn weight_of(&self, id: NodeId) -> W {
        self.weights[id.0]
    }

    /// Add a node. In strict mode an existing key is an error; in merge mode its weight is
    /// overwritten.
    pub fn add_node(&mut self, key: K, weight: W) -> Result<NodeId> {
        if let Some(id) = self.node_id(&key) {
            return match self.mode {
                InsertMode::Strict => Err(Error::duplicate(format!("node {key:?}"))),
                InsertMode::Merge => {
                    self.weights[id.0] = weight;
                    Ok(id)
                }
            };
        }

        let id = NodeId(self.keys.len());
        self.keys.push(key.clone());
        self.weights.push(weight);
        self.incidence.push(vec![]);
        self.outgoing.push(vec![]);
        self.node_index.insert(key, id);
        Ok(id)
    }

    pub fn update_node(&mut self, key: &K, weight: W) -> Result<()> {
        let id = self.require_node(key)?;
        self.weights[id.0] = weight;
        Ok(())
    }

    pub fn node_weight(&self, key: &K) -> Result<W> {
        let id = self.require_node(key)?;
        Ok(self.weights[id.0])
    }

    /// Add the hyperedge `head -> tail` labelled `label`.
    ///
    /// Every key must already be a node. In strict mode an existing `(head, tail)` is an
    /// error; in merge mode its label is replaced.
    pub fn add_hyperedge(&mut self, head: K, tail: Vec<K>, label: L) -> Result<EdgeId> {
        let edge = self.resolve(&head, &tail)?;

        if let Some(&id) = self.edge_index.get(&edge) {
            return match self.mode {
                InsertMode::Strict => Err(Error::duplicate(format!(
                    "hyperedge {head:?} -> {tail:?}"
                ))),
                InsertMode::Merge => {
                    self.labels[id.0] = label;
                    Ok(id)
                }
            };
        }

        let id = EdgeId(self.adjacency.len());
        self.outgoing[edge.head.0].push(id);
        for node in std::iter::once(&edge.head).chain(edge.tail.iter()) {
            let incident = &mut self.incidence[node.0];
            if incident.last() != Some(&id) && !incident.contains(&id) {
                incident.push(id);
            }
        }

        self.edge_index.insert(edge.clone(), id);
        self.adjacency.push(edge);
        self.labels.push(label);
        Ok(id)
    }

    pub fn contains_hyperedge(&self, head: &K, tail: &[K]) -> bool {
        self.edge_id(head, tail).is_some()
    }

    pub fn edge_id(&self, head: &K, tail: &[K]) -> Option<EdgeId> {
        let edge = self.resolve(head, tail).ok()?;
        self.edge_index.get(&edge).copied()
    }

    pub fn hyperedge_label(&self, head: &K, tail: &[K]) -> Result<&L> {
        let id = self.require_edge(head, tail)?;
        Ok(&self.labels[id.0])
    }

    pub fn update_hyperedge_label(&mut self, head: &K, tail: &[K], label: L) -> Result<()> {
        let id = self.require_edge(head, tail)?;
        self.labels[id.0] = label;
        Ok(())
    }

    /// Every hyperedge `key` takes part in, as head or in the tail, in insertion order.
    pub fn hyperedges_from_node(&self, key: &K) -> Result<Vec<HyperedgeKey<K>>> {
        let id = self.require_node(key)?;
        Ok(self.incidence[id.0]
            .iter()
            .map(|&e| self.edge_key(e))
            .collect())
    }

    /// Hyperedges headed by `key`.
    pub fn outgoing(&self, key: &K) -> Result<&[EdgeId]> {
        let id = self.require_node(key)?;
        Ok(&self.outgoing[id.0])
    }

    /// The hyperedge `id` spelled with node keys. Panics if `id` is out of range.
    pub fn edge_key(&self, id: EdgeId) -> HyperedgeKey<K> {
        let edge = &self.adjacency[id.0];
        HyperedgeKey {
            head: self.keys[edge.head.0].clone(),
            tail: edge.tail.iter().map(|n| self.keys[n.0].clone()).collect(),
        }
    }

    /// Nodes with their weights, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&K, W)> {
        self.keys.iter().zip(self.weights.iter().copied())
    }

    fn require_node(&self, key: &K) -> Result<NodeId> {
        self.node_id(key)
            .ok_or_else(|| Error::not_found(format!("node {key:?}")))
    }

    fn require_edge(&self, head: &K, tail: &[K]) -> Result<EdgeId> {
        self.edge_id(head, tail)
            .ok_or_else(|| Error::not_found(format!("hyperedge {head:?} -> {tail:?}")))
    }

    fn resolve(&self, head: &K, tail: &[K]) -> Result<Hyperedge> {
        let head = self.require_node(head)?;
        let tail = tail
            .iter()
            .map(|k| self.require_node(k))
            .collect::<Result<Vec<_>>>()?;
        Ok(Hyperedge { head, tail })
    }

    /// Rebuild a hypergraph from its raw parts, validating ids and uniqueness.
    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn from_parts(
        mode: InsertMode,
        nodes: Vec<(K, W)>,
        hyperedges: Vec<(Hyperedge, L)>,
    ) -> Result<Self> {
        let mut h = Hypergraph::new(InsertMode::Strict);
        for (key, weight) in nodes {
            h.add_node(key, weight)?;
        }
        for (edge, label) in hyperedges {
            let n = h.node_count();
            if edge.head.0 >= n || edge.tail.iter().any(|t| t.0 >= n) {
                return Err(Error::not_found(format!("node id in {edge:?}")));
            }
            let head = h.keys[edge.head.0].clone();
            let tail = edge.tail.iter().map(|t| h.keys[t.0].clone()).collect();
            h.add_hyperedge(head, tail, label)?;
        }
        h.mode = mode;
        Ok(h)
    }
}
