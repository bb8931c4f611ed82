//! # Alignment Hypergraphs
//!
//! Structural alignment of two rooted directed acyclic graphs.
//!
//! Aligning two DAGs means deciding which node of one corresponds to which node of the other,
//! in a way that respects their structure. This crate reduces the problem to finding the best
//! derivations in a weighted hypergraph:
//!
//! 1. the [mapper](crate::mapper) enumerates, for every node of a DAG, the ways the subgraph
//!    below it can be abstracted behind *variables*;
//! 2. the [comparator](crate::comparator) pairs those mappings across the two DAGs, producing a
//!    [hypergraph](crate::hypergraph) whose nodes are node pairs and whose hyperedges say
//!    "these roots align if these variables align";
//! 3. the [derivation enumerator](crate::derivation) lists complete alignments from best to
//!    worst, lazily.
//!
//! ```text
//!        a             A
//!       / \           / \
//!       b c           B C
//!       | |             |
//!       d e             D
//! ```
//!
//! ```rust
//! use alignment_hypergraphs::prelude::*;
//!
//! let left = Dag::new("a", [
//!     ("a", vec!["b", "c"]),
//!     ("b", vec!["d"]),
//!     ("c", vec!["e"]),
//!     ("d", vec![]),
//!     ("e", vec![]),
//! ]).unwrap();
//! let right = Dag::new("A", [
//!     ("A", vec!["B", "C"]),
//!     ("B", vec![]),
//!     ("C", vec!["D"]),
//!     ("D", vec![]),
//! ]).unwrap();
//!
//! let hypergraph = build(&left, &right, LabelDistance::default(), None).unwrap();
//! assert_eq!(hypergraph.node_count(), 20);
//!
//! let scores: Vec<f64> = enumerate(&hypergraph, &("a", "A"))
//!     .unwrap()
//!     .map(|derivation| derivation.score)
//!     .collect();
//! assert!(scores.windows(2).all(|w| w[0] >= w[1]));
//! ```
//!
//! # Observing a build
//!
//! Both the comparator and the enumerator log through [`tracing`] and accept a
//! [trace](crate::trace) receiving every intermediate step as a structured event.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the public data types, JSON persistence of
//!   hypergraphs in [`hypergraph::persist`], and [`AlignConfig::from_json_str`](crate::config::AlignConfig).
pub mod error;

pub mod dag;
pub mod hypergraph;
pub mod mapper;

pub mod comparator;
pub mod config;
pub mod derivation;
pub mod scoring;
pub mod trace;

pub mod prelude {
    //! The types needed to align two DAGs and enumerate their alignments.
    pub use crate::comparator::{build, AlignmentHypergraph, AlignmentLabel, DagComparator};
    pub use crate::config::AlignConfig;
    pub use crate::dag::{Dag, Subgraph};
    pub use crate::derivation::{enumerate, Derivation, DerivationView, Derivations};
    pub use crate::error::{Error, Result};
    pub use crate::hypergraph::{Hypergraph, InsertMode};
    pub use crate::mapper::{DagMapper, Mapping};
    pub use crate::scoring::{FnScorer, LabelDistance, NodeRef, Scorer};
}
