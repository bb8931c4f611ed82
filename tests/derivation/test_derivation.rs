use crate::comparator::scenario::{assert_close, left, right};
use crate::dag::strategy::arb_tree;
use alignment_hypergraphs::comparator::build;
use alignment_hypergraphs::derivation::{enumerate, Derivation, Derivations};
use alignment_hypergraphs::error::Error;
use alignment_hypergraphs::hypergraph::{Hypergraph, NodeId, Weighted};
use alignment_hypergraphs::scoring::LabelDistance;
use alignment_hypergraphs::trace::{EnumerationEvent, EnumerationTrace};

use proptest::prelude::*;
use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;

/// Number of derivations of every node, counted bottom-up.
fn count_derivations<K, L>(h: &Hypergraph<K, L>, start: &K) -> u64
where
    K: Clone + Eq + Hash + Debug,
{
    let mut counts: Vec<Option<u64>> = vec![None; h.node_count()];
    let mut stack = vec![h.node_id(start).unwrap()];
    while let Some(&node) = stack.last() {
        let pending: Vec<NodeId> = h
            .outgoing_of(node)
            .iter()
            .flat_map(|&e| h.edge(e).tail.iter().copied())
            .filter(|t| counts[t.0].is_none())
            .collect();
        if !pending.is_empty() {
            stack.extend(pending);
            continue;
        }
        stack.pop();
        let outgoing = h.outgoing_of(node);
        counts[node.0] = Some(if outgoing.is_empty() {
            1
        } else {
            outgoing
                .iter()
                .map(|&e| h.edge(e).tail.iter().map(|t| counts[t.0].unwrap()).product::<u64>())
                .sum()
        });
    }
    counts[h.node_id(start).unwrap().0].unwrap()
}

/// Recompute a derivation's score from the hypergraph.
fn rescore<K, L>(h: &Hypergraph<K, L>, d: &Derivation<K>) -> f64
where
    K: Clone + Eq + Hash + Debug,
    L: Weighted<f64>,
{
    match d.edge {
        None => h.node_weight(&d.head).unwrap(),
        Some(e) => {
            let tail: Vec<&K> = d.children.iter().map(|c| &c.head).collect();
            assert_eq!(tail, h.edge_key(e).tail.iter().collect::<Vec<_>>());
            h.label(e).weight() + d.children.iter().map(|c| rescore(h, c)).sum::<f64>()
        }
    }
}

#[test]
fn test_scenario_derivations() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    let derivations: Vec<Derivation<(&str, &str)>> = enumerate(&h, &("a", "A")).unwrap().collect();

    assert_eq!(derivations.len(), 18);
    assert_eq!(count_derivations(&h, &("a", "A")), 18);
    assert_close(derivations[0].score, 3.46);
    assert_close(derivations[17].score, 1.2933333333333334);
    assert!(derivations[0].score > derivations[17].score);
    assert!(derivations.windows(2).all(|w| w[0].score >= w[1].score));

    for (i, d) in derivations.iter().enumerate() {
        assert_close(rescore(&h, d), d.score);
        assert!(derivations[..i].iter().all(|other| other != d));
    }
}

#[test]
fn test_best_score_is_first() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    let mut derivations = enumerate(&h, &("a", "A")).unwrap();
    let best = derivations.best_score();
    assert_eq!(derivations.next_derivation().unwrap().score, best);
    assert_eq!(derivations.emitted(), 1);
}

#[test]
fn test_exhausted_is_sticky() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    let mut derivations = enumerate(&h, &("c", "C")).unwrap();

    // (c, C) -> [(e, D)] is the only way to derive (c, C)
    let only = derivations.next_derivation().unwrap();
    assert_eq!(only.children.len(), 1);
    assert!(only.children[0].is_leaf());
    assert!(matches!(derivations.next_derivation(), Err(Error::Exhausted)));
    assert!(matches!(derivations.next_view(), Err(Error::Exhausted)));
    assert!(derivations.next().is_none());
}

#[test]
fn test_invalid_start() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    assert!(matches!(
        enumerate(&h, &("d", "D")),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        enumerate(&h, &("q", "Q")),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_cycles_are_rejected() {
    let mut h: Hypergraph<char, f64> = Hypergraph::strict();
    for k in ['a', 'b', 'c'] {
        h.add_node(k, 1.0).unwrap();
    }
    h.add_hyperedge('a', vec!['b'], 1.0).unwrap();
    h.add_hyperedge('b', vec!['c'], 1.0).unwrap();
    h.add_hyperedge('c', vec!['a'], 1.0).unwrap();
    assert!(matches!(
        enumerate(&h, &'a'),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_ties_follow_insertion_order() {
    let mut h: Hypergraph<char, f64> = Hypergraph::strict();
    for k in ['s', 'x', 'y', 'z'] {
        h.add_node(k, 1.0).unwrap();
    }
    let first = h.add_hyperedge('s', vec!['x'], 0.5).unwrap();
    let better = h.add_hyperedge('s', vec!['y', 'z'], 0.0).unwrap();
    let second = h.add_hyperedge('s', vec!['z'], 0.5).unwrap();

    let edges: Vec<_> = enumerate(&h, &'s').unwrap().map(|d| d.edge).collect();
    assert_eq!(edges, vec![Some(better), Some(first), Some(second)]);
}

#[test]
fn test_shared_subderivations() {
    // s -> [m, m] where m has three derivations: every pair of them is a derivation of s
    let mut h: Hypergraph<&str, f64> = Hypergraph::strict();
    for (k, w) in [("s", 0.0), ("m", 0.0), ("x", 3.0), ("y", 2.0), ("z", 1.0)] {
        h.add_node(k, w).unwrap();
    }
    h.add_hyperedge("s", vec!["m", "m"], 0.0).unwrap();
    for leaf in ["x", "y", "z"] {
        h.add_hyperedge("m", vec![leaf], 0.0).unwrap();
    }

    let scores: Vec<f64> = enumerate(&h, &"s").unwrap().map(|d| d.score).collect();
    assert_eq!(
        scores,
        vec![6.0, 5.0, 5.0, 4.0, 4.0, 4.0, 3.0, 3.0, 2.0]
    );
}

#[test]
fn test_views_borrow_the_enumerator() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    let mut derivations = enumerate(&h, &("a", "A")).unwrap();

    let view = derivations.next_view().unwrap();
    assert_eq!(*view.head(), ("a", "A"));
    assert_eq!(view.rank(), 0);
    let label = view.label().unwrap();
    assert_eq!(label.subgraphs.0.root, "a");

    let owned = view.to_derivation();
    let children: Vec<_> = view.children().map(|c| *c.head()).collect();
    assert_eq!(
        children,
        owned.children.iter().map(|c| c.head).collect::<Vec<_>>()
    );
    assert_close(view.score(), owned.score);
}

#[derive(Default)]
struct Recorder {
    found: RefCell<Vec<(String, usize)>>,
}

impl<K: Debug> EnumerationTrace<K> for Recorder {
    fn on_event(&self, event: EnumerationEvent<'_, K>) {
        if let EnumerationEvent::DerivationFound { node, rank, .. } = event {
            self.found.borrow_mut().push((format!("{node:?}"), rank));
        }
    }
}

#[test]
fn test_trace_reports_found_derivations() {
    let (a, b) = (left(), right());
    let h = build(&a, &b, LabelDistance::default(), None).unwrap();
    let recorder = Recorder::default();
    let derivations = Derivations::with_trace(&h, &("a", "A"), &recorder).unwrap();
    assert_eq!(derivations.count(), 18);

    let found = recorder.found.borrow();
    let at_root = found
        .iter()
        .filter(|(node, _)| node == "(\"a\", \"A\")")
        .count();
    assert_eq!(at_root, 18);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_enumeration_is_complete_and_ordered(x in arb_tree(4), y in arb_tree(4)) {
        let h = build(&x, &y, LabelDistance::default(), None).unwrap();
        let start = (x.root().clone(), y.root().clone());
        prop_assume!(!h.outgoing(&start).unwrap().is_empty());

        let expected = count_derivations(&h, &start);
        prop_assume!(expected <= 2000);

        let mut derivations = enumerate(&h, &start).unwrap();
        let best = derivations.best_score();
        let all: Vec<_> = derivations.by_ref().collect();

        prop_assert_eq!(all.len() as u64, expected);
        prop_assert_eq!(all[0].score, best);
        for w in all.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
        }
        for d in all.iter() {
            prop_assert!((rescore(&h, d) - d.score).abs() < 1e-9);
        }
        prop_assert!(derivations.next_derivation().unwrap_err().is_exhausted());
    }
}
