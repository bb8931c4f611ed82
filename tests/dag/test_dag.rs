use super::strategy::{arb_dag, arb_tree};
use alignment_hypergraphs::dag::Dag;
use alignment_hypergraphs::error::Error;

use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn test_from_pairs_adds_leaves() {
    let dag = Dag::from_pairs("a", [("a", "b"), ("b", "c"), ("a", "c")]).unwrap();
    assert_eq!(dag.len(), 3);
    assert!(dag.is_leaf(&"c"));
    assert_eq!(dag.children(&"a"), &["b", "c"]);
    assert_eq!(dag.edges().count(), 3);
}

#[test]
fn test_from_pairs_rejects_cycles() {
    let result = Dag::from_pairs("a", [("a", "b"), ("b", "c"), ("c", "a")]);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_duplicate_child_is_rejected() {
    let result = Dag::new("a", [("a", vec!["b", "b"]), ("b", vec![])]);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_unknown_nodes_have_no_children() {
    let dag = Dag::new("a", [("a", vec![])]).unwrap();
    assert!(dag.children(&"zz").is_empty());
    assert!(!dag.contains(&"zz"));
    assert!(dag.descendants(&"a").is_empty());
}

proptest! {
    #[test]
    fn test_post_order_puts_descendants_first(dag in arb_dag(8)) {
        let order = dag.post_order(dag.root());
        prop_assert_eq!(order.last(), Some(dag.root()));

        let mut seen = BTreeSet::new();
        for node in order.iter() {
            prop_assert!(dag.descendants(node).is_subset(&seen));
            prop_assert!(seen.insert(node.clone()));
        }

        let mut reachable = dag.descendants(dag.root());
        reachable.insert(dag.root().clone());
        prop_assert_eq!(seen, reachable);
    }

    #[test]
    fn test_tree_distances_are_depths(dag in arb_tree(8)) {
        let distances = dag.distances_from(dag.root());
        prop_assert_eq!(distances.len(), dag.len() - 1);
        for (from, to) in dag.edges() {
            let depth = |n: &String| if n == dag.root() { 0 } else { distances[n] };
            prop_assert_eq!(depth(to), depth(from) + 1);
        }
    }
}
