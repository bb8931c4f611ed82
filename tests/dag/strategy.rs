use alignment_hypergraphs::dag::Dag;

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use proptest::strategy::{BoxedStrategy, Strategy};

/// Single-letter name of the `i`-th node: "a", "b", ...
pub fn label(i: usize) -> String {
    ((b'a' + i as u8) as char).to_string()
}

/// Trees on `1..=max_nodes` nodes rooted at "a". Every node's parent is a node created
/// before it.
pub fn arb_tree(max_nodes: usize) -> BoxedStrategy<Dag<String>> {
    assert!((1..=26).contains(&max_nodes));
    (1..=max_nodes)
        .prop_flat_map(|n| vec(any::<Index>(), n - 1))
        .prop_map(|parents| {
            let n = parents.len() + 1;
            let mut links: Vec<(String, Vec<String>)> =
                (0..n).map(|i| (label(i), vec![])).collect();
            for (i, parent) in parents.iter().enumerate() {
                let child = i + 1;
                links[parent.index(child)].1.push(label(child));
            }
            Dag::new(label(0), links).unwrap()
        })
        .boxed()
}

/// DAGs on `1..=max_nodes` nodes rooted at "a", with edges only from earlier to later nodes.
/// Some nodes may be unreachable from the root.
pub fn arb_dag(max_nodes: usize) -> BoxedStrategy<Dag<String>> {
    assert!((1..=26).contains(&max_nodes));
    (1..=max_nodes)
        .prop_flat_map(|n| (Just(n), vec(any::<bool>(), n * (n - 1) / 2)))
        .prop_map(|(n, present)| {
            let mut links: Vec<(String, Vec<String>)> =
                (0..n).map(|i| (label(i), vec![])).collect();
            let mut present = present.into_iter();
            for i in 0..n {
                for j in i + 1..n {
                    if present.next().unwrap_or(false) {
                        links[i].1.push(label(j));
                    }
                }
            }
            Dag::new(label(0), links).unwrap()
        })
        .boxed()
}
