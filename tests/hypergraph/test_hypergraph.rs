use alignment_hypergraphs::error::Error;
use alignment_hypergraphs::hypergraph::{EdgeId, HyperedgeKey, Hypergraph, InsertMode, NodeId};

use proptest::collection::vec;
use proptest::prelude::*;

fn abc() -> Hypergraph<&'static str, &'static str> {
    let mut h = Hypergraph::strict();
    h.add_node("a", 1.0).unwrap();
    h.add_node("b", 2.0).unwrap();
    h.add_node("c", 3.0).unwrap();
    h
}

#[test]
fn test_node_weights_round_trip() {
    let mut h = abc();
    assert_eq!(h.node_weight(&"a").unwrap(), 1.0);
    h.update_node(&"a", 4.5).unwrap();
    assert_eq!(h.node_weight(&"a").unwrap(), 4.5);
    assert_eq!(h.node_count(), 3);
    assert_eq!(
        h.nodes().collect::<Vec<_>>(),
        vec![(&"a", 4.5), (&"b", 2.0), (&"c", 3.0)]
    );
}

#[test]
fn test_hyperedge_labels_round_trip() {
    let mut h = abc();
    let id = h.add_hyperedge("a", vec!["b", "c"], "abc").unwrap();
    assert_eq!(id, EdgeId(0));
    assert_eq!(*h.hyperedge_label(&"a", &["b", "c"]).unwrap(), "abc");

    h.update_hyperedge_label(&"a", &["b", "c"], "renamed").unwrap();
    assert_eq!(*h.hyperedge_label(&"a", &["b", "c"]).unwrap(), "renamed");
    assert_eq!(*h.label(id), "renamed");

    // the tail is ordered
    assert!(!h.contains_hyperedge(&"a", &["c", "b"]));
    assert!(h.contains_hyperedge(&"a", &["b", "c"]));
}

#[test]
fn test_unknown_participants() {
    let mut h = abc();
    let result = h.add_hyperedge("a", vec!["b", "z"], "abz");
    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert_eq!(h.edge_count(), 0);

    assert!(matches!(h.node_weight(&"z"), Err(Error::NotFound { .. })));
    assert!(matches!(h.update_node(&"z", 0.0), Err(Error::NotFound { .. })));
    assert!(matches!(
        h.hyperedge_label(&"a", &["b"]),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        h.update_hyperedge_label(&"a", &["b"], "ab"),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        h.hyperedges_from_node(&"z"),
        Err(Error::NotFound { .. })
    ));
    assert!(h.outgoing(&"z").is_err());
}

#[test]
fn test_strict_rejects_duplicates() {
    let mut h = abc();
    assert!(matches!(
        h.add_node("a", 9.0),
        Err(Error::DuplicateKey { .. })
    ));
    assert_eq!(h.node_weight(&"a").unwrap(), 1.0);

    h.add_hyperedge("a", vec!["b"], "first").unwrap();
    assert!(matches!(
        h.add_hyperedge("a", vec!["b"], "second"),
        Err(Error::DuplicateKey { .. })
    ));
    assert_eq!(*h.hyperedge_label(&"a", &["b"]).unwrap(), "first");
}

#[test]
fn test_merge_replaces() {
    let mut h: Hypergraph<&str, &str> = Hypergraph::new(InsertMode::Merge);
    h.add_node("a", 1.0).unwrap();
    h.add_node("b", 1.0).unwrap();
    assert_eq!(h.add_node("a", 7.0).unwrap(), NodeId(0));
    assert_eq!(h.node_weight(&"a").unwrap(), 7.0);

    h.add_hyperedge("a", vec!["b"], "first").unwrap();
    h.add_hyperedge("a", vec!["b"], "second").unwrap();
    assert_eq!(h.edge_count(), 1);
    assert_eq!(*h.hyperedge_label(&"a", &["b"]).unwrap(), "second");
}

#[test]
fn test_hyperedges_from_node_in_insertion_order() {
    let mut h = abc();
    h.add_hyperedge("a", vec!["b"], "ab").unwrap();
    h.add_hyperedge("c", vec!["a"], "ca").unwrap();
    h.add_hyperedge("b", vec!["c"], "bc").unwrap();

    let from_a = h.hyperedges_from_node(&"a").unwrap();
    assert_eq!(
        from_a,
        vec![
            HyperedgeKey {
                head: "a",
                tail: vec!["b"]
            },
            HyperedgeKey {
                head: "c",
                tail: vec!["a"]
            },
        ]
    );

    assert_eq!(h.outgoing(&"a").unwrap(), &[EdgeId(0)]);
    assert_eq!(h.outgoing(&"c").unwrap(), &[EdgeId(1)]);
    assert!(h.hyperedges_from_node(&"b").unwrap().len() == 2);
}

#[test]
fn test_empty_tail() {
    let mut h = abc();
    h.add_hyperedge("a", vec![], "unit").unwrap();
    assert_eq!(*h.hyperedge_label(&"a", &[]).unwrap(), "unit");
    assert!(h.edge(EdgeId(0)).tail.is_empty());
}

proptest! {
    #[test]
    fn test_counts_track_insertions(
        weights in vec(-10.0f64..10.0, 1..12),
        edges in vec((any::<prop::sample::Index>(), vec(any::<prop::sample::Index>(), 0..3)), 0..20),
    ) {
        let mut h: Hypergraph<usize, usize> = Hypergraph::merge();
        for (i, w) in weights.iter().enumerate() {
            h.add_node(i, *w).unwrap();
        }

        let n = weights.len();
        let mut distinct = std::collections::HashSet::new();
        for (label, (head, tail)) in edges.iter().enumerate() {
            let head = head.index(n);
            let tail: Vec<usize> = tail.iter().map(|t| t.index(n)).collect();
            h.add_hyperedge(head, tail.clone(), label).unwrap();
            distinct.insert((head, tail));
        }

        prop_assert_eq!(h.node_count(), n);
        prop_assert_eq!(h.edge_count(), distinct.len());
        for (i, w) in weights.iter().enumerate() {
            prop_assert_eq!(h.node_weight(&i).unwrap(), *w);
        }

        // every hyperedge is listed by each of its participants
        for (id, edge, _) in h.hyperedges() {
            let key = h.edge_key(id);
            prop_assert_eq!(*h.key(edge.head), key.head);
            for node in std::iter::once(&key.head).chain(key.tail.iter()) {
                prop_assert!(h.hyperedges_from_node(node).unwrap().contains(&key));
            }
            prop_assert!(h.outgoing(&key.head).unwrap().contains(&id));
        }
    }
}
