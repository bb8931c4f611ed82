//! Align two small DAGs and print their alignments from best to worst.
//!
//! Run with `RUST_LOG=debug` to see every node pair, hyperedge and candidate derivation as it is
//! produced.
use alignment_hypergraphs::prelude::*;
use alignment_hypergraphs::trace::{BuildEvent, BuildTrace, LogTrace};
use std::cell::Cell;
use tracing_subscriber::EnvFilter;

// Counts hyperedges per number of variables, and forwards everything to the log.
struct CountingTrace {
    hyperedges: Cell<usize>,
    variables: Cell<usize>,
}

impl BuildTrace<&'static str> for CountingTrace {
    fn on_event(&self, event: BuildEvent<'_, &'static str>) {
        match &event {
            BuildEvent::Bucket { variables, .. } => {
                if self.hyperedges.get() > 0 {
                    println!(
                        "  {} hyperedges with {} variable(s)",
                        self.hyperedges.get(),
                        self.variables.get()
                    );
                }
                self.variables.set(*variables);
                self.hyperedges.set(0);
            }
            BuildEvent::HyperedgeAdded { .. } => self.hyperedges.set(self.hyperedges.get() + 1),
            _ => {}
        }
        LogTrace.on_event(event);
    }
}

fn print_derivation(derivation: &Derivation<(&str, &str)>, depth: usize) {
    let (a, b) = derivation.head;
    println!(
        "{:indent$}{a} ~ {b}  weight {:.3}  score {:.3}",
        "",
        derivation.weight,
        derivation.score,
        indent = depth * 2
    );
    for child in derivation.children.iter() {
        print_derivation(child, depth + 1);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let left = Dag::new(
        "a",
        [
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["e"]),
            ("d", vec![]),
            ("e", vec![]),
        ],
    )?;
    let right = Dag::new(
        "A",
        [
            ("A", vec!["B", "C"]),
            ("B", vec![]),
            ("C", vec!["D"]),
            ("D", vec![]),
        ],
    )?;

    let trace = CountingTrace {
        hyperedges: Cell::new(0),
        variables: Cell::new(0),
    };
    println!("building:");
    let hypergraph = DagComparator::new(&left, &right, LabelDistance::default())
        .with_trace(&trace)
        .build_with(&AlignConfig::new())?;
    println!(
        "  {} hyperedges with {} variable(s)",
        trace.hyperedges.get(),
        trace.variables.get()
    );
    println!(
        "{} nodes, {} hyperedges",
        hypergraph.node_count(),
        hypergraph.edge_count()
    );

    let mut derivations = enumerate(&hypergraph, &("a", "A"))?;
    println!("best score {:.3}", derivations.best_score());

    // the first derivations in full, then only their scores
    for _ in 0..3 {
        let derivation = derivations.next_derivation()?;
        println!("#{}", derivations.emitted() - 1);
        print_derivation(&derivation, 1);
    }
    loop {
        match derivations.next_view() {
            Ok(view) => println!("#{} score {:.3}", view.rank(), view.score()),
            Err(e) if e.is_exhausted() => break,
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
