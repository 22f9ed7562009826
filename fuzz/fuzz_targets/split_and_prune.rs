#![no_main]

use conncomp_core::pipeline::split_and_prune;
use conncomp_core::{Graph, Pruner, is_connected};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u64, u8, Vec<(u8, u8)>)| {
    let (seed, remove, pairs) = input;
    let edges = pairs
        .into_iter()
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (u64::from(a), u64::from(b)));
    let Ok(graph) = Graph::from_edges(edges) else {
        return;
    };
    let nodes = graph.node_count();

    let reports = split_and_prune(graph, usize::from(remove), &mut Pruner::seeded(seed));

    assert_eq!(reports.iter().map(|r| r.graph.node_count()).sum::<usize>(), nodes);
    for report in &reports {
        assert!(is_connected(&report.graph));
        assert!(report.outcome.removed.len() <= usize::from(remove));
    }
});
