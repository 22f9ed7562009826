#![no_main]

use conncomp_core::ingest::{IngestError, load_graph};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match load_graph(data) {
        Ok(graph) => graph.assert_symmetric(),
        Err(IngestError::MalformedRecord { .. } | IngestError::InvalidEdge { .. }) => {}
        Err(other) => panic!("in-memory input produced {other}"),
    }
});
