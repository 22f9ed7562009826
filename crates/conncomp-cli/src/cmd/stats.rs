//! `conncomp stats`: report on an edge list without writing anything.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use conncomp_core::ingest::{InputSource, load_graph};
use conncomp_core::stats::GraphStats;

use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `conncomp stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Edge list to read, `-` for stdin.
    #[arg(short, long, default_value = "-", value_name = "PATH")]
    pub graph: String,
}

/// Execute `conncomp stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode) -> anyhow::Result<()> {
    let source = InputSource::parse(&args.graph);
    let graph = source
        .open()
        .and_then(load_graph)
        .with_context(|| format!("loading {source}"))?;

    render(output, &GraphStats::from_graph(&graph), render_human)
}

fn render_human(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "nodes", stats.node_count.to_string())?;
    pretty_kv(w, "edges", stats.edge_count.to_string())?;
    pretty_kv(w, "components", stats.component_count.to_string())?;
    pretty_kv(w, "largest", stats.largest_component.to_string())?;
    pretty_kv(w, "max degree", stats.max_degree.to_string())?;
    pretty_kv(w, "removable", stats.redundant_edge_count.to_string())?;
    pretty_kv(w, "density", format!("{:.4}", stats.density))?;
    pretty_kv(w, "hash", &stats.content_hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use conncomp_core::Graph;

    #[test]
    fn graph_defaults_to_stdin() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: StatsArgs,
        }

        let w = Wrapper::parse_from(["test"]);
        assert_eq!(w.args.graph, "-");
    }

    #[test]
    fn human_rendering_lists_counts() {
        let graph = Graph::from_edges([(1, 2), (2, 3), (3, 1), (7, 8)]).expect("edges");
        let stats = GraphStats::from_graph(&graph);

        let mut buf = Vec::new();
        render_human(&stats, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.contains("nodes:         5\n"));
        assert!(text.contains("components:    2\n"));
        assert!(text.contains("removable:     1\n"));
        assert!(text.contains("hash:          blake3:"));
    }
}
